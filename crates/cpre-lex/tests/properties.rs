//! Property tests for the tokenizer.
//!
//! The scanner should be a faithful re-serialization machine: for inputs
//! with no comments, concatenating the emitted tokens reproduces the
//! input byte for byte, and every token's coordinates point at its first
//! byte.

use std::io::Cursor;

use proptest::prelude::*;

use cpre_lex::{Token, TokenKind, Tokenizer};

fn tokenize(source: &[u8]) -> Vec<Token> {
    let mut t = Tokenizer::new(Cursor::new(source.to_vec()), "prop");
    let mut tokens = Vec::new();
    loop {
        let tok = t.next_token().expect("input should tokenize cleanly");
        if tok.is_eof() {
            break;
        }
        tokens.push(tok);
    }
    tokens
}

fn reserialize(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::new();
    for tok in tokens {
        if tok.kind == TokenKind::Sep {
            out.push(tok.value);
        } else {
            out.extend_from_slice(&tok.text);
        }
    }
    out
}

/// Identifiers, numbers, and a spread of separators, ending in a
/// separator so no lexeme is left pending at end of input.
fn clean_source() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            "[a-z_][a-z0-9_]{0,8}",
            "[1-9][0-9]{0,6}",
            "0[0-7]{0,5}",
            prop_oneof![
                Just(" ".to_string()),
                Just("\t".to_string()),
                Just("\n".to_string()),
                Just(";".to_string()),
                Just("(".to_string()),
                Just(")".to_string()),
                Just("+".to_string()),
                Just(",".to_string()),
                Just("=".to_string()),
            ],
        ],
        0..40,
    )
    .prop_map(|parts| {
        let mut s = String::new();
        for (i, part) in parts.iter().enumerate() {
            s.push_str(part);
            // keep adjacent lexemes from gluing into one token
            if i + 1 < parts.len() {
                s.push(';');
            }
        }
        s.push('\n');
        s
    })
}

proptest! {
    #[test]
    fn roundtrips_byte_for_byte(source in clean_source()) {
        let tokens = tokenize(source.as_bytes());
        prop_assert_eq!(reserialize(&tokens), source.as_bytes());
    }

    #[test]
    fn coordinates_match_source(source in clean_source()) {
        let tokens = tokenize(source.as_bytes());
        let mut line = 1u32;
        let mut column = 0u32;
        let mut idx = 0usize;
        let bytes = source.as_bytes();
        for tok in &tokens {
            prop_assert_eq!(tok.pos.line, line, "token {:?}", tok);
            prop_assert_eq!(tok.pos.column, column, "token {:?}", tok);
            let len = if tok.kind == TokenKind::Sep { 1 } else { tok.text.len() };
            for _ in 0..len {
                if bytes[idx] == b'\n' {
                    line += 1;
                    column = 0;
                } else {
                    column += 1;
                }
                idx += 1;
            }
        }
        prop_assert_eq!(idx, bytes.len());
    }

    #[test]
    fn single_identifier(name in "[a-z_][a-zA-Z0-9_]{0,30}") {
        let source = format!("{};", name);
        let tokens = tokenize(source.as_bytes());
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].kind, TokenKind::Identifier);
        prop_assert_eq!(tokens[0].text.as_slice(), name.as_bytes());
    }
}
