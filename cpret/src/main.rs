//! cpret - command-line front end for the cpre preprocessor.
//!
//! Two subcommands share the same input plumbing: `pp` runs the full
//! preprocessor, `tokens` dumps the raw token stream the way the
//! tokenizer sees it. Diagnostics go to stderr; the exit code is zero
//! only if the run produced no hard error.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cpre_lex::{TokenKind, Tokenizer};
use cpre_pp::Preprocessor;

/// cpret - a minimal C-style preprocessor
#[derive(Parser, Debug)]
#[command(name = "cpret")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A minimal C-style preprocessor", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "CPRET_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Preprocess a source file
    ///
    /// Expands macros, resolves #include, and writes the result with
    /// directives removed.
    Pp(PpCommand),

    /// Dump the token stream of a source file
    ///
    /// Prints one token per line with its source coordinates, the way
    /// the scanner categorizes them.
    Tokens(TokensCommand),
}

/// Arguments for the pp subcommand.
#[derive(Args, Debug)]
struct PpCommand {
    /// Input file (default: stdin)
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    markers: MarkerArgs,
}

/// Arguments for the tokens subcommand.
#[derive(Args, Debug)]
struct TokensCommand {
    /// Input file (default: stdin)
    input: Option<PathBuf>,

    #[command(flatten)]
    markers: MarkerArgs,
}

/// Comment marker configuration shared by both subcommands.
#[derive(Args, Debug)]
struct MarkerArgs {
    /// Multi-line comment start marker
    #[arg(long, default_value = "/*")]
    ml_start: String,

    /// Multi-line comment end marker
    #[arg(long, default_value = "*/")]
    ml_end: String,

    /// Single-line comment marker
    #[arg(long, default_value = "//")]
    sl_start: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("cpret: {:#}", err);
            ExitCode::FAILURE
        },
    }
}

/// Initializes tracing with an env-filter; `-v` raises the default to
/// debug, `RUST_LOG` overrides everything.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Pp(args) => run_pp(args),
        Commands::Tokens(args) => run_tokens(args),
    }
}

/// Opens the input stream and names it for diagnostics.
fn open_input(path: &Option<PathBuf>) -> anyhow::Result<(Box<dyn Read>, String)> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            Ok((Box::new(BufReader::new(file)), path.display().to_string()))
        },
        None => Ok((Box::new(io::stdin()), "stdin".to_string())),
    }
}

fn run_pp(args: PpCommand) -> anyhow::Result<ExitCode> {
    let (input, filename) = open_input(&args.input)?;
    let mut pp = Preprocessor::new();
    pp.set_comment_markers(
        &args.markers.ml_start,
        &args.markers.ml_end,
        &args.markers.sl_start,
    );

    let result = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut out = io::BufWriter::new(file);
            let result = pp.parse_file(input, &filename, &mut out);
            out.flush().context("flushing output")?;
            result
        },
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let result = pp.parse_file(input, &filename, &mut out);
            out.flush().context("flushing output")?;
            result
        },
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            // the diagnostic is already on stderr; the exit code carries
            // the failure
            tracing::debug!(error = %err, "preprocessing failed");
            Ok(ExitCode::FAILURE)
        },
    }
}

fn run_tokens(args: TokensCommand) -> anyhow::Result<ExitCode> {
    let (input, filename) = open_input(&args.input)?;
    let mut t = Tokenizer::new(input, filename.as_str());
    t.register_block_comment(&args.markers.ml_start, &args.markers.ml_end);
    t.register_line_comment(&args.markers.sl_start);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    loop {
        match t.next_token() {
            Ok(tok) if tok.is_eof() => return Ok(ExitCode::SUCCESS),
            Ok(tok) => {
                write!(out, "({}:{},{}) ", t.filename(), tok.pos.line, tok.pos.column)?;
                if tok.kind == TokenKind::Sep {
                    let shown = if tok.value == b'\n' { b' ' } else { tok.value };
                    writeln!(out, "separator: {}", shown as char)?;
                } else {
                    writeln!(out, "{}: {}", tok.kind, tok.text)?;
                }
            },
            Err(err) => {
                out.flush().context("flushing output")?;
                eprintln!("error occurred on {}", err.pos());
                eprintln!("{}", err.lexeme());
                eprintln!("{}", "^".repeat(err.lexeme().len()));
                return Ok(ExitCode::FAILURE);
            },
        }
    }
}
