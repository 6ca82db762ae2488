//! Tessel syntax checker
//!
//! Command-line driver around the lexer and parser.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use tessel::{check_with_feedback, Lexer, Parser as TesselParser};

/// Tessel syntax checker
#[derive(Parser, Debug)]
#[command(name = "tessc")]
#[command(author = "Z1529")]
#[command(version = "0.1.0")]
#[command(about = "Tessel syntax checker - lexes and parses .tsl sources")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Diagnostic output format
    #[arg(long, value_enum, global = true, default_value = "text")]
    format: Format,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check source files for syntax errors
    Check {
        /// Input source files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the token stream of a source file
    Tokens {
        /// Input source file
        input: PathBuf,
    },
    /// Print how each expression in a source file is grouped
    Trace {
        /// Input source file
        input: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match &cli.command {
        Commands::Check { inputs } => check_files(inputs, cli.format),
        Commands::Tokens { input } => dump_tokens(input, cli.format),
        Commands::Trace { input } => trace_file(input, cli.format),
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Check every file; returns whether all of them parsed
fn check_files(inputs: &[PathBuf], format: Format) -> Result<bool> {
    let mut all_ok = true;

    for input in inputs {
        let source = read_source(input)?;
        let name = input.display().to_string();
        log::info!("checking {}", name);

        let feedback = check_with_feedback(&source, &name);
        all_ok &= feedback.success;

        match format {
            Format::Json => println!("{}", feedback.to_json_compact()),
            Format::Text => {
                if feedback.success {
                    println!("ok: {}", name);
                }
                for report in &feedback.diagnostics {
                    eprintln!("{}", report.render());
                    for hint in &report.suggestions {
                        eprintln!("  help: {}", hint.message);
                    }
                }
            }
        }
    }

    Ok(all_ok)
}

fn report_failure(error: &tessel::Error, name: &str, format: Format) {
    let report = tessel::ErrorReport::from_error(error, name);
    match format {
        Format::Json => println!("{}", report.to_json()),
        Format::Text => eprintln!("{}", report.render()),
    }
}

fn dump_tokens(input: &Path, format: Format) -> Result<bool> {
    let source = read_source(input)?;
    let name = input.display().to_string();

    let mut lexer = Lexer::new(&source);
    loop {
        let token = match lexer.advance() {
            Ok(token) => token,
            Err(e) => {
                report_failure(&e, &name, format);
                return Ok(false);
            }
        };

        println!(
            "{:>4}:{:<3} {:<8} {}",
            token.span.line,
            token.span.column,
            token.kind.name(),
            token.lexeme
        );

        if token.is_eof() {
            return Ok(true);
        }
    }
}

fn trace_file(input: &Path, format: Format) -> Result<bool> {
    let source = read_source(input)?;
    let name = input.display().to_string();

    let mut parser = TesselParser::new(Lexer::new(&source)).with_trace();
    if let Err(e) = parser.parse() {
        report_failure(&e, &name, format);
        return Ok(false);
    }

    let expressions = parser
        .derivation()
        .map(|d| d.expressions())
        .unwrap_or_default();

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&expressions)?),
        Format::Text => {
            for expr in expressions {
                println!("{}", expr);
            }
        }
    }
    Ok(true)
}
