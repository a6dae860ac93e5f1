//! Command-line interface for tac
//! This binary lexes TAC weather messages and prints their tokens, their message type or
//! their bulletin rows.
//!
//! Usage:
//!   tac lex `<path>` [--format `<format>`]    - Print the tokens of a message
//!   tac sniff `<path>`                       - Print the message type
//!   tac wrap `<path>` [--heading `<heading>`] - Print the message as bulletin rows
//!   tac formats                              - List the output formats
//!
//! `--config <file>` layers a TOML file over the built-in defaults. Logging goes to stderr
//! and is controlled with `RUST_LOG`.

use clap::{Arg, ArgMatches, Command};
use std::fs;
use tac_config::{Loader, TacConfig};
use tac_parser::tac::bulletin::{wrap_to_width, Bulletin};
use tac_parser::tac::formats::FormatRegistry;
use tac_parser::tac::lexing::{sniff_message_type, Lexer};
use tac_parser::tac::ConversionHints;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to a file with one TAC message")
        .required(true)
        .index(1)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("tac")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting TAC aviation weather messages")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("lex")
                .about("Print the tokens of a message")
                .arg(path_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (default from config: simple)"),
                ),
        )
        .subcommand(
            Command::new("sniff")
                .about("Print the message type")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("wrap")
                .about("Print the message as bulletin rows")
                .arg(path_arg())
                .arg(
                    Arg::new("heading")
                        .long("heading")
                        .help("Bulletin heading row, e.g. 'FTFI33 EFPP 020500'"),
                ),
        )
        .subcommand(Command::new("formats").about("List the output formats"))
        .get_matches();

    let config = load_config(&matches);
    let hints = config.conversion_hints().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    match matches.subcommand() {
        Some(("lex", sub)) => handle_lex_command(sub, &config, &hints),
        Some(("sniff", sub)) => handle_sniff_command(sub, &hints),
        Some(("wrap", sub)) => handle_wrap_command(sub, &config, &hints),
        Some(("formats", _)) => handle_formats_command(),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn load_config(matches: &ArgMatches) -> TacConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        debug!(path = %path, "layering config file");
        loader = loader.with_file(path);
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    })
}

fn read_source(matches: &ArgMatches) -> String {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", path, e);
        std::process::exit(1);
    })
}

/// Handle the lex command
fn handle_lex_command(matches: &ArgMatches, config: &TacConfig, hints: &ConversionHints) {
    let source = read_source(matches);
    let format = matches
        .get_one::<String>("format")
        .unwrap_or(&config.output.format);

    let sequence = Lexer::with_hints(hints.clone()).lex(&source);
    let registry = FormatRegistry::with_defaults();
    let output = registry.serialize(&sequence, format).unwrap_or_else(|e| {
        eprintln!("{}", e);
        eprintln!("Available formats: {}", registry.list_formats().join(", "));
        std::process::exit(1);
    });
    println!("{}", output);
}

/// Handle the sniff command
fn handle_sniff_command(matches: &ArgMatches, hints: &ConversionHints) {
    let source = read_source(matches);
    match sniff_message_type(&source, hints) {
        Some(message_type) => println!("{}", message_type),
        None => {
            eprintln!("Unknown message type");
            std::process::exit(1);
        }
    }
}

/// Handle the wrap command
fn handle_wrap_command(matches: &ArgMatches, config: &TacConfig, hints: &ConversionHints) {
    let source = read_source(matches);
    let sequence = Lexer::with_hints(hints.clone()).lex(&source);

    let heading = matches
        .get_one::<String>("heading")
        .map(String::as_str)
        .or(hints.bulletin_heading.as_deref());
    match heading {
        Some(heading) => {
            let bulletin = Bulletin::new(heading)
                .with_row_length(config.bulletin.row_length)
                .with_message(sequence);
            println!("{}", bulletin.render());
        }
        None => println!(
            "{}",
            wrap_to_width(&sequence, config.bulletin.row_length).render()
        ),
    }
}

/// Handle the formats command
fn handle_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available output formats:\n");
    for name in registry.list_formats() {
        if let Some(formatter) = registry.get(&name) {
            println!("  {}", name);
            println!("    {}", formatter.description());
            println!();
        }
    }
}
