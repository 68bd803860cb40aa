//! Command-line interface for richtext
//!
//! Processes a richtext file and prints it in one of the registered formats.
//!
//! Usage:
//!   richtext `<path>` [--format `<format>`] [--config `<file>`]   - Process a file (`-` reads stdin)
//!   richtext --list-formats                                     - List available output formats
//!
//! Warnings are logged at `warn` level; set `RUST_LOG` for stage-level debug output.

use clap::{Arg, ArgAction, ArgMatches, Command};
use config::ConfigError;
use log::warn;
use richtext::richtext::config::Loader;
use richtext::richtext::formats::{
    AstTreevizRenderer, FormatError, FormatRegistry, TreevizRenderer,
};
use richtext::richtext::pipeline::{DocumentLoader, PipelineError, ProcessOptions};
use std::io::{self, Read};
use thiserror::Error;

const DEFAULT_CONFIG_FILE: &str = "richtext.toml";

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read input: {0}")]
    Io(#[from] io::Error),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Pipeline(#[from] PipelineError),
    #[error("{0}")]
    Format(#[from] FormatError),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = Command::new("richtext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize, parse and lay out richtext documents")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the richtext file, or '-' for stdin")
                .required_unless_present("list-formats")
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default from configuration: treeviz)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("ascii")
                .long("ascii")
                .help("Start in US-ASCII instead of UTF-8")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("case-sensitive")
                .long("case-sensitive")
                .help("Compare command names case-sensitively")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("offsets")
                .long("offsets")
                .help("Show byte offsets in tree output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    match run(&matches) {
        Ok(output) => print!("{output}"),
        Err(error) => {
            if let CliError::Pipeline(pipeline_error) = &error {
                for warning in pipeline_error.warnings() {
                    warn!("{warning}");
                }
            }
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}

fn run(matches: &ArgMatches) -> Result<String, CliError> {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(DEFAULT_CONFIG_FILE),
    };
    if matches.get_flag("ascii") {
        loader = loader.set_override("parsing.utf8", false)?;
    }
    if matches.get_flag("case-sensitive") {
        loader = loader.set_override("parsing.case_insensitive_commands", false)?;
    }
    if matches.get_flag("offsets") {
        loader = loader.set_override("output.show_offsets", true)?;
    }
    if let Some(format) = matches.get_one::<String>("format") {
        loader = loader.set_override("output.format", format.as_str())?;
    }
    let config = loader.build()?;

    let path = matches
        .get_one::<String>("path")
        .map(String::as_str)
        .unwrap_or("-");
    let source = read_source(path)?;
    let document = DocumentLoader::from_bytes(source)
        .with_options(ProcessOptions::from(config.parsing))
        .process(None)?;
    for warning in &document.warnings {
        warn!("{warning}");
    }

    let mut registry = FormatRegistry::with_defaults();
    if config.output.show_offsets {
        registry.register(TreevizRenderer::with_offsets());
        registry.register(AstTreevizRenderer::new(true));
    }
    Ok(registry.render(&document, &config.output.format)?)
}

fn read_source(path: &str) -> io::Result<Vec<u8>> {
    if path == "-" {
        let mut source = Vec::new();
        io::stdin().read_to_end(&mut source)?;
        return Ok(source);
    }
    std::fs::read(path)
}

fn handle_list_formats_command() {
    println!("Available output formats:\n");
    for (name, description) in FormatRegistry::with_defaults().describe() {
        println!("  {name}");
        println!("    {description}");
    }
}
