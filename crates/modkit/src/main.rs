//! modkit CLI - Discover, inspect and toggle application modules
//!
//! This is the main entry point for the modkit command-line interface.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::List(args) => commands::list::run(args, config),
        Commands::Show(args) => commands::show::run(args, config),
        Commands::Enable(args) => commands::status::enable(args, config),
        Commands::Disable(args) => commands::status::disable(args, config),
        Commands::Delete(args) => commands::delete::run(args, config),
        Commands::Use(args) => commands::used::use_module(args, config),
        Commands::Unuse => commands::used::unuse(config),
        Commands::Reset(args) => commands::reset::run(args, config),
        Commands::Requirements(args) => commands::requirements::run(args, config),
        Commands::Asset(args) => commands::asset::run(args, config),
    }
}

/// Initialize tracing with appropriate verbosity
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
