//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// modkit - Discover, inspect and toggle application modules
#[derive(Parser, Debug)]
#[command(name = "modkit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to modules.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List discovered modules
    List(ListArgs),

    /// Show details of one module
    Show(ShowArgs),

    /// Enable modules
    Enable(ToggleArgs),

    /// Disable modules
    Disable(ToggleArgs),

    /// Delete a module directory and its status
    Delete(DeleteArgs),

    /// Remember a module for later commands
    Use(UseArgs),

    /// Forget the module in use
    Unuse,

    /// Clear every stored module status
    Reset(ResetArgs),

    /// Show the modules a module requires
    Requirements(RequirementsArgs),

    /// Resolve a `module:path` asset reference to its public URL
    Asset(AssetArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only enabled modules
    #[arg(long, conflicts_with = "disabled")]
    pub enabled: bool,

    /// Only disabled modules
    #[arg(long)]
    pub disabled: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Module name (default: the module in use)
    pub name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ToggleArgs {
    /// Module names (default: the module in use)
    #[arg(conflicts_with = "all")]
    pub names: Vec<String>,

    /// Apply to every discovered module
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Module name
    pub name: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct UseArgs {
    /// Module name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RequirementsArgs {
    /// Module name (default: the module in use)
    pub name: Option<String>,

    /// Follow requirements transitively, in load order
    #[arg(short, long)]
    pub transitive: bool,
}

#[derive(Args, Debug)]
pub struct AssetArgs {
    /// Asset reference, e.g. `blog:css/app.css`
    pub reference: String,
}
