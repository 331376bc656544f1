//! CLI definitions using clap.
//!
//! The install paths themselves always come from the environment Meson
//! sets up for install scripts; flags only tune behavior.

use std::path::PathBuf;

use clap::Parser;

/// Reorganize a staged install tree after `meson install`
#[derive(Parser)]
#[command(name = "relayout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Product name (overrides relayout.toml)
    #[arg(long, env = "RELAYOUT_PRODUCT")]
    pub product: Option<String>,

    /// Layout config file (defaults to relayout.toml in the source root)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Classify the staged tree and print the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,
}
