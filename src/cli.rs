use std::path::PathBuf;

use clap::Parser;

/// An optimistic-sync terminal client for remote task services
#[derive(Debug, Parser)]
#[command(name = "tuido", version, about)]
pub struct Cli {
    /// Open on this project's tab
    #[arg(long)]
    pub project: Option<String>,

    /// Open on a tab filtered to this label
    #[arg(long, conflicts_with = "project")]
    pub label: Option<String>,

    /// Initial grouping: flat, status, or section
    #[arg(long)]
    pub group: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
}
