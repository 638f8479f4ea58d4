//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tabroute",
    version,
    about = "Replay tab routing decisions against a recorded browser snapshot"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Engine settings file (JSON).
    #[arg(long, value_name = "FILE", global = true, env = "TABROUTE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long = "log-dir", value_name = "DIR", global = true, env = "TABROUTE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sort every tab into its group's window and print the result.
    Sort(SnapshotArgs),

    /// Rebuild window bindings from tab evidence.
    Rebind(SnapshotArgs),

    /// List tabs a candidate pattern would claim.
    Preview(PreviewArgs),

    /// Route one tab as if it had just navigated.
    Route(RouteArgs),
}

#[derive(Args)]
pub struct SnapshotArgs {
    /// Snapshot file: `{ "windows": [...], "config": {...}, "bindings": {...} }`.
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub input: SnapshotArgs,

    /// Pattern to test; repeat for several.
    #[arg(long = "pattern", value_name = "PATTERN", required = true)]
    pub patterns: Vec<String>,

    /// Treat patterns as regular expressions.
    #[arg(long)]
    pub regex: bool,
}

#[derive(Args)]
pub struct RouteArgs {
    #[command(flatten)]
    pub input: SnapshotArgs,

    /// Tab to route.
    #[arg(long = "tab", value_name = "ID")]
    pub tab_id: i64,
}
