use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, InsightFileArgs, SchemaCommands, StoreCommands};

/// Top-level CLI parser for the `journey` binary.
#[derive(Debug, Parser)]
#[command(name = "journey", version, about = "Insight Journey - therapy insight model toolbox")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Drop unknown fields instead of rejecting them
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Store directory (defaults to `store.dir` from config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            lenient: self.lenient,
            store: self.store.clone(),
        }
    }
}
