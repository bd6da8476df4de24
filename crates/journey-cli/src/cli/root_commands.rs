use std::path::PathBuf;

use clap::{Args, Subcommand};
use journey_core::enums::{ChallengeStatus, InsightKind};

/// Root subcommands for the `journey` binary.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Inspect the registered JSON Schemas.
    Schema {
        #[command(subcommand)]
        action: SchemaCommands,
    },
    /// Construct an insight from a JSON file and print its canonical form.
    Validate(InsightFileArgs),
    /// Operate on the insight store.
    Store {
        #[command(subcommand)]
        action: StoreCommands,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum SchemaCommands {
    /// List registered schema names.
    List,
    /// Print one schema.
    Show { name: String },
}

/// A JSON file holding one insight's fields.
#[derive(Clone, Debug, Args)]
pub struct InsightFileArgs {
    pub file: PathBuf,

    /// Variant to construct. Required when the file has no `kind` tag.
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<InsightKind>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum StoreCommands {
    /// Validate an insight file and save it.
    Put(InsightFileArgs),
    /// Print a stored insight.
    Get { id: String },
    /// List a user's insights, most recently updated first.
    List {
        #[arg(long)]
        user: String,
    },
    /// Delete a stored insight.
    Delete { id: String },
    /// Move a challenge to another lifecycle status.
    Status {
        id: String,
        #[arg(value_parser = parse_status)]
        status: ChallengeStatus,
    },
    /// Record the client's reflection on a therapist snapshot.
    Reflect { id: String, text: String },
}

fn parse_kind(s: &str) -> Result<InsightKind, String> {
    s.parse()
}

fn parse_status(s: &str) -> Result<ChallengeStatus, String> {
    s.parse()
}
