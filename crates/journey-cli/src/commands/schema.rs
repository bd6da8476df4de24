use journey_schema::SchemaRegistry;

use crate::cli::{GlobalFlags, SchemaCommands};
use crate::output::output;

/// Handle `journey schema`.
pub fn handle(action: &SchemaCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    let registry = SchemaRegistry::new();
    match action {
        SchemaCommands::List => output(&registry.list(), flags.format),
        SchemaCommands::Show { name } => output(show(&registry, name)?, flags.format),
    }
}

fn show<'a>(registry: &'a SchemaRegistry, name: &str) -> anyhow::Result<&'a serde_json::Value> {
    registry.get(name).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown schema '{name}' (known: {})",
            registry.list().join(", ")
        )
    })
}
