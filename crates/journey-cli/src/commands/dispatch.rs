use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Validate(args) => commands::validate::handle(&args, ctx, flags),
        Commands::Store { action } => commands::store::handle(&action, ctx, flags),
        Commands::Schema { .. } => unreachable!("schema is pre-dispatched in main"),
    }
}
