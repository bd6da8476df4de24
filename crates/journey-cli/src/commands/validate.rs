use crate::cli::{GlobalFlags, InsightFileArgs};
use crate::commands::load_insight;
use crate::context::AppContext;
use crate::output::output;

/// Handle `journey validate`.
pub fn handle(args: &InsightFileArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let insight = load_insight(args, ctx)?;
    tracing::debug!(kind = %insight.kind(), "insight is valid");
    output(&insight, flags.format)
}
