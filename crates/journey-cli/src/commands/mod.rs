pub mod dispatch;
pub mod schema;
pub mod store;
pub mod validate;

use anyhow::Context;
use journey_core::insight::Insight;
use serde_json::Value;

use crate::cli::InsightFileArgs;
use crate::context::AppContext;

/// Read an insight file and run it through the codec.
///
/// With `--kind` the file is constructed as that variant (a `kind` tag in
/// the file must agree); without it the file's own `kind` tag decides.
pub fn load_insight(args: &InsightFileArgs, ctx: &AppContext) -> anyhow::Result<Insight> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", args.file.display()))?;

    let insight = match (args.kind, value) {
        (Some(kind), Value::Object(fields)) => ctx.codec.construct(kind, fields)?,
        (Some(_), _) => anyhow::bail!("{} must contain a JSON object", args.file.display()),
        (None, value) => ctx.codec.from_value(value)?,
    };
    Ok(insight)
}
