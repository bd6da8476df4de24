use journey_core::enums::{ChallengeStatus, InsightKind};
use journey_core::errors::{CoreError, ValidationErrors};
use journey_core::insight::Insight;
use journey_core::responses::ReflectionResponse;
use journey_core::validation::{Rule, Violation};
use journey_store::InsightStore;
use serde_json::json;

use crate::cli::{GlobalFlags, StoreCommands};
use crate::commands::load_insight;
use crate::context::AppContext;
use crate::output::output;

/// Handle `journey store`.
pub fn handle(action: &StoreCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    match action {
        StoreCommands::Put(args) => {
            let saved = store.save(load_insight(args, ctx)?).map_err(CoreError::from)?;
            output(&saved, flags.format)
        }
        StoreCommands::Get { id } => output(&get(&store, id)?, flags.format),
        StoreCommands::List { user } => {
            let mut insights = store.list_for_user(user).map_err(CoreError::from)?;
            insights.truncate(ctx.limit(flags));
            output(&insights, flags.format)
        }
        StoreCommands::Delete { id } => {
            store.delete(id).map_err(CoreError::from)?;
            output(&json!({ "deleted": id }), flags.format)
        }
        StoreCommands::Status { id, status } => {
            output(&set_status(&store, ctx, id, *status)?, flags.format)
        }
        StoreCommands::Reflect { id, text } => {
            reflect(&store, ctx, id, text)?;
            output(&ReflectionResponse::added(), flags.format)
        }
    }
}

fn get(store: &dyn InsightStore, id: &str) -> Result<Insight, CoreError> {
    store.get(id).map_err(CoreError::from)
}

fn set_status(
    store: &dyn InsightStore,
    ctx: &AppContext,
    id: &str,
    status: ChallengeStatus,
) -> Result<Insight, CoreError> {
    let mut insight = get(store, id)?;
    let kind = insight.kind();
    let Insight::ChallengePersistence(challenge) = &mut insight else {
        return Err(wrong_kind(kind, "challenge_persistence"));
    };
    challenge.transition(status, ctx.codec.clock())?;
    tracing::debug!(%id, %status, "challenge status changed");
    save(store, insight)
}

fn reflect(
    store: &dyn InsightStore,
    ctx: &AppContext,
    id: &str,
    text: &str,
) -> Result<Insight, CoreError> {
    let mut insight = get(store, id)?;
    let kind = insight.kind();
    let Insight::TherapistSnapshot(snapshot) = &mut insight else {
        return Err(wrong_kind(kind, "therapist_snapshot"));
    };
    snapshot.set_client_reflection(text, ctx.codec.clock())?;
    save(store, insight)
}

fn save(store: &dyn InsightStore, insight: Insight) -> Result<Insight, CoreError> {
    store.save(insight).map_err(CoreError::from)
}

fn wrong_kind(actual: InsightKind, expected: &str) -> CoreError {
    CoreError::Validation(ValidationErrors::new(vec![Violation::new(
        "kind",
        Rule::Mismatch,
        format!("expected '{expected}', got '{actual}'"),
    )]))
}
