//! Behaviour shared by every `InsightStore`, plus JSONL log replay.

use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use journey_core::clock::{Clock, FixedClock};
use journey_core::entities::{Correlation, InsightBase, TurningPoint};
use journey_core::enums::{InsightKind, Strictness};
use journey_core::errors::CoreError;
use journey_core::insight::Insight;
use journey_schema::InsightCodec;
use journey_store::{InsightStore, JsonlStore, LOG_FILE, MemoryStore, StoreError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

fn codec() -> Arc<InsightCodec> {
    Arc::new(InsightCodec::with_clock(Strictness::Strict, Arc::new(FixedClock(at(20)))).unwrap())
}

fn correlation(user_id: &str, clock: &dyn Clock) -> Insight {
    Insight::Correlation(Correlation {
        base: InsightBase::new(user_id, "Anxiety × Work Correlation", "Anxiety spikes at work", clock),
        emotion_name: "Anxiety".into(),
        topic_name: "Work".into(),
        correlation_percentage: 75.0,
        occurrence_count: 6,
        confidence_score: 0.6,
    })
}

fn turning_point(user_id: &str, clock: &dyn Clock) -> Insight {
    Insight::TurningPoint(TurningPoint {
        base: InsightBase::new(user_id, "Anxiety Turning Point", "Anxiety dropped", clock),
        turning_date: at(10),
        emotion_name: "Anxiety".into(),
        previous_intensity: 0.8,
        current_intensity: 0.3,
        insight_id: None,
        insight_name: None,
        sessions_before: None,
        sessions_after: None,
    })
}

enum Backend {
    Memory,
    Jsonl,
}

/// Keeps the temp dir alive alongside the store.
struct Fixture {
    store: Box<dyn InsightStore>,
    _dir: Option<TempDir>,
}

fn fixture(backend: &Backend) -> Fixture {
    match backend {
        Backend::Memory => Fixture {
            store: Box::new(MemoryStore::new(codec())),
            _dir: None,
        },
        Backend::Jsonl => {
            let dir = TempDir::new().unwrap();
            let store = JsonlStore::open(dir.path(), codec()).unwrap();
            Fixture {
                store: Box::new(store),
                _dir: Some(dir),
            }
        }
    }
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::jsonl(Backend::Jsonl)]
fn save_assigns_prefixed_id(#[case] backend: Backend) {
    let fx = fixture(&backend);
    let saved = fx.store.save(correlation("u1", &FixedClock(at(5)))).unwrap();

    let id = saved.id().unwrap().to_string();
    assert!(id.starts_with(&format!("{}-", InsightKind::Correlation.id_prefix())), "{id}");
    assert_eq!(fx.store.get(&id).unwrap(), saved);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::jsonl(Backend::Jsonl)]
fn get_unknown_id_is_not_found(#[case] backend: Backend) {
    let fx = fixture(&backend);
    let err = fx.store.get("corr-0000000000000000").unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
    assert_eq!(CoreError::from(err).status_code(), 404);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::jsonl(Backend::Jsonl)]
fn save_with_existing_id_replaces(#[case] backend: Backend) {
    let fx = fixture(&backend);
    let mut saved = fx.store.save(correlation("u1", &FixedClock(at(5)))).unwrap();
    if let Insight::Correlation(c) = &mut saved {
        c.occurrence_count = 9;
    }
    saved.touch(&FixedClock(at(6)));
    fx.store.save(saved.clone()).unwrap();

    let id = saved.id().unwrap();
    assert_eq!(fx.store.get(id).unwrap(), saved);
    assert_eq!(fx.store.list_for_user("u1").unwrap().len(), 1);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::jsonl(Backend::Jsonl)]
fn owner_cannot_change(#[case] backend: Backend) {
    let fx = fixture(&backend);
    let mut saved = fx.store.save(correlation("u1", &FixedClock(at(5)))).unwrap();
    saved.base_mut().user_id = "u2".into();

    let err = fx.store.save(saved).unwrap_err();
    assert!(matches!(err, StoreError::OwnerChanged { ref stored, .. } if stored == "u1"));
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::jsonl(Backend::Jsonl)]
fn invalid_insight_is_not_stored(#[case] backend: Backend) {
    let fx = fixture(&backend);
    let mut insight = correlation("u1", &FixedClock(at(5)));
    if let Insight::Correlation(c) = &mut insight {
        c.correlation_percentage = 150.0;
    }

    let err = fx.store.save(insight).unwrap_err();
    let core = CoreError::from(err);
    assert_eq!(core.violations()[0].field, "correlation_percentage");
    assert!(fx.store.list_for_user("u1").unwrap().is_empty());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::jsonl(Backend::Jsonl)]
fn list_is_per_user_newest_first(#[case] backend: Backend) {
    let fx = fixture(&backend);
    let older = fx.store.save(correlation("u1", &FixedClock(at(3)))).unwrap();
    let newer = fx.store.save(turning_point("u1", &FixedClock(at(8)))).unwrap();
    fx.store.save(correlation("u2", &FixedClock(at(9)))).unwrap();

    let listed = fx.store.list_for_user("u1").unwrap();
    assert_eq!(listed, [newer, older]);
    assert!(fx.store.list_for_user("nobody").unwrap().is_empty());
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::jsonl(Backend::Jsonl)]
fn delete_removes_and_second_delete_is_not_found(#[case] backend: Backend) {
    let fx = fixture(&backend);
    let saved = fx.store.save(correlation("u1", &FixedClock(at(5)))).unwrap();
    let id = saved.id().unwrap();

    fx.store.delete(id).unwrap();
    assert!(matches!(fx.store.get(id), Err(StoreError::NotFound(_))));
    assert!(matches!(fx.store.delete(id), Err(StoreError::NotFound(_))));
}

// --- JSONL specifics ---

#[test]
fn jsonl_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let (kept, deleted) = {
        let store = JsonlStore::open(dir.path(), codec()).unwrap();
        let kept = store.save(correlation("u1", &FixedClock(at(5)))).unwrap();
        let deleted = store.save(turning_point("u1", &FixedClock(at(6)))).unwrap();
        store.delete(deleted.id().unwrap()).unwrap();
        (kept, deleted)
    };

    let reopened = JsonlStore::open(dir.path(), codec()).unwrap();
    assert_eq!(reopened.replay_stats().applied, 3);
    assert_eq!(reopened.get(kept.id().unwrap()).unwrap(), kept);
    assert!(matches!(
        reopened.get(deleted.id().unwrap()),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn jsonl_replay_skips_bad_lines() {
    let dir = TempDir::new().unwrap();
    let saved = {
        let store = JsonlStore::open(dir.path(), codec()).unwrap();
        store.save(correlation("u1", &FixedClock(at(5)))).unwrap()
    };

    let mut log = std::fs::OpenOptions::new()
        .append(true)
        .open(dir.path().join(LOG_FILE))
        .unwrap();
    writeln!(log, "this is not json").unwrap();
    writeln!(log, r#"{{"v":2,"ts":"2024-01-10T00:00:00Z","op":"delete","id":"x"}}"#).unwrap();
    drop(log);

    let reopened = JsonlStore::open(dir.path(), codec()).unwrap();
    assert_eq!(reopened.replay_stats().applied, 1);
    assert_eq!(reopened.replay_stats().skipped, 2);
    assert_eq!(reopened.get(saved.id().unwrap()).unwrap(), saved);
}

#[test]
fn jsonl_save_after_torn_line_survives_reopen() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(LOG_FILE),
        r#"{"v":1,"ts":"2024-01-10T00:00:00Z","op":"put","id":"corr-00000000000000bb","da"#,
    )
    .unwrap();

    let saved = {
        let store = JsonlStore::open(dir.path(), codec()).unwrap();
        assert_eq!(store.replay_stats().skipped, 1);
        store.save(correlation("u1", &FixedClock(at(5)))).unwrap()
    };

    let reopened = JsonlStore::open(dir.path(), codec()).unwrap();
    assert_eq!(reopened.replay_stats().applied, 1);
    assert_eq!(reopened.replay_stats().skipped, 1);
    assert_eq!(reopened.get(saved.id().unwrap()).unwrap(), saved);
}

#[test]
fn jsonl_reads_revalidate_stored_data() {
    let dir = TempDir::new().unwrap();
    let line = serde_json::json!({
        "v": 1,
        "ts": "2024-01-10T00:00:00Z",
        "op": "put",
        "id": "corr-00000000000000aa",
        "data": {
            "kind": "correlation",
            "id": "corr-00000000000000aa",
            "user_id": "u1",
            "created_at": "2024-01-10T00:00:00Z",
            "updated_at": "2024-01-10T00:00:00Z",
            "name": "Drifted",
            "description": "Written by an older release",
            "emotion_name": "Anxiety",
            "topic_name": "Work",
            "correlation_percentage": 75.0,
            "occurrence_count": 6,
            "confidence_score": 0.6,
            "legacy_score": 3
        }
    });
    std::fs::write(dir.path().join(LOG_FILE), format!("{line}\n")).unwrap();

    let store = JsonlStore::open(dir.path(), codec()).unwrap();
    let err = store.get("corr-00000000000000aa").unwrap_err();
    let core = CoreError::from(err);
    assert_eq!(core.violations()[0].field, "legacy_score");
}
