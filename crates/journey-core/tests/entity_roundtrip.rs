//! Serde roundtrip and JsonSchema validation tests for all insight types.

use chrono::{TimeZone, Utc};
use schemars::schema_for;
use serde_json::json;
use journey_core::entities::*;
use journey_core::enums::*;
use journey_core::insight::Insight;
use journey_core::responses::*;
use journey_core::validation::{Rule, Violation};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn base(name: &str) -> InsightBase {
    InsightBase {
        id: Some("ins-a3f8b2c1d4e5f607".into()),
        user_id: "u1".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        name: name.into(),
        description: "Generated from the last six sessions".into(),
    }
}

fn turning_point() -> TurningPoint {
    TurningPoint {
        base: base("Anxiety Turning Point"),
        turning_date: Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
        emotion_name: "Anxiety".into(),
        previous_intensity: 0.8,
        current_intensity: 0.3,
        insight_id: Some("ins-00ff".into()),
        insight_name: Some("Reframing catastrophic thoughts".into()),
        sessions_before: Some(vec!["ses-1".into(), "ses-2".into()]),
        sessions_after: None,
    }
}

fn correlation() -> Correlation {
    Correlation {
        base: base("Anxiety × Work Correlation"),
        emotion_name: "Anxiety".into(),
        topic_name: "Work".into(),
        correlation_percentage: 75.0,
        occurrence_count: 6,
        confidence_score: 0.6,
    }
}

fn cascade_map() -> CascadeMap {
    CascadeMap {
        base: base("Insight Cascade Map"),
        nodes: vec![
            CascadeNode {
                id: "n1".into(),
                name: "Boundaries at work".into(),
                date: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
                description: None,
            },
            CascadeNode {
                id: "n2".into(),
                name: "Saying no to family".into(),
                date: Utc.with_ymd_and_hms(2024, 1, 17, 0, 0, 0).unwrap(),
                description: Some("Followed from n1".into()),
            },
        ],
        edges: vec![CascadeEdge {
            source: "n1".into(),
            target: "n2".into(),
            strength: 0.5,
        }],
        root_insight_id: "n1".into(),
    }
}

fn future_prediction() -> FuturePrediction {
    FuturePrediction {
        base: base("Future Focus Prediction"),
        predictions: vec![TopicPrediction {
            topic_name: "Family".into(),
            probability: 0.4,
            related_emotions: vec![RelatedEmotion {
                emotion: "Guilt".into(),
                weight: 6.5,
            }],
        }],
        confidence_score: 0.5,
        based_on_sessions: vec!["ses-3".into(), "ses-4".into(), "ses-5".into()],
    }
}

fn badge() -> ChallengeBadge {
    ChallengeBadge {
        id: "badge-0011223344556677".into(),
        name: "Persistent Worker".into(),
        description: "Consistently working on the challenge 'Procrastination'".into(),
        earned_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        challenge_id: "ch-1".into(),
        challenge_name: "Procrastination".into(),
        session_count: 5,
    }
}

fn challenge() -> ChallengePersistence {
    ChallengePersistence {
        base: base("Challenge Persistence: Procrastination"),
        challenge_id: "ch-1".into(),
        challenge_name: "Procrastination".into(),
        first_appearance: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        persistence_days: 29,
        session_count: 5,
        current_status: ChallengeStatus::Active,
        badges_earned: vec![badge()],
        progress_percentage: 25.0,
    }
}

fn snapshot() -> TherapistSnapshot {
    let mut progress = SnapshotSection::new("Progress at a Glance", VisualizationType::EmotionChart);
    progress.data.insert(
        "Anxiety".into(),
        json!({"latest": 3.0, "earliest": 7.5, "change": -4.5}),
    );
    TherapistSnapshot {
        base: base("Therapy Value Snapshot"),
        progress_overview: progress,
        breakthrough_timeline: SnapshotSection::new("Breakthrough Timeline", VisualizationType::Timeline),
        belief_shifts: SnapshotSection::new("Belief Shifts", VisualizationType::Heatmap),
        action_item_adherence: SnapshotSection::new(
            "Action Item Adherence",
            VisualizationType::ProgressBar,
        ),
        next_session_forecast: Some(SnapshotSection::new(
            "Next Session Forecast",
            VisualizationType::Prediction,
        )),
        client_reflection: None,
        start_date: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2024, 2, 7, 0, 0, 0).unwrap(),
        session_count: 6,
    }
}

roundtrip_and_validate!(turning_point_roundtrip, TurningPoint, turning_point());
roundtrip_and_validate!(correlation_roundtrip, Correlation, correlation());
roundtrip_and_validate!(cascade_map_roundtrip, CascadeMap, cascade_map());
roundtrip_and_validate!(future_prediction_roundtrip, FuturePrediction, future_prediction());
roundtrip_and_validate!(challenge_badge_roundtrip, ChallengeBadge, badge());
roundtrip_and_validate!(challenge_persistence_roundtrip, ChallengePersistence, challenge());
roundtrip_and_validate!(therapist_snapshot_roundtrip, TherapistSnapshot, snapshot());

roundtrip_and_validate!(
    insight_union_roundtrip,
    Insight,
    Insight::CascadeMap(cascade_map())
);

roundtrip_and_validate!(
    all_insights_response_roundtrip,
    AllInsightsResponse,
    AllInsightsResponse::new(
        Some(turning_point()),
        vec![correlation(); 5],
        Some(cascade_map()),
        Some(future_prediction()),
        vec![challenge()],
    )
);

roundtrip_and_validate!(
    error_response_roundtrip,
    ErrorResponse,
    ErrorResponse {
        error: "Bad Request".into(),
        message: "Validation error".into(),
        status_code: 400,
        error_code: "VALIDATION_ERROR".into(),
        violations: vec![Violation::new(
            "edges[0].target",
            Rule::DanglingReference,
            "references unknown node 'n2'",
        )],
    }
);

#[test]
fn insight_serializes_kind_tag_first() {
    let json = serde_json::to_string(&Insight::Correlation(correlation())).unwrap();
    assert!(json.starts_with(r#"{"kind":"correlation","id":"#), "{json}");
}

#[test]
fn timestamps_render_as_rfc3339_utc() {
    let value = serde_json::to_value(turning_point()).unwrap();
    assert_eq!(value["turning_date"], "2024-01-10T00:00:00Z");
}

#[test]
fn all_insights_keeps_first_three_correlations() {
    let response = AllInsightsResponse::new(None, vec![correlation(); 5], None, None, Vec::new());
    assert_eq!(response.correlations.len(), ALL_INSIGHTS_LIMIT);
}

#[test]
fn edge_strength_defaults_to_one() {
    let edge: CascadeEdge = serde_json::from_value(json!({"source": "a", "target": "b"})).unwrap();
    assert!((edge.strength - 1.0).abs() < f64::EPSILON);
}
