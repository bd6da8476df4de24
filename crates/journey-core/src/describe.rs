//! Human-readable names and descriptions producers attach to insights.

use chrono::{DateTime, Utc};

/// Emoji shown next to an emotion. Unknown emotions get a magnifier.
#[must_use]
pub fn emotion_emoji(emotion: &str) -> &'static str {
    match emotion {
        "Anxiety" => "🌧️",
        "Sadness" => "😢",
        "Anger" => "😠",
        "Fear" => "😨",
        "Joy" => "😊",
        "Hope" => "✨",
        "Pride" => "🏆",
        "Guilt" => "😓",
        "Shame" => "🙈",
        "Disappointment" => "😔",
        _ => "🔍",
    }
}

#[must_use]
pub fn turning_point_name(emotion: &str) -> String {
    format!("{emotion} Turning Point")
}

#[must_use]
pub fn correlation_name(emotion: &str, topic: &str) -> String {
    format!("{emotion} × {topic} Correlation")
}

#[must_use]
pub fn challenge_persistence_name(challenge: &str) -> String {
    format!("Challenge Persistence: {challenge}")
}

/// e.g. `⚡ On Jan 10 your anxiety decreased by 0.5 points after Insight 'Reframing'.`
#[must_use]
pub fn format_turning_point_description(
    emotion: &str,
    date: DateTime<Utc>,
    previous_intensity: f64,
    current_intensity: f64,
    insight_name: Option<&str>,
) -> String {
    let change = round_tenths(previous_intensity - current_intensity);
    let change_text = if change > 0.0 {
        format!("decreased by {change:.1}")
    } else {
        format!("increased by {:.1}", change.abs())
    };
    let day = date.format("%b %d");
    let emotion = emotion.to_lowercase();

    match insight_name {
        Some(insight) => {
            format!("⚡ On {day} your {emotion} {change_text} points after Insight '{insight}'.")
        }
        None => format!("⚡ On {day} your {emotion} {change_text} points."),
    }
}

/// e.g. `🌧️ Anxiety spikes 75.0% of the time when 'Work' appears.`
#[must_use]
pub fn format_correlation_description(emotion: &str, topic: &str, percentage: f64) -> String {
    format!(
        "{} {emotion} spikes {percentage:.1}% of the time when '{topic}' appears.",
        emotion_emoji(emotion)
    )
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
