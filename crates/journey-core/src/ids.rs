//! ID prefixes and generation.
//!
//! IDs have the form `{prefix}-{16 hex chars}`, e.g. `turn-9f86d081884c7d65`.
//! The persistence layer assigns them on first save.

use crate::errors::CoreError;

pub const PREFIX_TURNING_POINT: &str = "turn";
pub const PREFIX_CORRELATION: &str = "corr";
pub const PREFIX_CASCADE_MAP: &str = "casc";
pub const PREFIX_FUTURE_PREDICTION: &str = "pred";
pub const PREFIX_CHALLENGE_PERSISTENCE: &str = "chal";
pub const PREFIX_THERAPIST_SNAPSHOT: &str = "ther";
pub const PREFIX_BADGE: &str = "badge";

/// Generate a fresh random ID with the given prefix.
///
/// # Errors
///
/// Returns `CoreError::Other` if the OS entropy source is unavailable.
pub fn generate_id(prefix: &str) -> Result<String, CoreError> {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes)
        .map_err(|e| CoreError::Other(anyhow::anyhow!("entropy source failed: {e}")))?;
    Ok(format_id(prefix, &bytes))
}

fn format_id(prefix: &str, bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut id = String::with_capacity(prefix.len() + 1 + bytes.len() * 2);
    id.push_str(prefix);
    id.push('-');
    for byte in bytes {
        let _ = write!(id, "{byte:02x}");
    }
    id
}
