//! Wall-clock helpers

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix time in milliseconds
pub fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
