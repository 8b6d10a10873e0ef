//! Wall-clock helpers.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as milliseconds since the Unix epoch.
///
/// Saturates to 0 if the system clock is set before the epoch.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_ms_is_recent() {
        // 2020-01-01 in epoch millis; any sane clock is past this.
        assert!(now_ms() > 1_577_836_800_000);
    }
}
