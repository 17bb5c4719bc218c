//! Timestamp utilities

use chrono::{Local, NaiveDateTime};

/// Current local wall-clock time
///
/// Weeks are anchored to the office's local calendar, not UTC.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        assert!(timestamp.year() >= 2024);
        assert!(timestamp.year() < 2100);
    }
}
