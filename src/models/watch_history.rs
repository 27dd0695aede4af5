use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::VideoRecord;

/// A video the user has viewed, as recorded by the backend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchHistoryEntry {
    pub user_id: String,
    pub video: VideoRecord,
    /// When the backend recorded the view, if it said so in a readable form
    pub watched_at: Option<DateTime<Utc>>,
}

impl WatchHistoryEntry {
    pub fn from_record(user_id: &str, video: VideoRecord) -> Self {
        let watched_at = video
            .extra
            .get("watched_at")
            .and_then(|v| v.as_str())
            .and_then(parse_watched_at);

        Self {
            user_id: user_id.to_string(),
            video,
            watched_at,
        }
    }
}

/// Accepts RFC 3339 or a naive ISO timestamp (read as UTC)
fn parse_watched_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn record(value: serde_json::Value) -> VideoRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_naive_iso_timestamp_is_read_as_utc() {
        let entry = WatchHistoryEntry::from_record(
            "user-1",
            record(json!({ "id": "abcdefghijk", "watched_at": "2024-03-05T14:07:09.123456" })),
        );

        let watched_at = entry.watched_at.unwrap();
        assert_eq!(watched_at.year(), 2024);
        assert_eq!(watched_at.month(), 3);
        assert_eq!(watched_at.hour(), 14);
        assert_eq!(entry.user_id, "user-1");
    }

    #[test]
    fn test_rfc3339_timestamp_is_normalized_to_utc() {
        let entry = WatchHistoryEntry::from_record(
            "user-1",
            record(json!({ "id": 1, "watched_at": "2024-03-05T14:07:09+02:00" })),
        );

        assert_eq!(entry.watched_at.unwrap().hour(), 12);
    }

    #[test]
    fn test_missing_or_garbled_timestamp_is_none() {
        let missing = WatchHistoryEntry::from_record("u", record(json!({ "id": 1 })));
        assert_eq!(missing.watched_at, None);

        let garbled =
            WatchHistoryEntry::from_record("u", record(json!({ "id": 1, "watched_at": "yesterday" })));
        assert_eq!(garbled.watched_at, None);
    }
}
