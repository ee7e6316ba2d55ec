use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A completed unit of study time. Immutable once persisted; sessions are
/// appended on timer stop and never updated or deleted.
///
/// Field names on the wire stay camelCase, matching the store format:
/// `{"id", "subjectId", "startTime", "durationSeconds"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub id: String,
    pub subject_id: String,
    /// Unix timestamp in milliseconds.
    pub start_time: i64,
    pub duration_seconds: u64,
}

impl StudySession {
    pub fn new(subject_id: impl Into<String>, start_time: i64, duration_seconds: u64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            subject_id: subject_id.into(),
            start_time,
            duration_seconds,
        }
    }

    /// Start instant in local time, if the stored millis are representable.
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.start_time).single()
    }

    /// Instant the session ended (start plus duration).
    pub fn ended_at_millis(&self) -> i64 {
        self.start_time + (self.duration_seconds as i64) * 1000
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_assigns_unique_ids() {
        let a = StudySession::new("mat202", 0, 60);
        let b = StudySession::new("mat202", 0, 60);
        assert_ne!(a.id, b.id);
        assert_eq!(a.subject_id, "mat202");
        assert_eq!(a.duration_seconds, 60);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let session = StudySession {
            id: "abc".into(),
            subject_id: "mat202".into(),
            start_time: 1_700_000_000_000,
            duration_seconds: 3600,
        };
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"subjectId\":\"mat202\""));
        assert!(json.contains("\"startTime\":1700000000000"));
        assert!(json.contains("\"durationSeconds\":3600"));

        let back: StudySession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn ended_at_adds_duration() {
        let session = StudySession::new("mas130", 1_000, 5);
        assert_eq!(session.ended_at_millis(), 6_000);
    }
}
