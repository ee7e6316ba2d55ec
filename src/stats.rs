use itertools::Itertools;
use std::collections::HashMap;

use crate::session::StudySession;
use crate::subject::{Subject, HOURS_PER_CREDIT, SEMESTER_GOAL_HOURS};

/// Accumulated time and earned credits for one catalog subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectStat {
    pub subject_id: String,
    pub seconds: u64,
    pub credits: f64,
}

/// Derived view over the full session list. Never persisted; recomputed on
/// demand from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedStats {
    pub total_seconds: u64,
    pub total_credits: f64,
    /// Progress toward the semester goal, clamped to 100.
    pub progress_percentage: f64,
    /// Exactly one entry per catalog subject, zero entries included.
    pub subject_breakdown: Vec<SubjectStat>,
}

impl AggregatedStats {
    pub fn empty(subjects: &[Subject]) -> Self {
        calculate_stats(subjects, &[])
    }

    pub fn total_hours(&self) -> f64 {
        self.total_seconds as f64 / 3600.0
    }

    pub fn for_subject(&self, subject_id: &str) -> Option<&SubjectStat> {
        self.subject_breakdown
            .iter()
            .find(|s| s.subject_id == subject_id)
    }
}

/// Aggregate the session list against the subject catalog.
///
/// Pure and deterministic. Sessions whose subject id is not in the catalog
/// contribute to neither a bucket nor the totals, so `total_seconds` always
/// equals the sum over the breakdown.
pub fn calculate_stats(subjects: &[Subject], sessions: &[StudySession]) -> AggregatedStats {
    let seconds_by_subject: HashMap<&str, u64> = sessions
        .iter()
        .map(|s| (s.subject_id.as_str(), s.duration_seconds))
        .into_grouping_map()
        .sum();

    let mut total_seconds = 0u64;
    let subject_breakdown = subjects
        .iter()
        .map(|sub| {
            let seconds = seconds_by_subject.get(sub.id).copied().unwrap_or(0);
            total_seconds += seconds;
            SubjectStat {
                subject_id: sub.id.to_string(),
                seconds,
                credits: seconds as f64 / 3600.0 / HOURS_PER_CREDIT,
            }
        })
        .collect();

    let total_hours = total_seconds as f64 / 3600.0;
    let total_credits = total_hours / HOURS_PER_CREDIT;
    let progress_percentage = (total_hours / SEMESTER_GOAL_HOURS * 100.0).min(100.0);

    AggregatedStats {
        total_seconds,
        total_credits,
        progress_percentage,
        subject_breakdown,
    }
}

/// Start instant of the most recent session, in Unix millis.
pub fn last_session_end(sessions: &[StudySession]) -> Option<i64> {
    sessions.iter().map(|s| s.ended_at_millis()).max()
}
