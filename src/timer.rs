use serde::{Deserialize, Serialize};

/// Persisted while a run is active so a restart can resume it. Cleared on
/// pause and stop. Wire shape matches the session store: camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerRecovery {
    /// Unix timestamp in milliseconds of the run's start instant.
    pub start_time: i64,
    pub subject_id: String,
}

/// Stopwatch state. `elapsed_secs` is display state; the start instant is
/// the source of truth, so elapsed time is always a wall-clock delta and
/// survives restarts without drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running {
        subject_id: String,
        /// Unix timestamp in milliseconds, fixed for the run.
        started_at: i64,
        elapsed_secs: u64,
    },
}

impl TimerState {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running { .. })
    }

    pub fn elapsed_secs(&self) -> u64 {
        match self {
            TimerState::Idle => 0,
            TimerState::Running { elapsed_secs, .. } => *elapsed_secs,
        }
    }

    pub fn subject_id(&self) -> Option<&str> {
        match self {
            TimerState::Idle => None,
            TimerState::Running { subject_id, .. } => Some(subject_id),
        }
    }
}

/// Inputs to the state machine. `now` is always Unix millis, injected by the
/// caller so transitions stay deterministic under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    Start { subject_id: String, now: i64 },
    Pause,
    Stop { now: i64 },
    Tick { now: i64 },
    Recover { recovery: TimerRecovery, now: i64 },
}

/// Side effects requested by a transition, interpreted by the owner against
/// the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEffect {
    SaveRecovery(TimerRecovery),
    ClearRecovery,
    CommitSession {
        subject_id: String,
        start_time: i64,
        duration_seconds: u64,
    },
}

fn wall_elapsed_secs(started_at: i64, now: i64) -> u64 {
    ((now - started_at).max(0) / 1000) as u64
}

/// Advance the state machine. Pure: storage happens only through the
/// returned effects.
///
/// Pause intentionally commits nothing and clears the recovery record; only
/// stop appends a session, and only when wall-clock elapsed time is positive.
pub fn transition(state: TimerState, event: TimerEvent) -> (TimerState, Vec<TimerEffect>) {
    match (state, event) {
        (TimerState::Idle, TimerEvent::Start { subject_id, now }) => {
            let recovery = TimerRecovery {
                start_time: now,
                subject_id: subject_id.clone(),
            };
            (
                TimerState::Running {
                    subject_id,
                    started_at: now,
                    elapsed_secs: 0,
                },
                vec![TimerEffect::SaveRecovery(recovery)],
            )
        }
        (TimerState::Idle, TimerEvent::Recover { recovery, now }) => (
            TimerState::Running {
                elapsed_secs: wall_elapsed_secs(recovery.start_time, now),
                subject_id: recovery.subject_id,
                started_at: recovery.start_time,
            },
            vec![],
        ),
        (
            TimerState::Running {
                subject_id,
                started_at,
                ..
            },
            TimerEvent::Tick { now },
        ) => (
            TimerState::Running {
                subject_id,
                started_at,
                elapsed_secs: wall_elapsed_secs(started_at, now),
            },
            vec![],
        ),
        (TimerState::Running { .. }, TimerEvent::Pause) => {
            (TimerState::Idle, vec![TimerEffect::ClearRecovery])
        }
        (
            TimerState::Running {
                subject_id,
                started_at,
                ..
            },
            TimerEvent::Stop { now },
        ) => {
            let duration_seconds = wall_elapsed_secs(started_at, now);
            let mut effects = Vec::new();
            if duration_seconds > 0 {
                effects.push(TimerEffect::CommitSession {
                    subject_id,
                    start_time: started_at,
                    duration_seconds,
                });
            }
            effects.push(TimerEffect::ClearRecovery);
            (TimerState::Idle, effects)
        }
        // Everything else is a no-op: start while running, pause/stop/tick
        // while idle, recover while running.
        (state, _) => (state, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const T0: i64 = 1_700_000_000_000;

    fn start(now: i64) -> TimerEvent {
        TimerEvent::Start {
            subject_id: "mat202".into(),
            now,
        }
    }

    #[test]
    fn start_begins_a_run_and_saves_recovery() {
        let (state, effects) = transition(TimerState::Idle, start(T0));

        assert_matches!(
            &state,
            TimerState::Running {
                subject_id,
                started_at,
                elapsed_secs: 0,
            } if subject_id == "mat202" && *started_at == T0
        );
        assert_eq!(
            effects,
            vec![TimerEffect::SaveRecovery(TimerRecovery {
                start_time: T0,
                subject_id: "mat202".into(),
            })]
        );
    }

    #[test]
    fn tick_tracks_wall_clock_elapsed() {
        let (state, _) = transition(TimerState::Idle, start(T0));
        let (state, effects) = transition(state, TimerEvent::Tick { now: T0 + 5_400 });

        assert_eq!(state.elapsed_secs(), 5);
        assert!(effects.is_empty());
    }

    #[test]
    fn stop_commits_wall_clock_duration_and_clears_recovery() {
        let (state, _) = transition(TimerState::Idle, start(T0));
        let (state, _) = transition(state, TimerEvent::Tick { now: T0 + 1_000 });
        let (state, effects) = transition(state, TimerEvent::Stop { now: T0 + 5_000 });

        assert_eq!(state, TimerState::Idle);
        assert_eq!(
            effects,
            vec![
                TimerEffect::CommitSession {
                    subject_id: "mat202".into(),
                    start_time: T0,
                    duration_seconds: 5,
                },
                TimerEffect::ClearRecovery,
            ]
        );
    }

    #[test]
    fn stop_with_zero_elapsed_commits_nothing() {
        let (state, _) = transition(TimerState::Idle, start(T0));
        let (state, effects) = transition(state, TimerEvent::Stop { now: T0 + 400 });

        assert_eq!(state, TimerState::Idle);
        assert_eq!(effects, vec![TimerEffect::ClearRecovery]);
    }

    #[test]
    fn pause_discards_the_run_without_committing() {
        let (state, _) = transition(TimerState::Idle, start(T0));
        let (state, _) = transition(state, TimerEvent::Tick { now: T0 + 10_000 });
        let (state, effects) = transition(state, TimerEvent::Pause);

        assert_eq!(state, TimerState::Idle);
        assert_eq!(state.elapsed_secs(), 0);
        assert_eq!(effects, vec![TimerEffect::ClearRecovery]);
    }

    #[test]
    fn recover_resumes_the_run_from_wall_clock() {
        let recovery = TimerRecovery {
            start_time: T0,
            subject_id: "mas130".into(),
        };
        let (state, effects) = transition(
            TimerState::Idle,
            TimerEvent::Recover {
                recovery,
                now: T0 + 65_000,
            },
        );

        assert_matches!(
            &state,
            TimerState::Running {
                subject_id,
                started_at,
                elapsed_secs: 65,
            } if subject_id == "mas130" && *started_at == T0
        );
        assert!(effects.is_empty());
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (running, _) = transition(TimerState::Idle, start(T0));
        let (state, effects) = transition(
            running.clone(),
            TimerEvent::Start {
                subject_id: "mas141".into(),
                now: T0 + 1_000,
            },
        );

        assert_eq!(state, running);
        assert!(effects.is_empty());
    }

    #[test]
    fn idle_ignores_pause_stop_and_tick() {
        for event in [
            TimerEvent::Pause,
            TimerEvent::Stop { now: T0 },
            TimerEvent::Tick { now: T0 },
        ] {
            let (state, effects) = transition(TimerState::Idle, event);
            assert_eq!(state, TimerState::Idle);
            assert!(effects.is_empty());
        }
    }

    #[test]
    fn clock_stepping_backwards_clamps_to_zero() {
        let (state, _) = transition(TimerState::Idle, start(T0));
        let (state, _) = transition(state, TimerEvent::Tick { now: T0 - 10_000 });
        assert_eq!(state.elapsed_secs(), 0);
    }

    #[test]
    fn recovery_round_trips_through_json() {
        let recovery = TimerRecovery {
            start_time: T0,
            subject_id: "mat202".into(),
        };
        let json = serde_json::to_string(&recovery).unwrap();
        assert!(json.contains("\"startTime\""));
        assert!(json.contains("\"subjectId\""));
        let back: TimerRecovery = serde_json::from_str(&json).unwrap();
        assert_eq!(back, recovery);
    }
}
