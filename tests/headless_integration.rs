use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use moaa::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use moaa::store::{MemoryRecoveryStore, MemorySessionStore, RecoveryStore, SessionStore};
use moaa::timer::{transition, TimerEffect, TimerEvent, TimerState};

const T0: i64 = 1_700_000_000_000;

// Headless integration using the internal runtime + timer machine without a
// TTY: key events start and stop a run, ticks advance a synthetic clock, and
// effects are interpreted against in-memory stores.
#[test]
fn headless_stopwatch_flow_commits_one_session() {
    let sessions = MemorySessionStore::default();
    let recovery = MemoryRecoveryStore::default();

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let ticker = FixedTicker::new(Duration::from_millis(5));
    let runner = Runner::new(es, ticker);

    // space starts the run; the loop stops it once five synthetic seconds pass
    tx.send(AppEvent::Key(KeyEvent::new(
        KeyCode::Char(' '),
        KeyModifiers::NONE,
    )))
    .unwrap();

    let mut state = TimerState::Idle;
    let mut now = T0;
    let mut steps = 0u32;

    loop {
        steps += 1;
        assert!(steps < 100, "flow should settle quickly");

        let event = match runner.step() {
            AppEvent::Tick => {
                now += 1_000;
                if state.is_running() && state.elapsed_secs() >= 5 {
                    TimerEvent::Stop { now }
                } else {
                    TimerEvent::Tick { now }
                }
            }
            AppEvent::Resize => continue,
            AppEvent::Key(key) => match key.code {
                KeyCode::Char(' ') => TimerEvent::Start {
                    subject_id: "mat202".into(),
                    now,
                },
                _ => continue,
            },
        };

        let (next, effects) = transition(state, event);
        state = next;
        for effect in effects {
            match effect {
                TimerEffect::SaveRecovery(rec) => recovery.save(&rec).unwrap(),
                TimerEffect::ClearRecovery => recovery.clear().unwrap(),
                TimerEffect::CommitSession {
                    subject_id,
                    start_time,
                    duration_seconds,
                } => sessions
                    .append(&moaa::session::StudySession::new(
                        subject_id,
                        start_time,
                        duration_seconds,
                    ))
                    .unwrap(),
            }
        }

        if !state.is_running() && !sessions.read_all().is_empty() {
            break;
        }
    }

    let committed = sessions.read_all();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].subject_id, "mat202");
    assert!(committed[0].duration_seconds >= 5);
    assert!(recovery.load().is_none());
}

#[test]
fn headless_recovery_resumes_across_a_restart() {
    let recovery = MemoryRecoveryStore::default();

    // First "process": start a run, then drop the state without stopping.
    let (state, effects) = transition(
        TimerState::Idle,
        TimerEvent::Start {
            subject_id: "mas130".into(),
            now: T0,
        },
    );
    for effect in effects {
        if let TimerEffect::SaveRecovery(rec) = effect {
            recovery.save(&rec).unwrap();
        }
    }
    assert!(state.is_running());
    drop(state);

    // Second "process": recovery record is still there, 65 seconds later.
    let rec = recovery.load().expect("recovery record should survive");
    let (state, _) = transition(
        TimerState::Idle,
        TimerEvent::Recover {
            recovery: rec,
            now: T0 + 65_000,
        },
    );

    assert!(state.is_running());
    assert_eq!(state.elapsed_secs(), 65);
    assert_eq!(state.subject_id(), Some("mas130"));
}
