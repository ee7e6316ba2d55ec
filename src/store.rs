use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::app_dirs::AppDirs;
use crate::session::StudySession;
use crate::timer::TimerRecovery;

/// Append-only persisted collection of completed sessions. The whole list is
/// read and rewritten as one unit; there are no update or delete operations.
pub trait SessionStore {
    /// Full collection, empty on first run. Malformed stored data also reads
    /// as empty; the next append rewrites the file with valid content.
    fn read_all(&self) -> Vec<StudySession>;
    fn append(&self, session: &StudySession) -> io::Result<()>;
}

/// Timer reload-recovery record, present only while a run is active.
pub trait RecoveryStore {
    fn load(&self) -> Option<TimerRecovery>;
    fn save(&self, recovery: &TimerRecovery) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::sessions_path()
            .unwrap_or_else(|| PathBuf::from("moaa_study_sessions.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn read_all(&self) -> Vec<StudySession> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(sessions) = serde_json::from_slice::<Vec<StudySession>>(&bytes) {
                return sessions;
            }
        }
        Vec::new()
    }

    fn append(&self, session: &StudySession) -> io::Result<()> {
        let mut sessions = self.read_all();
        sessions.push(session.clone());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(&sessions).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

#[derive(Debug, Clone)]
pub struct FileRecoveryStore {
    path: PathBuf,
}

impl FileRecoveryStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::recovery_path().unwrap_or_else(|| PathBuf::from("moaa_timer.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileRecoveryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryStore for FileRecoveryStore {
    fn load(&self) -> Option<TimerRecovery> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    fn save(&self, recovery: &TimerRecovery) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(recovery).unwrap_or_default();
        fs::write(&self.path, data)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory session store for unit tests and headless flows
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<Vec<StudySession>>,
}

impl SessionStore for MemorySessionStore {
    fn read_all(&self) -> Vec<StudySession> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn append(&self, session: &StudySession) -> io::Result<()> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner()).push(session.clone());
        Ok(())
    }
}

/// In-memory recovery store for unit tests and headless flows
#[derive(Debug, Default)]
pub struct MemoryRecoveryStore {
    recovery: Mutex<Option<TimerRecovery>>,
}

impl RecoveryStore for MemoryRecoveryStore {
    fn load(&self) -> Option<TimerRecovery> {
        self.recovery.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save(&self, recovery: &TimerRecovery) -> io::Result<()> {
        *self.recovery.lock().unwrap_or_else(|e| e.into_inner()) = Some(recovery.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.recovery.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_all_is_empty_on_first_run() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::with_path(dir.path().join("sessions.json"));
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn append_then_read_round_trips_all_fields() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::with_path(dir.path().join("sessions.json"));

        let session = StudySession::new("mat202", 1_700_000_000_000, 300);
        store.append(&session).unwrap();

        let sessions = store.read_all();
        assert_eq!(sessions, vec![session]);
    }

    #[test]
    fn append_accumulates_in_order() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::with_path(dir.path().join("sessions.json"));

        let first = StudySession::new("mat202", 1_000, 60);
        let second = StudySession::new("mas130", 2_000, 120);
        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.read_all(), vec![first, second]);
    }

    #[test]
    fn malformed_file_reads_as_empty_and_recovers_on_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        fs::write(&path, b"{not json").unwrap();

        let store = FileSessionStore::with_path(&path);
        assert!(store.read_all().is_empty());

        let session = StudySession::new("mas141", 3_000, 90);
        store.append(&session).unwrap();
        assert_eq!(store.read_all(), vec![session]);
    }

    #[test]
    fn recovery_save_load_clear() {
        let dir = tempdir().unwrap();
        let store = FileRecoveryStore::with_path(dir.path().join("timer.json"));
        assert!(store.load().is_none());

        let recovery = TimerRecovery {
            start_time: 1_700_000_000_000,
            subject_id: "mat202".into(),
        };
        store.save(&recovery).unwrap();
        assert_eq!(store.load(), Some(recovery));

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn clearing_absent_recovery_is_fine() {
        let dir = tempdir().unwrap();
        let store = FileRecoveryStore::with_path(dir.path().join("timer.json"));
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn malformed_recovery_loads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timer.json");
        fs::write(&path, b"[]").unwrap();

        let store = FileRecoveryStore::with_path(&path);
        assert!(store.load().is_none());
    }

    #[test]
    fn memory_stores_mirror_the_file_contract() {
        let sessions = MemorySessionStore::default();
        assert!(sessions.read_all().is_empty());
        let s = StudySession::new("mat202", 0, 10);
        sessions.append(&s).unwrap();
        assert_eq!(sessions.read_all(), vec![s]);

        let recovery = MemoryRecoveryStore::default();
        assert!(recovery.load().is_none());
        let r = TimerRecovery {
            start_time: 1,
            subject_id: "mas130".into(),
        };
        recovery.save(&r).unwrap();
        assert_eq!(recovery.load(), Some(r));
        recovery.clear().unwrap();
        assert!(recovery.load().is_none());
    }
}
