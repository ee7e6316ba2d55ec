use std::io::Write;
use std::path::Path;

use crate::session::StudySession;
use crate::subject;

/// Write the session log as CSV, one row per recorded session in store
/// order. Unknown subject ids keep their raw id in the code column so no
/// row is silently dropped.
pub fn write_sessions_csv<W: Write>(writer: W, sessions: &[StudySession]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "subject", "started_at", "duration_secs", "hours"])?;

    for session in sessions {
        let code = subject::find(&session.subject_id)
            .map(|s| s.code)
            .unwrap_or(session.subject_id.as_str());
        let started_at = session
            .started_at()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();

        wtr.write_record([
            session.id.as_str(),
            code,
            started_at.as_str(),
            session.duration_seconds.to_string().as_str(),
            format!("{:.2}", session.duration_seconds as f64 / 3600.0).as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_sessions_to_path<P: AsRef<Path>>(
    path: P,
    sessions: &[StudySession],
) -> csv::Result<()> {
    let file = std::fs::File::create(path)?;
    write_sessions_csv(file, sessions)
}
