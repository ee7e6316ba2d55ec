mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use moaa::{
    config::{Config, ConfigStore, FileConfigStore},
    export,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::StudySession,
    stats::{self, AggregatedStats},
    store::{FileRecoveryStore, FileSessionStore, RecoveryStore, SessionStore},
    subject::{self, SEMESTER_GOAL_HOURS, SUBJECTS},
    timer::{transition, TimerEffect, TimerEvent, TimerState},
    util,
};

const TICK_RATE_MS: u64 = 250;

/// study-time tracking tui with a semester progress gauge and weekly plan
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A study-time tracking TUI: pick a subject, run the stopwatch, and watch the semester progress gauge, per-subject cards, and weekly plan fill up. Sessions persist locally and a running timer survives restarts."
)]
pub struct Cli {
    /// subject to preselect on the timer tab (id or course code, e.g. mat202)
    #[clap(short = 's', long)]
    subject: Option<String>,

    /// print aggregated progress to stdout and exit (no tty required)
    #[clap(long)]
    summary: bool,

    /// export the full session log as csv to the given path and exit
    #[clap(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// override the state directory holding sessions and timer recovery
    #[clap(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,
}

impl Cli {
    fn session_store(&self) -> FileSessionStore {
        match &self.state_dir {
            Some(dir) => FileSessionStore::with_path(dir.join("moaa_study_sessions.json")),
            None => FileSessionStore::new(),
        }
    }

    fn recovery_store(&self) -> FileRecoveryStore {
        match &self.state_dir {
            Some(dir) => FileRecoveryStore::with_path(dir.join("moaa_timer.json")),
            None => FileRecoveryStore::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Tab {
    Dashboard,
    Timer,
    Schedule,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Timer, Tab::Schedule];

    fn next(self) -> Self {
        match self {
            Tab::Dashboard => Tab::Timer,
            Tab::Timer => Tab::Schedule,
            Tab::Schedule => Tab::Dashboard,
        }
    }
}

pub struct App {
    pub tab: Tab,
    pub timer: TimerState,
    /// Index into SUBJECTS; locked while the timer is running.
    pub selected: usize,
    pub stats: AggregatedStats,
    /// End instant of the most recent recorded session, Unix millis.
    pub last_session_end: Option<i64>,
    pub config: Config,
    sessions: Box<dyn SessionStore>,
    recovery: Box<dyn RecoveryStore>,
}

impl App {
    pub fn new(
        config: Config,
        sessions: Box<dyn SessionStore>,
        recovery: Box<dyn RecoveryStore>,
        now: i64,
    ) -> Self {
        let selected = subject::resolve(&config.default_subject)
            .and_then(|sub| SUBJECTS.iter().position(|s| s.id == sub.id))
            .unwrap_or(0);

        let mut app = Self {
            tab: Tab::Dashboard,
            timer: TimerState::Idle,
            selected,
            stats: AggregatedStats::empty(SUBJECTS),
            last_session_end: None,
            config,
            sessions,
            recovery,
        };
        app.refresh_stats();
        app.recover(now);
        app
    }

    /// Resume a run that was active when the process last exited.
    fn recover(&mut self, now: i64) {
        let Some(mut recovery) = self.recovery.load() else {
            return;
        };
        // An id that left the catalog falls back to the first subject.
        if subject::find(&recovery.subject_id).is_none() {
            recovery.subject_id = SUBJECTS[0].id.to_string();
        }
        self.apply(TimerEvent::Recover { recovery, now });
        if let Some(id) = self.timer.subject_id() {
            if let Some(idx) = SUBJECTS.iter().position(|s| s.id == id) {
                self.selected = idx;
            }
        }
        self.tab = Tab::Timer;
    }

    pub fn refresh_stats(&mut self) {
        let sessions = self.sessions.read_all();
        self.stats = stats::calculate_stats(SUBJECTS, &sessions);
        self.last_session_end = stats::last_session_end(&sessions);
    }

    /// Run a timer transition and interpret its effects against the stores.
    /// Store failures are non-fatal; the worst case is stale statistics.
    pub fn apply(&mut self, event: TimerEvent) {
        let (next, effects) = transition(self.timer.clone(), event);
        self.timer = next;

        for effect in effects {
            match effect {
                TimerEffect::SaveRecovery(recovery) => {
                    let _ = self.recovery.save(&recovery);
                }
                TimerEffect::ClearRecovery => {
                    let _ = self.recovery.clear();
                }
                TimerEffect::CommitSession {
                    subject_id,
                    start_time,
                    duration_seconds,
                } => {
                    let session = StudySession::new(subject_id, start_time, duration_seconds);
                    let _ = self.sessions.append(&session);
                    self.refresh_stats();
                }
            }
        }
    }

    pub fn selected_subject(&self) -> &'static subject::Subject {
        &SUBJECTS[self.selected]
    }

    pub fn toggle_timer(&mut self, now: i64) {
        if self.timer.is_running() {
            self.apply(TimerEvent::Pause);
        } else {
            self.apply(TimerEvent::Start {
                subject_id: self.selected_subject().id.to_string(),
                now,
            });
        }
    }

    pub fn stop_timer(&mut self, now: i64) {
        self.apply(TimerEvent::Stop { now });
    }

    pub fn on_tick(&mut self, now: i64) {
        self.apply(TimerEvent::Tick { now });
    }

    /// Subject selection is disabled while a run is active.
    pub fn select_next(&mut self) {
        if !self.timer.is_running() {
            self.selected = (self.selected + 1) % SUBJECTS.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.timer.is_running() {
            self.selected = (self.selected + SUBJECTS.len() - 1) % SUBJECTS.len();
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn print_summary(config: &Config, sessions: &dyn SessionStore) {
    let all = sessions.read_all();
    let stats = stats::calculate_stats(SUBJECTS, &all);

    println!("MOAA — {}", config.semester_label);
    println!(
        "Total: {} studied, {} sp, {:.1}% of the {:.0}h goal",
        util::format_hms(stats.total_seconds),
        util::format_sp(stats.total_credits),
        stats.progress_percentage,
        SEMESTER_GOAL_HOURS,
    );
    for sub in SUBJECTS {
        let stat = stats.for_subject(sub.id);
        let seconds = stat.map(|s| s.seconds).unwrap_or(0);
        let credits = stat.map(|s| s.credits).unwrap_or(0.0);
        println!(
            "  {:<7} {:<22} {:>6.1}h  {} sp",
            sub.code,
            sub.name,
            util::hours(seconds),
            util::format_sp(credits),
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let mut config = FileConfigStore::new().load();
    let sessions = cli.session_store();

    if let Some(key) = &cli.subject {
        match subject::resolve(key) {
            Some(sub) => config.default_subject = sub.id.to_string(),
            None => {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::InvalidValue, format!("unknown subject '{key}'"))
                    .exit();
            }
        }
    }

    // Headless modes next; they need no terminal.
    if cli.summary {
        print_summary(&config, &sessions);
        return Ok(());
    }
    if let Some(path) = &cli.export {
        let all = sessions.read_all();
        export::export_sessions_to_path(path, &all)?;
        println!("exported {} sessions to {}", all.len(), path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        config,
        Box::new(sessions),
        Box::new(cli.recovery_store()),
        now_millis(),
    );
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::ui(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                if app.timer.is_running() {
                    app.on_tick(now_millis());
                    terminal.draw(|f| ui::ui(app, f))?;
                }
            }
            AppEvent::Resize => {
                terminal.draw(|f| ui::ui(app, f))?;
            }
            AppEvent::Key(key) => {
                // Quitting mid-run leaves the recovery record in place, so
                // the next launch resumes the stopwatch.
                if should_quit(&key) {
                    break;
                }
                handle_key(app, &key);
                terminal.draw(|f| ui::ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn should_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('q') => true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        _ => false,
    }
}

fn handle_key(app: &mut App, key: &KeyEvent) {
    match key.code {
        KeyCode::Tab => app.tab = app.tab.next(),
        KeyCode::Char('1') => app.tab = Tab::Dashboard,
        KeyCode::Char('2') => app.tab = Tab::Timer,
        KeyCode::Char('3') => app.tab = Tab::Schedule,
        _ => {
            if app.tab == Tab::Timer {
                match key.code {
                    KeyCode::Char(' ') => app.toggle_timer(now_millis()),
                    KeyCode::Char('s') => app.stop_timer(now_millis()),
                    KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
                    KeyCode::Down | KeyCode::Char('j') => app.select_next(),
                    _ => {}
                }
            }
        }
    }
}
