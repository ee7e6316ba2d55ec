use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Tabs},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::UnicodeWidthStr;

use crate::{App, Tab};
use moaa::schedule::{self, MOCK_SCHEDULE};
use moaa::subject::{self, HOURS_PER_CREDIT, SUBJECTS};
use moaa::util;

const HORIZONTAL_MARGIN: u16 = 2;
/// The mock plan covers a 12-week semester; the dashboard footer averages
/// over it, as the weekly velocity card did.
const SEMESTER_WEEKS: f64 = 12.0;

pub fn ui(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3), // tab bar
            Constraint::Min(0),    // active tab body
            Constraint::Length(1), // key hints
        ])
        .split(f.area());

    render_tab_bar(app, f, chunks[0]);

    match app.tab {
        Tab::Dashboard => render_dashboard(app, f, chunks[1]),
        Tab::Timer => render_timer(app, f, chunks[1]),
        Tab::Schedule => render_schedule(app, f, chunks[1]),
    }

    render_hints(app, f, chunks[2]);
}

fn render_tab_bar(app: &App, f: &mut Frame, area: Rect) {
    let index = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);
    let titles: Vec<String> = Tab::ALL.iter().map(|t| t.to_string()).collect();

    let tabs = Tabs::new(titles)
        .select(index)
        .block(Block::default().borders(Borders::ALL).title("MOAA"))
        .highlight_style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_hints(app: &App, f: &mut Frame, area: Rect) {
    let hints = match app.tab {
        Tab::Timer => "(space) start/pause  (s) stop  ↑/↓ subject  (1-3/tab) tabs  (q) quit",
        _ => "(1) dashboard  (2) timer  (3) schedule  (tab) next  (q) quit",
    };
    let widget = Paragraph::new(Span::styled(
        hints,
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn render_dashboard(app: &App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // semester gauge
            Constraint::Length(3), // subject cards
            Constraint::Min(6),    // hours bar chart
            Constraint::Length(1), // weekly footer
        ])
        .split(area);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Semester progress — {}", app.config.semester_label)),
        )
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(app.stats.progress_percentage / 100.0)
        .label(format!(
            "{} sp · {:.1}%",
            util::format_sp(app.stats.total_credits),
            app.stats.progress_percentage
        ));
    f.render_widget(gauge, chunks[0]);

    // One card per subject, a mini gauge toward its own credit target.
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, SUBJECTS.len() as u32);
            SUBJECTS.len()
        ])
        .split(chunks[1]);

    for (sub, card_area) in SUBJECTS.iter().zip(card_areas.iter()) {
        let seconds = app
            .stats
            .for_subject(sub.id)
            .map(|s| s.seconds)
            .unwrap_or(0);
        let hours = util::hours(seconds);

        let card = Gauge::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} · {}", sub.code, sub.name)),
            )
            .gauge_style(Style::default().fg(sub.color))
            .ratio(card_ratio(seconds, sub.target_credits))
            .label(format!("{hours:.1}h / {:.0}h", sub.target_credits * HOURS_PER_CREDIT));
        f.render_widget(card, *card_area);
    }

    let bars: Vec<Bar> = SUBJECTS
        .iter()
        .map(|sub| {
            let seconds = app
                .stats
                .for_subject(sub.id)
                .map(|s| s.seconds)
                .unwrap_or(0);
            Bar::default()
                .value(bar_value_tenths(seconds))
                .text_value(format!("{:.1}h", util::hours(seconds)))
                .label(Line::from(sub.code))
                .style(Style::default().fg(sub.color))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Hours by subject"))
        .bar_width(9)
        .bar_gap(3)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, chunks[2]);

    let avg = app.stats.total_hours() / SEMESTER_WEEKS;
    let last = app
        .last_session_end
        .map(|end| format!("last session {}", humanize_since(now_millis(), end)))
        .unwrap_or_else(|| "no sessions recorded yet".to_string());
    let footer = Paragraph::new(Span::styled(
        format!(
            "Target: {:.0}h / week · current avg: {avg:.1}h / week · {last}",
            app.config.weekly_target_hours
        ),
        Style::default().fg(Color::Gray),
    ))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

fn render_timer(app: &App, f: &mut Frame, area: Rect) {
    let running = app.timer.is_running();
    let selected = app.selected_subject();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),                            // spacer
            Constraint::Length(1),                         // clock
            Constraint::Length(1),                         // status line
            Constraint::Length(1),                         // spacer
            Constraint::Length(SUBJECTS.len() as u16 + 2), // subject selector
            Constraint::Min(1),                            // spacer
        ])
        .split(area);

    let clock_style = if running {
        Style::default()
            .fg(selected.color)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::DIM)
    };
    let clock = Paragraph::new(Span::styled(
        util::format_hms(app.timer.elapsed_secs()),
        clock_style,
    ))
    .alignment(Alignment::Center);
    f.render_widget(clock, chunks[1]);

    let status = if running {
        "Session in progress..."
    } else {
        "Ready to focus"
    };
    let status_widget = Paragraph::new(Span::styled(
        status,
        Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(status_widget, chunks[2]);

    // Fixed-width rows so codes and names line up regardless of selection.
    let name_width = SUBJECTS.iter().map(|s| s.name.width()).max().unwrap_or(0);
    let rows: Vec<Line> = SUBJECTS
        .iter()
        .enumerate()
        .map(|(idx, sub)| {
            let marker = if idx == app.selected { "▸ " } else { "  " };
            let text = format!("{marker}{:<7} {:<name_width$}", sub.code, sub.name);
            let style = if idx == app.selected {
                Style::default().fg(sub.color).add_modifier(Modifier::BOLD)
            } else if running {
                Style::default().add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            Line::from(Span::styled(text, style)).alignment(Alignment::Center)
        })
        .collect();

    let selector_title = if running {
        "Subject (locked while running)"
    } else {
        "Select subject"
    };
    let selector = Paragraph::new(rows).block(
        Block::default()
            .borders(Borders::ALL)
            .title(selector_title),
    );
    f.render_widget(selector, chunks[4]);
}

fn render_schedule(app: &App, f: &mut Frame, area: Rect) {
    let title = format!(
        "Week {} Schedule — {}",
        schedule::current_week(),
        app.config.semester_label
    );

    let mut lines: Vec<Line> = Vec::with_capacity(MOCK_SCHEDULE.len());
    for event in MOCK_SCHEDULE {
        let sub = subject::find_by_code(event.subject_code);
        let color = sub.map(|s| s.color).unwrap_or(Color::Gray);
        let name = sub.map(|s| s.name).unwrap_or("");

        lines.push(Line::from(vec![
            Span::styled("▍ ", Style::default().fg(color)),
            Span::styled(
                format!("{:<10}", event.day),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:<15}", event.time)),
            Span::styled(
                format!("{:<8}", event.subject_code),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:<22}", name)),
            Span::styled(event.location, Style::default().fg(Color::Gray)),
        ]));
    }

    let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(widget, area);
}

/// Fill ratio for a subject card, clamped the way the overall gauge is.
pub fn card_ratio(seconds: u64, target_credits: f64) -> f64 {
    let target_hours = target_credits * HOURS_PER_CREDIT;
    if target_hours <= 0.0 {
        return 0.0;
    }
    (util::hours(seconds) / target_hours).min(1.0)
}

/// Bar heights in tenths of an hour so short sessions still register.
pub fn bar_value_tenths(seconds: u64) -> u64 {
    (util::hours(seconds) * 10.0).round() as u64
}

/// "2 hours ago" for the dashboard footer.
pub fn humanize_since(now_millis: i64, then_millis: i64) -> String {
    let secs = ((now_millis - then_millis).max(0) / 1000) as u64;
    HumanTime::from(std::time::Duration::from_secs(secs))
        .to_text_en(Accuracy::Rough, Tense::Past)
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
