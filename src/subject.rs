use ratatui::style::Color;

/// One studiepoeng (sp) is 27 hours of work.
pub const HOURS_PER_CREDIT: f64 = 27.0;
/// Semester target: 30 sp across the catalog, 810 hours.
pub const SEMESTER_GOAL_HOURS: f64 = 810.0;

/// A course in the semester catalog. Defined at startup, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Subject {
    pub id: &'static str,
    pub code: &'static str,
    pub name: &'static str,
    pub color: Color,
    pub target_credits: f64,
}

pub const SUBJECTS: &[Subject] = &[
    Subject {
        id: "mat202",
        code: "MAT202",
        name: "Discrete Mathematics",
        color: Color::Rgb(13, 148, 136),
        target_credits: 10.0,
    },
    Subject {
        id: "mas130",
        code: "MAS130",
        name: "Applied Mechanics",
        color: Color::Rgb(202, 138, 4),
        target_credits: 10.0,
    },
    Subject {
        id: "mas141",
        code: "MAS141",
        name: "Fluid Mechanics",
        color: Color::Rgb(30, 58, 138),
        target_credits: 10.0,
    },
];

pub fn find(id: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.id == id)
}

pub fn find_by_code(code: &str) -> Option<&'static Subject> {
    SUBJECTS.iter().find(|s| s.code.eq_ignore_ascii_case(code))
}

/// Resolve a user-supplied id or course code, e.g. `mat202` or `MAT202`.
pub fn resolve(key: &str) -> Option<&'static Subject> {
    find(key).or_else(|| find_by_code(key))
}
