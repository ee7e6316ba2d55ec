/// A fixed weekly class slot. Mock data for now; nothing mutates these at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEvent {
    pub id: &'static str,
    pub subject_code: &'static str,
    pub day: &'static str,
    pub time: &'static str,
    pub location: &'static str,
    pub week: u32,
}

pub const MOCK_SCHEDULE: &[ScheduleEvent] = &[
    ScheduleEvent {
        id: "1",
        subject_code: "MAT202",
        day: "Monday",
        time: "08:15 - 10:00",
        location: "Auditorium A",
        week: 34,
    },
    ScheduleEvent {
        id: "2",
        subject_code: "MAS130",
        day: "Monday",
        time: "12:15 - 14:00",
        location: "Lab 3",
        week: 34,
    },
    ScheduleEvent {
        id: "3",
        subject_code: "MAS141",
        day: "Tuesday",
        time: "10:15 - 12:00",
        location: "Room 204",
        week: 34,
    },
    ScheduleEvent {
        id: "4",
        subject_code: "MAT202",
        day: "Wednesday",
        time: "14:15 - 16:00",
        location: "Auditorium B",
        week: 34,
    },
    ScheduleEvent {
        id: "5",
        subject_code: "MAS130",
        day: "Thursday",
        time: "09:15 - 11:00",
        location: "Lab 3",
        week: 34,
    },
];

/// Week number shown in the schedule header. All mock slots share it.
pub fn current_week() -> u32 {
    MOCK_SCHEDULE.first().map(|e| e.week).unwrap_or(0)
}
