use chrono::NaiveDateTime;
use serde::Serialize;

use super::{LessonId, LessonRequest, LessonType, SwimStyle, Weekday};
use crate::i18n;

// ============================================================================
// Calendar Event Models (projected from assigned lessons)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Standard,
}

/// How the calendar widget should lay out events sharing a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapResolution {
    Lane,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypeMarker {
    #[serde(rename = "P")]
    Private,
    #[serde(rename = "G")]
    Group,
}

impl TypeMarker {
    pub fn for_lesson_type(lesson_type: LessonType) -> Self {
        if lesson_type.is_private_family() {
            TypeMarker::Private
        } else {
            TypeMarker::Group
        }
    }

    /// Quoted form used in labels, e.g. `'P'`.
    pub fn quoted(self) -> &'static str {
        match self {
            TypeMarker::Private => "'P'",
            TypeMarker::Group => "'G'",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: LessonId,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub color: String,
    pub instructor: Option<String>,
    pub lesson_type: LessonType,
    pub swim_style: SwimStyle,
    pub students: Vec<String>,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub type_marker: TypeMarker,
    pub description: String,
    pub event_kind: EventKind,
    pub resolve_overlap: OverlapResolution,
    pub stack_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetails {
    pub title: String,
    pub body: String,
}

impl CalendarEvent {
    pub fn instructor_label(&self) -> String {
        instructor_label(self.instructor.as_deref())
    }

    /// Text shown when the event is tapped.
    pub fn details(&self) -> EventDetails {
        let students = if self.students.is_empty() {
            "None".to_string()
        } else {
            self.students.join(", ")
        };

        EventDetails {
            title: format!("Lesson ID: {}", self.id),
            body: format!(
                "Day: {}\nTime: {} - {}\nInstructor: {}\nLesson type: {} ({})\nSwim style: {}\nStudents: {}",
                self.day,
                self.start_time,
                self.end_time,
                self.instructor_label(),
                self.lesson_type.as_str(),
                self.type_marker.quoted(),
                self.swim_style.as_str(),
                students
            ),
        }
    }
}

/// Display name for an optional instructor.
pub fn instructor_label(instructor: Option<&str>) -> String {
    instructor
        .map(str::to_string)
        .unwrap_or_else(|| i18n::t("schedule.no_instructor"))
}

// ============================================================================
// Calendar view
// ============================================================================

/// Display hints for the week view widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarWindow {
    pub days: Vec<Weekday>,
    pub page_start: Weekday,
    pub selected_date: NaiveDateTime,
    /// Minutes since midnight.
    pub begin_agenda_at: u32,
    pub end_agenda_at: u32,
}

/// A schedule record that could not be turned into something displayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLesson {
    pub lesson_id: Option<LessonId>,
    pub reason: String,
}

/// Everything produced by one schedule fetch. Replaced wholesale on the next fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleView {
    pub events: Vec<CalendarEvent>,
    pub rejected: Vec<RejectedLesson>,
    pub unassigned: Vec<LessonRequest>,
    pub window: CalendarWindow,
}
