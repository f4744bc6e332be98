use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::models::{
    instructor_label, CalendarEvent, CalendarWindow, EventKind, Lesson, OverlapResolution,
    RejectedLesson, TimeOfDay, TypeMarker, Weekday,
};
use crate::services::date_mapper::FixedWeekDateMapper;
use crate::services::palette::InstructorPalette;

/// Agenda bounds of the week view, in hours.
const AGENDA_BEGIN_HOUR: u32 = 8;
const AGENDA_END_HOUR: u32 = 22;

/// Output of one projection pass. `events` keeps input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    pub events: Vec<CalendarEvent>,
    pub rejected: Vec<RejectedLesson>,
}

/// Turns assigned lessons into calendar events on the reference week.
///
/// No sorting, deduplication or overlap layout happens here. Each event only
/// carries the `lane` overlap hint and a per-lesson stack key for the widget.
#[derive(Debug, Clone, Default)]
pub struct LessonEventProjector {
    palette: InstructorPalette,
    mapper: FixedWeekDateMapper,
}

impl LessonEventProjector {
    pub fn new(palette: InstructorPalette, mapper: FixedWeekDateMapper) -> Self {
        Self { palette, mapper }
    }

    pub fn project(&self, lessons: &[Lesson]) -> Projection {
        let mut projection = Projection::default();

        for lesson in lessons {
            match self.project_lesson(lesson) {
                Ok(event) => projection.events.push(event),
                Err(e) => {
                    tracing::warn!("Skipping lesson {}: {}", lesson.lesson_id, e);
                    projection.rejected.push(RejectedLesson {
                        lesson_id: Some(lesson.lesson_id),
                        reason: e.to_string(),
                    });
                }
            }
        }

        projection
    }

    /// Fails only on malformed `HH:MM` strings.
    pub fn project_lesson(&self, lesson: &Lesson) -> AppResult<CalendarEvent> {
        let start = parse_time(&lesson.start_time)?;
        let end = parse_time(&lesson.end_time)?;

        let type_marker = TypeMarker::for_lesson_type(lesson.lesson_type);

        Ok(CalendarEvent {
            id: lesson.lesson_id,
            start_date: self.mapper.map_name(&lesson.day, start),
            end_date: self.mapper.map_name(&lesson.day, end),
            color: self
                .palette
                .color_for_lesson(lesson.instructor.as_deref())
                .to_string(),
            instructor: lesson.instructor.clone(),
            lesson_type: lesson.lesson_type,
            swim_style: lesson.swim_style,
            students: lesson.students.clone(),
            day: lesson.day.clone(),
            start_time: lesson.start_time.clone(),
            end_time: lesson.end_time.clone(),
            type_marker,
            description: format!(
                "{} - {}",
                instructor_label(lesson.instructor.as_deref()),
                type_marker.quoted()
            ),
            event_kind: EventKind::Standard,
            resolve_overlap: OverlapResolution::Lane,
            stack_key: format!("lesson-{}", lesson.lesson_id),
        })
    }

    /// Week view configuration: five days from Monday, noon Monday selected.
    pub fn calendar_window(&self) -> CalendarWindow {
        CalendarWindow {
            days: Weekday::CALENDAR.to_vec(),
            page_start: Weekday::Monday,
            selected_date: self.mapper.map(Weekday::Monday, TimeOfDay::NOON),
            begin_agenda_at: AGENDA_BEGIN_HOUR * 60,
            end_agenda_at: AGENDA_END_HOUR * 60,
        }
    }
}

fn parse_time(raw: &str) -> AppResult<TimeOfDay> {
    raw.parse().map_err(|_| {
        AppError::Validation(i18n::t_with("validation.invalid_time", &[("time", raw)]))
    })
}
