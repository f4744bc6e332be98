use serde::{Deserialize, Serialize};

use super::{LessonType, SwimStyle, TimeOfDay, Weekday};

// ============================================================================
// Availability
// ============================================================================

/// One committed availability range. Always `start < end` on the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailabilityWindow {
    day: Weekday,
    start: TimeOfDay,
    end: TimeOfDay,
}

impl AvailabilityWindow {
    /// Returns `None` unless `start < end`.
    pub fn new(day: Weekday, start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        (start < end).then_some(Self { day, start, end })
    }

    pub fn day(&self) -> Weekday {
        self.day
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Same day and sharing at least one minute. Touching ranges do not overlap.
    pub fn overlaps(&self, other: &AvailabilityWindow) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}

/// Transient picker state while a range is being chosen for `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingRange {
    pub day: Weekday,
    pub start: Option<TimeOfDay>,
}

// ============================================================================
// Draft
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudentDraft {
    pub name: String,
    pub lesson_type: Option<LessonType>,
    /// Selection order is kept; no duplicates.
    pub swim_styles: Vec<SwimStyle>,
    pub availability: Vec<AvailabilityWindow>,
}

impl StudentDraft {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.lesson_type.is_none()
            && self.swim_styles.is_empty()
            && self.availability.is_empty()
    }
}

// ============================================================================
// Submission payloads (POST /submit_student)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitStudentRequest {
    pub name: String,
    pub lesson_type: LessonType,
    pub swim_style: Vec<SwimStyle>,
    pub availability: Vec<AvailabilityWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitStudentResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u8) -> TimeOfDay {
        TimeOfDay::at_hour(h).unwrap()
    }

    #[test]
    fn window_requires_start_before_end() {
        assert!(AvailabilityWindow::new(Weekday::Monday, t(9), t(10)).is_some());
        assert!(AvailabilityWindow::new(Weekday::Monday, t(10), t(10)).is_none());
        assert!(AvailabilityWindow::new(Weekday::Monday, t(11), t(10)).is_none());
    }

    #[test]
    fn overlap_is_same_day_only_and_excludes_touching() {
        let a = AvailabilityWindow::new(Weekday::Monday, t(9), t(11)).unwrap();
        let b = AvailabilityWindow::new(Weekday::Monday, t(10), t(12)).unwrap();
        let c = AvailabilityWindow::new(Weekday::Monday, t(11), t(12)).unwrap();
        let d = AvailabilityWindow::new(Weekday::Tuesday, t(9), t(11)).unwrap();
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn request_matches_wire_shape() {
        let window = AvailabilityWindow::new(Weekday::Sunday, t(8), t(12)).unwrap();
        let req = SubmitStudentRequest {
            name: "Dana".to_string(),
            lesson_type: LessonType::FlexibleGroup,
            swim_style: vec![SwimStyle::Freestyle],
            availability: vec![window],
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "name": "Dana",
                "lesson_type": "flexible_group",
                "swim_style": ["freestyle"],
                "availability": [{"day": "Sunday", "start": "08:00", "end": "12:00"}]
            })
        );
    }
}
