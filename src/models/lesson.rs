use serde::{Deserialize, Serialize};

// ============================================================================
// Preference enums
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonType {
    Group,
    Private,
    FlexibleGroup,
    FlexiblePrivate,
}

impl LessonType {
    pub const ALL: [LessonType; 4] = [
        LessonType::Group,
        LessonType::Private,
        LessonType::FlexibleGroup,
        LessonType::FlexiblePrivate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LessonType::Group => "group",
            LessonType::Private => "private",
            LessonType::FlexibleGroup => "flexible_group",
            LessonType::FlexiblePrivate => "flexible_private",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LessonType::Group => "Group",
            LessonType::Private => "Private",
            LessonType::FlexibleGroup => "Prefer Group",
            LessonType::FlexiblePrivate => "Prefer Private",
        }
    }

    /// `private` and `flexible_private` render as private lessons, everything else as group.
    pub fn is_private_family(self) -> bool {
        matches!(self, LessonType::Private | LessonType::FlexiblePrivate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwimStyle {
    Freestyle,
    Breaststroke,
    Butterfly,
    Backstroke,
}

impl SwimStyle {
    pub const ALL: [SwimStyle; 4] = [
        SwimStyle::Freestyle,
        SwimStyle::Breaststroke,
        SwimStyle::Butterfly,
        SwimStyle::Backstroke,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SwimStyle::Freestyle => "freestyle",
            SwimStyle::Breaststroke => "breaststroke",
            SwimStyle::Butterfly => "butterfly",
            SwimStyle::Backstroke => "backstroke",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SwimStyle::Freestyle => "Freestyle",
            SwimStyle::Breaststroke => "Breaststroke",
            SwimStyle::Butterfly => "Butterfly",
            SwimStyle::Backstroke => "Backstroke",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

// ============================================================================
// Schedule payloads (GET /schedule)
// ============================================================================

pub type LessonId = i64;

/// Assigned lesson as returned by the scheduling service. Day and times stay
/// raw strings: they are resolved during projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub lesson_id: LessonId,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    /// `null` when the service has not placed an instructor yet.
    #[serde(default)]
    pub instructor: Option<String>,
    pub lesson_type: LessonType,
    pub swim_style: SwimStyle,
    #[serde(default)]
    pub students: Vec<String>,
}

/// Unassigned lesson request: preferences that did not fit into any slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRequest {
    pub lesson_id: LessonId,
    pub lesson_type: LessonType,
    pub swim_style: SwimStyle,
    #[serde(default)]
    pub students: Vec<String>,
}

/// Raw `/schedule` body. Records are kept as JSON values so a single malformed
/// record can be skipped without losing the others.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub assigned_lessons: Vec<serde_json::Value>,
    #[serde(default)]
    pub unassigned_lessons: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_type_wire_names() {
        let t: LessonType = serde_json::from_str("\"flexible_private\"").unwrap();
        assert_eq!(t, LessonType::FlexiblePrivate);
        assert!(t.is_private_family());
        assert!(!LessonType::FlexibleGroup.is_private_family());
        assert_eq!(LessonType::FlexibleGroup.label(), "Prefer Group");
    }

    #[test]
    fn lesson_students_default_to_empty() {
        let lesson: Lesson = serde_json::from_value(serde_json::json!({
            "lesson_id": 4,
            "day": "Monday",
            "start_time": "09:00",
            "end_time": "10:00",
            "instructor": "Yotam",
            "lesson_type": "group",
            "swim_style": "freestyle"
        }))
        .unwrap();
        assert!(lesson.students.is_empty());
        assert_eq!(lesson.instructor.as_deref(), Some("Yotam"));
    }

    #[test]
    fn lesson_without_instructor_still_decodes() {
        let lesson: Lesson = serde_json::from_value(serde_json::json!({
            "lesson_id": 5,
            "day": "Monday",
            "start_time": "09:00",
            "end_time": "10:00",
            "instructor": null,
            "lesson_type": "private",
            "swim_style": "backstroke"
        }))
        .unwrap();
        assert_eq!(lesson.instructor, None);
    }

    #[test]
    fn swim_style_parse() {
        assert_eq!(SwimStyle::parse("butterfly"), Some(SwimStyle::Butterfly));
        assert_eq!(SwimStyle::parse("Butterfly"), None);
    }
}
