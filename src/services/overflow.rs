use serde::Serialize;

use crate::i18n;
use crate::models::LessonRequest;

/// Entries shown while the list is collapsed.
pub const PREVIEW_LIMIT: usize = 5;

/// Read-only window over the unassigned lesson requests of one schedule.
/// Toggling `expanded` never touches the underlying slice.
#[derive(Debug, Clone, Copy)]
pub struct UnassignedOverflowView<'a> {
    lessons: &'a [LessonRequest],
    expanded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OverflowRender<'a> {
    Empty {
        message: String,
    },
    Entries {
        entries: Vec<UnassignedEntry<'a>>,
        total: usize,
        hidden: usize,
        expanded: bool,
        /// `Some` when the list is long enough to be collapsed.
        toggle_label: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnassignedEntry<'a> {
    #[serde(flatten)]
    pub lesson: &'a LessonRequest,
    pub students_line: String,
    pub type_line: String,
}

impl<'a> UnassignedEntry<'a> {
    fn new(lesson: &'a LessonRequest) -> Self {
        let students = if lesson.students.is_empty() {
            "None".to_string()
        } else {
            lesson.students.join(", ")
        };
        Self {
            lesson,
            students_line: format!("Students: {}", students),
            type_line: format!(
                "Type: {} - {}",
                lesson.lesson_type.as_str(),
                lesson.swim_style.as_str()
            ),
        }
    }
}

impl<'a> UnassignedOverflowView<'a> {
    pub fn new(lessons: &'a [LessonRequest], expanded: bool) -> Self {
        Self { lessons, expanded }
    }

    /// Entries to render, in backend order.
    pub fn visible(&self) -> &'a [LessonRequest] {
        if self.expanded {
            self.lessons
        } else {
            &self.lessons[..self.lessons.len().min(PREVIEW_LIMIT)]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn can_toggle(&self) -> bool {
        self.lessons.len() > PREVIEW_LIMIT
    }

    pub fn render(&self) -> OverflowRender<'a> {
        if self.is_empty() {
            return OverflowRender::Empty {
                message: i18n::t("schedule.no_unassigned"),
            };
        }

        let visible = self.visible();
        let toggle_label = self.can_toggle().then(|| {
            if self.expanded {
                i18n::t("schedule.show_less")
            } else {
                i18n::t("schedule.show_more")
            }
        });

        OverflowRender::Entries {
            entries: visible.iter().map(UnassignedEntry::new).collect(),
            total: self.lessons.len(),
            hidden: self.lessons.len() - visible.len(),
            expanded: self.expanded,
            toggle_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LessonType, SwimStyle};

    fn requests(n: i64) -> Vec<LessonRequest> {
        (1..=n)
            .map(|id| LessonRequest {
                lesson_id: id,
                lesson_type: LessonType::Group,
                swim_style: SwimStyle::Breaststroke,
                students: vec![format!("student-{}", id)],
            })
            .collect()
    }

    fn ids(lessons: &[LessonRequest]) -> Vec<i64> {
        lessons.iter().map(|l| l.lesson_id).collect()
    }

    #[test]
    fn collapsed_shows_first_five_in_order() {
        let lessons = requests(8);
        let view = UnassignedOverflowView::new(&lessons, false);
        assert_eq!(ids(view.visible()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn expanded_shows_everything_unchanged() {
        let lessons = requests(8);
        let before = lessons.clone();
        let view = UnassignedOverflowView::new(&lessons, true);
        assert_eq!(view.visible(), before.as_slice());

        // collapsing again does not reorder anything
        let view = UnassignedOverflowView::new(&lessons, false);
        assert_eq!(view.visible(), &before[..5]);
        assert_eq!(lessons, before);
    }

    #[test]
    fn short_lists_have_no_toggle() {
        let lessons = requests(5);
        let view = UnassignedOverflowView::new(&lessons, false);
        assert_eq!(view.visible().len(), 5);
        match view.render() {
            OverflowRender::Entries {
                hidden,
                toggle_label,
                ..
            } => {
                assert_eq!(hidden, 0);
                assert_eq!(toggle_label, None);
            }
            other => panic!("unexpected render: {:?}", other),
        }
    }

    #[test]
    fn long_lists_report_hidden_and_toggle_label() {
        let lessons = requests(8);
        match UnassignedOverflowView::new(&lessons, false).render() {
            OverflowRender::Entries {
                entries,
                total,
                hidden,
                toggle_label,
                ..
            } => {
                assert_eq!(entries.len(), 5);
                assert_eq!(total, 8);
                assert_eq!(hidden, 3);
                assert_eq!(toggle_label.as_deref(), Some("Show More"));
            }
            other => panic!("unexpected render: {:?}", other),
        }
        match UnassignedOverflowView::new(&lessons, true).render() {
            OverflowRender::Entries { toggle_label, hidden, .. } => {
                assert_eq!(hidden, 0);
                assert_eq!(toggle_label.as_deref(), Some("Show Less"));
            }
            other => panic!("unexpected render: {:?}", other),
        }
    }

    #[test]
    fn empty_list_has_explicit_state() {
        let view = UnassignedOverflowView::new(&[], false);
        assert!(view.visible().is_empty());
        assert_eq!(
            view.render(),
            OverflowRender::Empty {
                message: "No unassigned students.".to_string()
            }
        );
    }

    #[test]
    fn entry_lines() {
        let mut lessons = requests(1);
        let entry = UnassignedEntry::new(&lessons[0]);
        assert_eq!(entry.students_line, "Students: student-1");
        assert_eq!(entry.type_line, "Type: group - breaststroke");

        lessons[0].students.clear();
        let entry = UnassignedEntry::new(&lessons[0]);
        assert_eq!(entry.students_line, "Students: None");
    }

    #[test]
    fn render_serializes_with_state_tag() {
        let lessons = requests(2);
        let render = UnassignedOverflowView::new(&lessons, false).render();
        let json = serde_json::to_value(render).unwrap();
        assert_eq!(json["state"], "entries");
        assert_eq!(json["entries"][0]["lesson_id"], 1);
        assert_eq!(json["entries"][0]["type_line"], "Type: group - breaststroke");
    }
}
