use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::models::{
    AvailabilityWindow, LessonType, PendingRange, StudentDraft, SubmitStudentRequest, SwimStyle,
    TimeOfDay, Weekday,
};

/// First and last hour offered by the availability picker.
const PICKER_FIRST_HOUR: u8 = 8;
const PICKER_LAST_HOUR: u8 = 21;

/// Editing state for one student's submission.
///
/// A range is committed in three steps: `set_day` opens a pending range,
/// `choose_start` records a tentative start, `choose_end` validates and commits.
/// A failed `choose_end` keeps the pending range open so the user can retry.
///
/// Several windows may exist for the same day as long as they do not overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailabilityModel {
    draft: StudentDraft,
    pending: Option<PendingRange>,
}

impl AvailabilityModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &StudentDraft {
        &self.draft
    }

    pub fn pending(&self) -> Option<PendingRange> {
        self.pending
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_lesson_type(&mut self, lesson_type: Option<LessonType>) {
        self.draft.lesson_type = lesson_type;
    }

    /// Checkbox semantics. Returns whether the style is selected afterwards.
    pub fn toggle_swim_style(&mut self, style: SwimStyle) -> bool {
        if let Some(pos) = self.draft.swim_styles.iter().position(|s| *s == style) {
            self.draft.swim_styles.remove(pos);
            false
        } else {
            self.draft.swim_styles.push(style);
            true
        }
    }

    pub fn set_day(&mut self, day: Weekday) -> AppResult<()> {
        if !day.accepts_availability() {
            return Err(AppError::Validation(i18n::t_with(
                "validation.day_not_offered",
                &[("day", day.as_str())],
            )));
        }
        self.pending = Some(PendingRange { day, start: None });
        Ok(())
    }

    pub fn choose_start(&mut self, time: TimeOfDay) -> AppResult<()> {
        let pending = self
            .pending
            .as_mut()
            .ok_or_else(|| AppError::Validation(i18n::t("validation.no_pending_day")))?;
        pending.start = Some(time);
        Ok(())
    }

    pub fn choose_end(&mut self, time: TimeOfDay) -> AppResult<AvailabilityWindow> {
        let pending = self
            .pending
            .ok_or_else(|| AppError::Validation(i18n::t("validation.no_pending_day")))?;

        let window = pending
            .start
            .and_then(|start| AvailabilityWindow::new(pending.day, start, time))
            .ok_or_else(|| AppError::Validation(i18n::t("validation.end_before_start")))?;

        if self.draft.availability.iter().any(|w| w.overlaps(&window)) {
            return Err(AppError::Validation(i18n::t_with(
                "validation.window_overlaps",
                &[("day", pending.day.as_str())],
            )));
        }

        self.draft.availability.push(window);
        self.pending = None;
        Ok(window)
    }

    pub fn cancel_pending(&mut self) {
        self.pending = None;
    }

    /// Drops every window on `day`. Returns how many were removed.
    pub fn remove_day(&mut self, day: Weekday) -> usize {
        let before = self.draft.availability.len();
        self.draft.availability.retain(|w| w.day() != day);
        before - self.draft.availability.len()
    }

    pub fn windows_for(&self, day: Weekday) -> Vec<AvailabilityWindow> {
        self.draft
            .availability
            .iter()
            .filter(|w| w.day() == day)
            .copied()
            .collect()
    }

    pub fn is_day_set(&self, day: Weekday) -> bool {
        self.draft.availability.iter().any(|w| w.day() == day)
    }

    pub fn reset(&mut self) {
        self.draft = StudentDraft::default();
        self.pending = None;
    }

    /// Build the submission body, or one aggregated validation error.
    pub fn validate(&self) -> AppResult<SubmitStudentRequest> {
        let name = self.draft.name.trim();
        match self.draft.lesson_type {
            Some(lesson_type)
                if !name.is_empty()
                    && !self.draft.swim_styles.is_empty()
                    && !self.draft.availability.is_empty() =>
            {
                Ok(SubmitStudentRequest {
                    name: name.to_string(),
                    lesson_type,
                    swim_style: self.draft.swim_styles.clone(),
                    availability: self.draft.availability.clone(),
                })
            }
            _ => Err(AppError::Validation(i18n::t("validation.incomplete_draft"))),
        }
    }

    /// Start/end choices offered by the picker: whole hours.
    pub fn time_options() -> Vec<TimeOfDay> {
        (PICKER_FIRST_HOUR..=PICKER_LAST_HOUR)
            .filter_map(|h| TimeOfDay::at_hour(h).ok())
            .collect()
    }
}
