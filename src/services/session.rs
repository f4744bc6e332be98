use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::watch;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Lesson, LessonRequest, RejectedLesson, ScheduleResponse, ScheduleView};
use crate::services::availability::AvailabilityModel;
use crate::services::date_mapper::FixedWeekDateMapper;
use crate::services::palette::InstructorPalette;
use crate::services::projector::LessonEventProjector;
use crate::services::scheduler_api::SchedulerApi;
use crate::services::state::StateCell;
use crate::services::submission::{SubmissionOrchestrator, SubmissionOutcome, SubmissionPhase};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Submission,
    Schedule,
}

/// Presentation state of one client session.
///
/// Every component sits in its own cell, so a slow schedule fetch never
/// blocks draft edits and vice versa.
pub struct Session {
    api: Arc<dyn SchedulerApi>,
    projector: LessonEventProjector,
    orchestrator: SubmissionOrchestrator,
    draft: StateCell<AvailabilityModel>,
    schedule: StateCell<Option<Arc<ScheduleView>>>,
    overflow_expanded: StateCell<bool>,
    screen: StateCell<Screen>,
    student_count: StateCell<Option<u32>>,
}

impl Session {
    pub fn new(api: Arc<dyn SchedulerApi>, projector: LessonEventProjector) -> Self {
        Self {
            orchestrator: SubmissionOrchestrator::new(api.clone()),
            api,
            projector,
            draft: StateCell::default(),
            schedule: StateCell::default(),
            overflow_expanded: StateCell::default(),
            screen: StateCell::default(),
            student_count: StateCell::default(),
        }
    }

    pub fn from_config(config: &Config, api: Arc<dyn SchedulerApi>) -> Self {
        let projector = LessonEventProjector::new(
            InstructorPalette::from_config(&config.calendar),
            FixedWeekDateMapper::default(),
        );
        Self::new(api, projector)
    }

    /// Startup fetch of the student count. The schedule is only fetched
    /// when the schedule screen opens, since fetching it seeds the service.
    pub async fn mount(&self) {
        if let Err(e) = self.refresh_student_count().await {
            tracing::warn!("Initial student count fetch failed: {}", e);
        }
    }

    // ------------------------------------------------------------------
    // Draft and submission
    // ------------------------------------------------------------------

    pub fn draft(&self) -> &StateCell<AvailabilityModel> {
        &self.draft
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.orchestrator.phase()
    }

    pub fn last_outcome(&self) -> Option<SubmissionOutcome> {
        self.orchestrator.last_outcome()
    }

    pub async fn submit(&self) -> AppResult<SubmissionOutcome> {
        let outcome = self.orchestrator.submit(&self.draft).await?;

        if let SubmissionOutcome::Succeeded {
            student_count,
            transition_to_schedule,
            ..
        } = &outcome
        {
            if let Some(count) = student_count {
                self.student_count.set(Some(*count));
            }
            if *transition_to_schedule {
                tracing::info!("Student capacity reached, switching to schedule");
                self.open_schedule_screen().await;
            }
        }

        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Screen and student count
    // ------------------------------------------------------------------

    pub fn screen(&self) -> Screen {
        self.screen.get()
    }

    pub fn subscribe_screen(&self) -> watch::Receiver<Screen> {
        self.screen.subscribe()
    }

    /// Opening `Schedule` always fetches a fresh snapshot. The screen
    /// switches even when that fetch fails.
    pub async fn set_screen(&self, screen: Screen) -> AppResult<()> {
        self.screen.set(screen);
        if screen == Screen::Schedule {
            self.load_schedule().await?;
        }
        Ok(())
    }

    async fn open_schedule_screen(&self) {
        if let Err(e) = self.set_screen(Screen::Schedule).await {
            tracing::warn!("Schedule fetch on screen switch failed: {}", e);
        }
    }

    pub fn student_count(&self) -> Option<u32> {
        self.student_count.get()
    }

    pub async fn refresh_student_count(&self) -> AppResult<u32> {
        let refresh = self.orchestrator.refresh_count().await?;
        self.student_count.set(Some(refresh.count));
        if refresh.transition_to_schedule && self.screen() != Screen::Schedule {
            self.open_schedule_screen().await;
        }
        Ok(refresh.count)
    }

    // ------------------------------------------------------------------
    // Schedule
    // ------------------------------------------------------------------

    pub fn schedule(&self) -> Option<Arc<ScheduleView>> {
        self.schedule.get()
    }

    pub fn overflow_expanded(&self) -> bool {
        self.overflow_expanded.get()
    }

    /// Returns the new expanded state.
    pub fn toggle_overflow(&self) -> bool {
        self.overflow_expanded.update(|expanded| {
            *expanded = !*expanded;
            *expanded
        })
    }

    /// Fetch and project a fresh snapshot. On failure the previous snapshot stays.
    pub async fn load_schedule(&self) -> AppResult<Arc<ScheduleView>> {
        let response = self.api.fetch_schedule().await?;
        let view = Arc::new(self.build_view(response));

        tracing::info!(
            "Loaded schedule: {} events, {} unassigned, {} rejected",
            view.events.len(),
            view.unassigned.len(),
            view.rejected.len()
        );

        self.schedule.set(Some(view.clone()));
        self.overflow_expanded.set(false);
        Ok(view)
    }

    pub async fn schedule_or_load(&self) -> AppResult<Arc<ScheduleView>> {
        match self.schedule() {
            Some(view) => Ok(view),
            None => self.load_schedule().await,
        }
    }

    fn build_view(&self, response: ScheduleResponse) -> ScheduleView {
        let mut rejected = Vec::new();
        let lessons: Vec<Lesson> = decode_records(response.assigned_lessons, &mut rejected);
        let unassigned: Vec<LessonRequest> =
            decode_records(response.unassigned_lessons, &mut rejected);

        let projection = self.projector.project(&lessons);
        rejected.extend(projection.rejected);

        ScheduleView {
            events: projection.events,
            rejected,
            unassigned,
            window: self.projector.calendar_window(),
        }
    }
}

fn decode_records<T: DeserializeOwned>(
    records: Vec<serde_json::Value>,
    rejected: &mut Vec<RejectedLesson>,
) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| {
            let lesson_id = record.get("lesson_id").and_then(serde_json::Value::as_i64);
            match serde_json::from_value::<T>(record) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    let err = AppError::DataShape(e.to_string());
                    tracing::warn!("Skipping record {:?}: {}", lesson_id, err);
                    rejected.push(RejectedLesson {
                        lesson_id,
                        reason: err.to_string(),
                    });
                    None
                }
            }
        })
        .collect()
}
