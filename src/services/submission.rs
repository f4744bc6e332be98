use std::sync::Arc;

use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::services::availability::AvailabilityModel;
use crate::services::scheduler_api::{SchedulerApi, SubmitReply};
use crate::services::state::StateCell;

/// Once this many students are registered the app moves on to the schedule.
pub const STUDENT_CAPACITY: u32 = 30;

/// Substring of the service's reply when the student name is already registered.
/// Such replies arrive with a 2xx status and must still count as a rejection.
pub const DUPLICATE_MARKER: &str = "already in the list";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// Incomplete draft or business refusal. Draft untouched.
    Rejected { message: String },
    /// Draft has been reset.
    Succeeded {
        message: String,
        student_count: Option<u32>,
        transition_to_schedule: bool,
    },
    /// Network or server failure. Draft untouched.
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountRefresh {
    pub count: u32,
    pub transition_to_schedule: bool,
}

impl CountRefresh {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            transition_to_schedule: count >= STUDENT_CAPACITY,
        }
    }
}

/// Returns the phase to `Idle` however the submission future ends,
/// including when it is dropped mid-request.
struct PhaseGuard<'a>(&'a StateCell<SubmissionPhase>);

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.0.set(SubmissionPhase::Idle);
    }
}

/// Drives one submission attempt:
/// `Idle -> Validating -> Rejected | Submitting -> Succeeded | Failed -> Idle`.
pub struct SubmissionOrchestrator {
    api: Arc<dyn SchedulerApi>,
    phase: StateCell<SubmissionPhase>,
    last_outcome: StateCell<Option<SubmissionOutcome>>,
}

impl SubmissionOrchestrator {
    pub fn new(api: Arc<dyn SchedulerApi>) -> Self {
        Self {
            api,
            phase: StateCell::default(),
            last_outcome: StateCell::default(),
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase.get()
    }

    #[cfg(test)]
    pub fn subscribe_phase(&self) -> tokio::sync::watch::Receiver<SubmissionPhase> {
        self.phase.subscribe()
    }

    pub fn last_outcome(&self) -> Option<SubmissionOutcome> {
        self.last_outcome.get()
    }

    /// Validate, send and classify the current draft.
    ///
    /// Only a concurrent submission is an `Err` (`Conflict`); every other
    /// result is one of the defined outcomes.
    pub async fn submit(
        &self,
        draft: &StateCell<AvailabilityModel>,
    ) -> AppResult<SubmissionOutcome> {
        self.phase.try_update(|phase| {
            if *phase != SubmissionPhase::Idle {
                return Err(AppError::Conflict(i18n::t("submission.in_flight")));
            }
            *phase = SubmissionPhase::Validating;
            Ok(())
        })?;
        let _guard = PhaseGuard(&self.phase);

        let outcome = match draft.read(AvailabilityModel::validate) {
            Err(AppError::Validation(message)) => SubmissionOutcome::Rejected { message },
            Err(e) => SubmissionOutcome::Rejected {
                message: e.to_string(),
            },
            Ok(request) => {
                self.phase.set(SubmissionPhase::Submitting);
                tracing::info!("Submitting student {}", request.name);

                match self.api.submit_student(&request).await {
                    Ok(reply) => self.classify(reply, draft).await,
                    Err(e) => {
                        if e.is_transport() {
                            tracing::error!("Error submitting student {}: {}", request.name, e);
                        } else {
                            tracing::warn!("Submission for {} not completed: {}", request.name, e);
                        }
                        SubmissionOutcome::Failed {
                            message: i18n::t("submission.failed"),
                        }
                    }
                }
            }
        };

        self.last_outcome.set(Some(outcome.clone()));
        Ok(outcome)
    }

    async fn classify(
        &self,
        reply: SubmitReply,
        draft: &StateCell<AvailabilityModel>,
    ) -> SubmissionOutcome {
        match reply.message {
            Some(message) if message.contains(DUPLICATE_MARKER) => {
                tracing::info!("Submission rejected as duplicate: {}", message);
                SubmissionOutcome::Rejected { message }
            }
            Some(message) if !reply.success => {
                tracing::warn!("Submission refused by scheduling service: {}", message);
                SubmissionOutcome::Rejected { message }
            }
            None if !reply.success => SubmissionOutcome::Failed {
                message: i18n::t("submission.failed"),
            },
            message => {
                draft.update(AvailabilityModel::reset);

                let (student_count, transition_to_schedule) = match self.refresh_count().await {
                    Ok(refresh) => (Some(refresh.count), refresh.transition_to_schedule),
                    Err(e) => {
                        tracing::warn!("Error fetching student count after submission: {}", e);
                        (None, false)
                    }
                };

                SubmissionOutcome::Succeeded {
                    message: message.unwrap_or_default(),
                    student_count,
                    transition_to_schedule,
                }
            }
        }
    }

    pub async fn refresh_count(&self) -> AppResult<CountRefresh> {
        let count = self.api.student_count().await?;
        tracing::debug!("Student count is {}", count);
        Ok(CountRefresh::new(count))
    }
}
