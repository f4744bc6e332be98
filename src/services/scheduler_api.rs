use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::SchedulerConfig;
use crate::error::{AppError, AppResult};
use crate::models::{ScheduleResponse, SubmitStudentRequest, SubmitStudentResponse};

/// Raw outcome of `POST /submit_student`. Classification (accepted, rejected,
/// failed) is left to the submission orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReply {
    pub success: bool,
    /// `None` when the body was not a `{ "message": ... }` object.
    pub message: Option<String>,
}

/// The external lesson assignment service.
#[async_trait]
pub trait SchedulerApi: Send + Sync + 'static {
    async fn fetch_schedule(&self) -> AppResult<ScheduleResponse>;

    async fn submit_student(&self, request: &SubmitStudentRequest) -> AppResult<SubmitReply>;

    async fn student_count(&self) -> AppResult<u32>;
}

/// reqwest-backed client. Every call is a single attempt: failures surface
/// immediately and the user re-triggers.
#[derive(Debug, Clone)]
pub struct HttpSchedulerApi {
    client: Client,
    base_url: Url,
}

impl HttpSchedulerApi {
    pub fn new(config: &SchedulerConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| AppError::Internal(e.into()))?;

        // Url::join replaces the last segment unless the base ends with '/'
        let mut raw = config.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)
            .map_err(|e| AppError::Config(format!("Invalid scheduler URL {}: {}", raw, e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Config(format!("Invalid scheduler endpoint {}: {}", path, e)))
    }
}

#[async_trait]
impl SchedulerApi for HttpSchedulerApi {
    async fn fetch_schedule(&self) -> AppResult<ScheduleResponse> {
        let response = self.client.get(self.endpoint("schedule")?).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::SchedulerApi(format!(
                "Failed to get schedule ({}): {}",
                status, error_text
            )));
        }

        response.json::<ScheduleResponse>().await.map_err(|e| {
            AppError::SchedulerApi(format!("Failed to parse schedule response: {}", e))
        })
    }

    async fn submit_student(&self, request: &SubmitStudentRequest) -> AppResult<SubmitReply> {
        let response = self
            .client
            .post(self.endpoint("submit_student")?)
            .json(request)
            .send()
            .await?;

        let success = response.status().is_success();
        let status = response.status();

        match response.json::<SubmitStudentResponse>().await {
            Ok(body) => Ok(SubmitReply {
                success,
                message: Some(body.message),
            }),
            Err(e) if success => Err(AppError::SchedulerApi(format!(
                "Failed to parse submit response: {}",
                e
            ))),
            Err(e) => {
                tracing::debug!("Submit failed with {} and unreadable body: {}", status, e);
                Ok(SubmitReply {
                    success,
                    message: None,
                })
            }
        }
    }

    async fn student_count(&self) -> AppResult<u32> {
        let response = self
            .client
            .get(self.endpoint("len_students")?)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::SchedulerApi(format!(
                "Failed to get student count ({}): {}",
                status, error_text
            )));
        }

        response.json::<u32>().await.map_err(|e| {
            AppError::SchedulerApi(format!("Failed to parse student count: {}", e))
        })
    }
}
