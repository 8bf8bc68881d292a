use crate::dialogue::DialogueSegment;
use crate::llm::ActionItem;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a job.
///
/// `Pending → Processing → {Completed | Error | Cancelled}`. The three
/// terminal states are final; nothing transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Error,
    Cancelled,
}

impl JobStatus {
    /// True once the job can no longer change state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Error | JobStatus::Cancelled
        )
    }
}

/// Which outputs a job should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFlags {
    pub summary: bool,
    pub dialogue: bool,
    pub actions: bool,
}

impl Default for JobFlags {
    fn default() -> Self {
        Self {
            summary: true,
            dialogue: true,
            actions: true,
        }
    }
}

/// Assembled output of a completed job.
///
/// Only the fields for enabled features are populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct JobResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<Vec<DialogueSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionItem>>,
}

/// One tracked job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<String>,
    /// 0–100; monotonically non-decreasing while processing.
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JobResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Fresh job in its initial state.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            step: None,
            progress: 0,
            message: None,
            result: None,
            error: None,
        }
    }
}

/// Partial update applied to a job with merge semantics: `None` fields keep
/// their prior values.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub step: Option<String>,
    pub progress: Option<u8>,
    pub message: Option<String>,
    pub result: Option<JobResult>,
    pub error: Option<String>,
}

impl JobUpdate {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn step(step: &str, progress: u8) -> Self {
        Self {
            step: Some(step.to_string()),
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn apply(self, job: &mut Job) {
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(step) = self.step {
            job.step = Some(step);
        }
        if let Some(progress) = self.progress {
            job.progress = progress;
        }
        if let Some(message) = self.message {
            job.message = Some(message);
        }
        if let Some(result) = self.result {
            job.result = Some(result);
        }
        if let Some(error) = self.error {
            job.error = Some(error);
        }
    }
}
