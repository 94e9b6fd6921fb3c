//! Batch verification jobs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::envelope::null_as_default;

/// Numeric identifier of a batch job. Stable for the job's lifetime.
pub type BatchJobID = u64;

/// Body of `POST /verify/batch`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub emails: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    pub auto_start: bool,
}

/// Lifecycle state of a batch job.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    /// A state this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BatchStatus::Pending => "pending",
            BatchStatus::Processing => "processing",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
            BatchStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Snapshot of a batch job, as returned by submission and by status polling.
///
/// Submission responses only carry `id`, `status`, `total_emails` and
/// `created_at`; the counters default to zero until the job is polled, and
/// a `null` counter reads as zero.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BatchJob {
    pub id: BatchJobID,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BatchStatus,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_emails: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub processed_emails: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub valid_emails: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invalid_emails: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unknown_emails: u64,
    /// Percent complete, 0 to 100.
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl BatchJob {
    /// True once the job has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(self.status, BatchStatus::Completed | BatchStatus::Failed)
    }
}

/// Results of a batch job. The shape depends on the requested format.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchResults {
    /// JSON payload with any `data` envelope removed.
    Json(Value),
    /// Non-JSON export such as CSV, passed through untouched.
    Text(String),
}

impl BatchResults {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            BatchResults::Json(v) => Some(v),
            BatchResults::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            BatchResults::Json(_) => None,
            BatchResults::Text(s) => Some(s),
        }
    }
}
