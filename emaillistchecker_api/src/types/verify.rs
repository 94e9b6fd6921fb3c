//! Single-address verification: request body and result.

use serde::{Deserialize, Serialize};

use super::envelope::null_as_default;

/// Body of `POST /verify`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct VerifyRequest {
    pub email: String,
    /// Server-side verification timeout in seconds. Omitted when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    pub smtp_check: bool,
}

/// Deliverability verdict assigned by the verification engine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Deliverable,
    Undeliverable,
    Risky,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Deliverable => "deliverable",
            Verdict::Undeliverable => "undeliverable",
            Verdict::Risky => "risky",
            Verdict::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of verifying one address.
///
/// Every field is optional on the wire; anything the server leaves out or
/// sends as `null` takes its default value.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct VerifyResult {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result: Verdict,
    /// Machine-readable reason code, e.g. `valid_mailbox` or `mailbox_not_found`.
    #[serde(deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(deserialize_with = "null_as_default")]
    pub disposable: bool,
    /// Role account such as `info@` or `support@`.
    #[serde(deserialize_with = "null_as_default")]
    pub role: bool,
    /// Address at a free mail provider.
    #[serde(deserialize_with = "null_as_default")]
    pub free: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub spam_trap: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub mx_found: bool,
    /// Deliverability score in `[0.0, 1.0]`.
    #[serde(deserialize_with = "null_as_default")]
    pub score: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub mx_records: Vec<String>,
    pub smtp_provider: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub domain: String,
}

impl VerifyResult {
    pub fn is_deliverable(&self) -> bool {
        self.result == Verdict::Deliverable
    }
}
