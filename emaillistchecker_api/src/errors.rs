//! Error types for the API client, and the mapping from failed HTTP
//! responses to typed API errors.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;

/// Seconds to wait after a 429 when the server sends no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Fields shared by every typed API error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiErrorDetails {
    /// Human-readable message, taken from the response or a fixed fallback.
    pub message: String,
    /// HTTP status code of the failed response.
    pub status: u16,
    /// Best-effort decode of the error body. Empty when the body was not a JSON object.
    pub payload: HashMap<String, Value>,
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors that can occur when calling the EmailListChecker API.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// HTTP 401: the API key was rejected.
    #[error("{0}")]
    Authentication(ApiErrorDetails),
    /// HTTP 402: the account has no credits left for this operation.
    #[error("{0}")]
    InsufficientCredits(ApiErrorDetails),
    /// HTTP 429: too many requests.
    #[error("{details}")]
    RateLimit {
        details: ApiErrorDetails,
        /// Seconds the server asked us to wait before retrying.
        retry_after: u64,
    },
    /// HTTP 422: the request was well-formed but rejected by validation.
    #[error("{0}")]
    Validation(ApiErrorDetails),
    /// Any other HTTP status >= 400.
    #[error("{0}")]
    Generic(ApiErrorDetails),
    /// Connection, DNS, TLS or timeout failure. Never classified.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// A request body could not be encoded or a response body could not be decoded.
    #[error("Failed to serialize or deserialize JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The file for a batch upload could not be opened.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("No API key configured")]
    MissingApiKey,
}

impl Error {
    /// Shared details when this is one of the five typed API errors.
    pub fn details(&self) -> Option<&ApiErrorDetails> {
        match self {
            Self::Authentication(d)
            | Self::InsufficientCredits(d)
            | Self::Validation(d)
            | Self::Generic(d)
            | Self::RateLimit { details: d, .. } => Some(d),
            _ => None,
        }
    }

    /// HTTP status of the failed response, for API errors.
    pub fn status(&self) -> Option<u16> {
        self.details().map(|d| d.status)
    }

    /// Raw decoded error body, for API errors.
    pub fn payload(&self) -> Option<&HashMap<String, Value>> {
        self.details().map(|d| &d.payload)
    }

    /// How long the server asked us to back off. Only set for [`Error::RateLimit`].
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } => Some(Duration::from_secs(*retry_after)),
            _ => None,
        }
    }

    /// True when the error came from an HTTP status >= 400.
    pub fn is_api_error(&self) -> bool {
        self.details().is_some()
    }
}

/// Maps a failed response to one of the typed API errors.
///
/// Pure function of the status, headers and body. A body that is not a JSON
/// object produces an empty payload rather than a secondary failure.
pub fn classify(status: StatusCode, headers: &HeaderMap, body: &str) -> Error {
    let payload = parse_payload(body);
    let code = status.as_u16();

    match code {
        401 => Error::Authentication(ApiErrorDetails {
            message: field_or(&payload, "error", "Invalid API key"),
            status: code,
            payload,
        }),
        402 => Error::InsufficientCredits(ApiErrorDetails {
            message: field_or(&payload, "error", "Insufficient credits"),
            status: code,
            payload,
        }),
        422 => Error::Validation(ApiErrorDetails {
            message: field_or(&payload, "message", "Validation error"),
            status: code,
            payload,
        }),
        429 => {
            let retry_after = retry_after_secs(headers);
            Error::RateLimit {
                details: ApiErrorDetails {
                    message: format!(
                        "Rate limit exceeded. Retry after {} seconds",
                        retry_after
                    ),
                    status: code,
                    payload,
                },
                retry_after,
            }
        }
        _ => Error::Generic(ApiErrorDetails {
            message: field_or(&payload, "error", &format!("API error: {}", code)),
            status: code,
            payload,
        }),
    }
}

fn parse_payload(body: &str) -> HashMap<String, Value> {
    serde_json::from_str(body).unwrap_or_default()
}

fn field_or(payload: &HashMap<String, Value>, key: &str, fallback: &str) -> String {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

fn retry_after_secs(headers: &HeaderMap) -> u64 {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}
