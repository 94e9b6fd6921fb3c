//! Async client for the EmailListChecker email verification API.
//!
//! All verification, scoring and discovery happens server-side. This crate
//! builds the requests, performs one HTTP round trip per call and maps the
//! response either onto a typed result or onto one of the typed errors in
//! [`Error`].
//!
//! ```no_run
//! use emaillistchecker_api::Client;
//!
//! # async fn run() -> Result<(), emaillistchecker_api::Error> {
//! let client = Client::new("your_api_key")?;
//! let result = client.verify("user@example.com", None, true).await?;
//! println!("{}: {} ({:.2})", result.email, result.result, result.score);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod errors;
pub mod types;
pub use self::client::{Client, USER_AGENT};
pub use self::config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, ENV_API_KEY, ENV_BASE_URL, ENV_TIMEOUT_SECS,
};
pub use self::errors::{classify, ApiErrorDetails, Error, DEFAULT_RETRY_AFTER_SECS};
