#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis request orchestration against the MISLAND backend.
//!
//! An [`orchestrator::Orchestrator`] merges the caller's payload with the
//! active [`selection::SelectionContext`], dispatches it through an
//! [`transport::AnalysisTransport`], and classifies the response as an
//! error, an informational message, or an analysis result. Successful
//! results land in the shared [`store::ResultStore`], fenced by request
//! sequence so an older response never overwrites a newer one.
//!
//! In-flight requests are counted by [`pending::PendingRequests`], which
//! drives a global loading indicator.

pub mod notify;
pub mod orchestrator;
pub mod pending;
pub mod response;
pub mod selection;
pub mod store;
pub mod transport;
pub mod years;

use thiserror::Error;

pub use orchestrator::{Orchestrator, SubmitRequest};
pub use transport::{AnalysisTransport, ApiConfig, HttpTransport};

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum RequestError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, if readable.
        message: String,
    },

    /// Client configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem.
        message: String,
    },
}
