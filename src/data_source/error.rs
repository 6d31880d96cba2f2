//! Failures and warnings produced by a read.

use thiserror::Error;

use crate::ovh::OvhError;

/// Fatal read failures. None of them leaves a partial result behind.
#[derive(Debug, Error)]
pub enum ClientRequestError {
    #[error("failed to generate request: {0}")]
    RequestConstruction(#[source] OvhError),
    #[error("failed to make request: {0}")]
    RequestExecution(#[source] OvhError),
    #[error("failed to read response body: {0}")]
    BodyRead(#[source] OvhError),
}

impl ClientRequestError {
    /// Diagnostic summary for this failure.
    #[must_use]
    pub fn summary(&self) -> &'static str {
        match self {
            Self::RequestConstruction(_) => "Failed to generate request",
            Self::RequestExecution(_) => "Failed to make request",
            Self::BodyRead(_) => "Failed to read response body",
        }
    }

    /// Diagnostic detail: the underlying client error.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::RequestConstruction(e) | Self::RequestExecution(e) | Self::BodyRead(e) => {
                e.to_string()
            }
        }
    }
}

/// Advisory findings attached to a successful read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadWarning {
    /// The body does not parse as JSON. It is still returned verbatim.
    BodyFormat,
}

impl ReadWarning {
    #[must_use]
    pub fn summary(self) -> &'static str {
        match self {
            Self::BodyFormat => "Not JSON serializable response body",
        }
    }

    #[must_use]
    pub fn detail(self) -> &'static str {
        match self {
            Self::BodyFormat => "The response body is not json serializable",
        }
    }
}
