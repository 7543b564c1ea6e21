//! Application error types

use thiserror::Error;

use sonde_domain::{FailureKind, ResponseEnvelope};

use crate::ports::HttpClientError;

/// Why sending a request did not produce a usable response.
#[derive(Debug, Clone, Error)]
pub enum RequestFailure {
    /// The server answered with 4xx/5xx while `fail_on_status_code` was set.
    #[error("server responded with status {}", .0.status)]
    Status(Box<ResponseEnvelope>),

    /// No response at all.
    #[error(transparent)]
    Transport(#[from] HttpClientError),
}

impl RequestFailure {
    /// Returns the error response, if the server sent one.
    #[must_use]
    pub fn response(&self) -> Option<&ResponseEnvelope> {
        match self {
            Self::Status(envelope) => Some(envelope),
            Self::Transport(_) => None,
        }
    }
}

/// Errors that abort a single scenario. The run itself goes on.
#[derive(Debug, Clone, Error)]
pub enum ScenarioError {
    /// A template referenced a variable that is not bound.
    #[error("unresolved variable '{name}'")]
    UnresolvedVariable {
        /// First unresolved name.
        name: String,
        /// Every unresolved name in the scenario, in order of appearance.
        names: Vec<String>,
    },

    /// The request could not be sent or was rejected by status.
    #[error("{request} failed: {source}")]
    RequestFailed {
        /// Request line, e.g. `GET /posts/1`.
        request: String,
        /// Underlying failure.
        source: RequestFailure,
    },
}

impl ScenarioError {
    /// Builds an unresolved-variable error from the collected names.
    ///
    /// Returns `None` when nothing is unresolved.
    #[must_use]
    pub fn unresolved(names: Vec<String>) -> Option<Self> {
        let name = names.first()?.clone();
        Some(Self::UnresolvedVariable { name, names })
    }

    /// The category recorded in the report.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::UnresolvedVariable { .. } => FailureKind::UnresolvedVariable,
            Self::RequestFailed { .. } => FailureKind::RequestFailed,
        }
    }
}
