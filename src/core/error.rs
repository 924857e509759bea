//! # Navigation Errors
//!
//! Errors are data. Handlers fold them into the status slot and the activity
//! log; none of them stop the event loop.
//!
//! | Variant                 | Severity    | Shown as                          |
//! |-------------------------|-------------|-----------------------------------|
//! | `NotRegistered`         | warning     | status line                       |
//! | `MissingParent`         | warning     | status line                       |
//! | `PartialFanoutFailure`  | warning     | status line, partial results kept |
//! | `TotalFanoutFailure`    | error       | status line, view shows error     |
//! | `StaleRefreshDiscarded` | silent      | log only                          |
//! | `Timeout`               | warning     | status line                       |
//! | `Command`               | warning     | status line                       |

use std::time::Duration;
use thiserror::Error;

use crate::adapter::AdapterError;
use crate::core::command::CommandError;

#[derive(Debug, Clone, Error)]
pub enum NavError {
    #[error("no adapter registered for {service}/{resource_type}")]
    NotRegistered {
        service: String,
        resource_type: String,
    },

    #[error("{service}/{resource_type} can only be opened from its parent")]
    MissingParent {
        service: String,
        resource_type: String,
    },

    #[error("{failed} of {total} regions/profiles failed: {detail}")]
    PartialFanoutFailure {
        failed: usize,
        total: usize,
        detail: String,
    },

    #[error("every region/profile failed: {0}")]
    TotalFanoutFailure(String),

    #[error("discarded stale refresh #{received} (current #{current})")]
    StaleRefreshDiscarded { received: u64, current: u64 },

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: String,
        timeout: Duration,
    },

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("{0}")]
    Adapter(AdapterError),
}

impl From<AdapterError> for NavError {
    fn from(error: AdapterError) -> Self {
        match error {
            AdapterError::AllBranchesFailed(failures) => NavError::TotalFanoutFailure(
                failures
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            AdapterError::Timeout(timeout) => NavError::Timeout {
                operation: "request".to_string(),
                timeout,
            },
            other => NavError::Adapter(other),
        }
    }
}

impl NavError {
    pub fn not_registered(service: &str, resource_type: &str) -> Self {
        NavError::NotRegistered {
            service: service.to_string(),
            resource_type: resource_type.to_string(),
        }
    }

    /// Errors that block the operation they came from. Everything else is a warning.
    pub fn is_blocking(&self) -> bool {
        matches!(self, NavError::TotalFanoutFailure(_) | NavError::Adapter(_))
    }
}
