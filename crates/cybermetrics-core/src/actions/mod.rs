// Domain actions: map API calls onto a uniform success/error result.
//
// Every action returns `ActionResult<T>`. Transport failures, server errors
// and client-side validation all collapse into an `ActionError` carrying the
// single message the UI shows next to the control that triggered it.

pub mod auth;
pub mod health;
pub mod players;

use thiserror::Error;

use crate::api::ApiError;

/// The failure half of an action result: one displayable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Collapse an API failure, using `fallback` when the server gave no
    /// usable detail.
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        Self::new(err.user_message(fallback))
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
