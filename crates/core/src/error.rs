//! Error taxonomy surfaced by the facade.
//!
//! Each concern owns its error enum (`auth`, `calendar`); [`FacadeError`]
//! unifies them for operations that cross concerns. Provider errors never
//! appear here: they are translated at the boundary by
//! [`crate::provider::translate`].

use thiserror::Error;

use crate::auth::AuthError;
use crate::calendar::{CalendarError, EventError};

/// Text meant for end-user display, in addition to the `Display` message.
pub trait UserFacing {
    /// Short, title-like description ("Invalid range").
    fn description(&self) -> &'static str;

    /// Why the operation failed.
    fn failure_reason(&self) -> String;

    /// What the user can do about it, when something actionable exists.
    fn recovery_hint(&self) -> Option<&'static str>;

    /// Description, reason and hint joined into one line.
    fn user_message(&self) -> String {
        match self.recovery_hint() {
            Some(hint) => format!(
                "{}: {}. {}",
                self.description(),
                self.failure_reason(),
                hint
            ),
            None => format!("{}: {}", self.description(), self.failure_reason()),
        }
    }
}

/// Any failure the facade can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FacadeError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Reset failed: {0}")]
    Reset(String),
}

impl FacadeError {
    /// Returns the authorization error, if this is one.
    pub fn as_auth(&self) -> Option<&AuthError> {
        match self {
            FacadeError::Auth(err) => Some(err),
            _ => None,
        }
    }
}

impl UserFacing for FacadeError {
    fn description(&self) -> &'static str {
        match self {
            FacadeError::Auth(err) => err.description(),
            FacadeError::Calendar(err) => err.description(),
            FacadeError::Event(err) => err.description(),
            FacadeError::Commit(_) => "Could not save changes",
            FacadeError::Reset(_) => "Could not discard changes",
        }
    }

    fn failure_reason(&self) -> String {
        match self {
            FacadeError::Auth(err) => err.failure_reason(),
            FacadeError::Calendar(err) => err.failure_reason(),
            FacadeError::Event(err) => err.failure_reason(),
            FacadeError::Commit(reason) | FacadeError::Reset(reason) => reason.clone(),
        }
    }

    fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            FacadeError::Auth(err) => err.recovery_hint(),
            FacadeError::Calendar(err) => err.recovery_hint(),
            FacadeError::Event(err) => err.recovery_hint(),
            FacadeError::Commit(_) => Some("Try again, or reset to discard pending changes"),
            FacadeError::Reset(_) => None,
        }
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, FacadeError>;
