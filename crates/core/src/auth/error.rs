use thiserror::Error;

use super::StoreState;
use crate::error::UserFacing;

const SETTINGS_HINT: &str = "Re-enable calendar access for this app in the system settings";

/// Errors raised before any calendar data is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Denied access to calendar: {reason}")]
    Denied { reason: String },

    #[error("Access to calendar data is restricted on this device")]
    Restricted,

    #[error("Unsupported authorization status: {0}")]
    Unknown(String),

    #[error("Calendar store is not ready (state: {0})")]
    NotReady(StoreState),
}

impl AuthError {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }

    /// True for every variant that means the user (or a policy) refused access.
    pub fn is_denied(&self) -> bool {
        matches!(self, AuthError::Denied { .. } | AuthError::Restricted)
    }
}

impl UserFacing for AuthError {
    fn description(&self) -> &'static str {
        match self {
            AuthError::Denied { .. } | AuthError::Restricted => "Denied access to calendar",
            AuthError::Unknown(_) => "Calendar authorization failed",
            AuthError::NotReady(_) => "Calendar is busy",
        }
    }

    fn failure_reason(&self) -> String {
        match self {
            AuthError::Denied { reason } => reason.clone(),
            AuthError::Restricted => "Access is restricted by a device policy".to_string(),
            AuthError::Unknown(status) => format!("The provider reported status '{status}'"),
            AuthError::NotReady(state) => format!("The store is {state}"),
        }
    }

    fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            AuthError::Denied { .. } | AuthError::Restricted | AuthError::Unknown(_) => {
                Some(SETTINGS_HINT)
            }
            AuthError::NotReady(_) => Some("Wait for the pending operation to finish"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_display() {
        let error = AuthError::denied("Authorization was rejected");
        assert_eq!(
            error.to_string(),
            "Denied access to calendar: Authorization was rejected"
        );
    }

    #[test]
    fn test_not_ready_display() {
        let error = AuthError::NotReady(StoreState::Committing);
        assert_eq!(
            error.to_string(),
            "Calendar store is not ready (state: committing)"
        );
    }

    #[test]
    fn test_denial_hints_point_to_settings() {
        assert_eq!(AuthError::Restricted.recovery_hint(), Some(SETTINGS_HINT));
        assert_eq!(AuthError::denied("no").recovery_hint(), Some(SETTINGS_HINT));
        assert!(AuthError::Restricted.is_denied());
        assert!(!AuthError::Unknown("x".into()).is_denied());
    }
}
