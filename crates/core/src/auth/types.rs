use serde::{Deserialize, Serialize};

/// Calendar access status as reported by the provider.
///
/// The facade never asserts a state; it only observes it or asks the provider
/// to prompt the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationState {
    Unknown,
    NotDetermined,
    Authorized,
    Denied,
    Restricted,
}

impl std::fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::NotDetermined => write!(f, "not_determined"),
            Self::Authorized => write!(f, "authorized"),
            Self::Denied => write!(f, "denied"),
            Self::Restricted => write!(f, "restricted"),
        }
    }
}

/// Lifecycle of a single store handle.
///
/// `Ready` is the only state from which calendar and event operations run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreState {
    Uninitialized,
    AuthorizationPending,
    Ready,
    Committing,
    Resetting,
}

impl StoreState {
    /// Returns true if calendar and event operations may run.
    pub fn is_ready(&self) -> bool {
        matches!(self, StoreState::Ready)
    }
}

impl std::fmt::Display for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::AuthorizationPending => write!(f, "authorization_pending"),
            Self::Ready => write!(f, "ready"),
            Self::Committing => write!(f, "committing"),
            Self::Resetting => write!(f, "resetting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_ready_is_ready() {
        assert!(StoreState::Ready.is_ready());
        assert!(!StoreState::Uninitialized.is_ready());
        assert!(!StoreState::AuthorizationPending.is_ready());
        assert!(!StoreState::Committing.is_ready());
        assert!(!StoreState::Resetting.is_ready());
    }

    #[test]
    fn test_authorization_state_serializes_snake_case() {
        let json = serde_json::to_string(&AuthorizationState::NotDetermined).unwrap();
        assert_eq!(json, "\"not_determined\"");
    }
}
