use super::{AuthError, AuthorizationState};

/// What the gate should do for a given provider status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Access is granted, proceed without side effects.
    Proceed,
    /// The user has not been asked yet, prompt once.
    Prompt,
    /// Fail without touching the provider.
    Refuse(AuthError),
}

/// Decide how to handle the current authorization status.
pub fn gate_decision(state: AuthorizationState) -> GateDecision {
    match state {
        AuthorizationState::Authorized => GateDecision::Proceed,
        AuthorizationState::NotDetermined => GateDecision::Prompt,
        AuthorizationState::Denied => GateDecision::Refuse(AuthError::denied(
            "Authorization was rejected",
        )),
        AuthorizationState::Restricted => GateDecision::Refuse(AuthError::Restricted),
        AuthorizationState::Unknown => {
            GateDecision::Refuse(AuthError::Unknown(state.to_string()))
        }
    }
}

/// Map the user's answer to a permission prompt.
pub fn prompt_outcome(granted: bool) -> Result<(), AuthError> {
    if granted {
        Ok(())
    } else {
        Err(AuthError::denied("The permission prompt was refused"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorized_proceeds() {
        assert_eq!(
            gate_decision(AuthorizationState::Authorized),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_not_determined_prompts() {
        assert_eq!(
            gate_decision(AuthorizationState::NotDetermined),
            GateDecision::Prompt
        );
    }

    #[test]
    fn test_denied_and_restricted_refuse() {
        assert!(matches!(
            gate_decision(AuthorizationState::Denied),
            GateDecision::Refuse(AuthError::Denied { .. })
        ));
        assert_eq!(
            gate_decision(AuthorizationState::Restricted),
            GateDecision::Refuse(AuthError::Restricted)
        );
    }

    #[test]
    fn test_unknown_never_proceeds() {
        assert!(matches!(
            gate_decision(AuthorizationState::Unknown),
            GateDecision::Refuse(AuthError::Unknown(_))
        ));
    }

    #[test]
    fn test_prompt_outcome() {
        assert!(prompt_outcome(true).is_ok());
        assert!(matches!(
            prompt_outcome(false),
            Err(AuthError::Denied { .. })
        ));
    }
}
