//! Authorization gate.
//!
//! Decides, from the provider's authorization status, whether an operation
//! may proceed, and triggers the one-time access prompt when the user has not
//! been asked yet.

use std::sync::Arc;

use tokio::sync::Mutex;

use calsync_core::auth::{
    gate_decision, prompt_outcome, AuthError, AuthorizationState, GateDecision, StoreState,
};
use calsync_core::provider::CalendarProvider;

use super::state::StateCell;

pub(crate) struct AuthorizationGate<P> {
    provider: Arc<P>,
    state: Arc<StateCell>,
    /// Serializes prompts and records the answer once one was given.
    prompt: Mutex<Option<bool>>,
}

impl<P: CalendarProvider> AuthorizationGate<P> {
    pub(crate) fn new(provider: Arc<P>, state: Arc<StateCell>) -> Self {
        Self {
            provider,
            state,
            prompt: Mutex::new(None),
        }
    }

    pub(crate) async fn ensure_authorized(&self) -> Result<(), AuthError> {
        match gate_decision(self.provider.authorization_status()) {
            GateDecision::Proceed => self.settle(Ok(())),
            GateDecision::Refuse(err) => self.settle(Err(err)),
            GateDecision::Prompt => self.prompt_once().await,
        }
    }

    async fn prompt_once(&self) -> Result<(), AuthError> {
        let mut answer = self.prompt.lock().await;

        // Another caller may have been answered while this one waited.
        let status = self.provider.authorization_status();
        if status != AuthorizationState::NotDetermined {
            return match gate_decision(status) {
                GateDecision::Refuse(err) => self.settle(Err(err)),
                _ => self.settle(Ok(())),
            };
        }
        if let Some(granted) = *answer {
            tracing::trace!(granted, "Reusing recorded prompt answer");
            return self.settle(prompt_outcome(granted));
        }

        self.state.set(StoreState::AuthorizationPending);
        tracing::info!("Requesting calendar access");

        let outcome = match self.provider.request_access().await {
            Ok(granted) => {
                *answer = Some(granted);
                tracing::info!(granted, "Calendar access prompt answered");
                prompt_outcome(granted)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Calendar access request failed");
                Err(AuthError::Unknown(err.to_string()))
            }
        };

        self.settle(outcome)
    }

    fn settle(&self, outcome: Result<(), AuthError>) -> Result<(), AuthError> {
        match &outcome {
            Ok(()) => self.state.authorized(),
            Err(err) => {
                tracing::debug!(error = %err, "Calendar access refused");
                self.state.unauthorized();
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryProvider;
    use calsync_core::UserFacing;
    use std::time::Duration;

    fn gate(provider: InMemoryProvider) -> (AuthorizationGate<InMemoryProvider>, Arc<StateCell>) {
        let state = Arc::new(StateCell::new());
        (
            AuthorizationGate::new(Arc::new(provider), state.clone()),
            state,
        )
    }

    #[tokio::test]
    async fn test_authorized_proceeds_without_prompt() {
        let (gate, state) = gate(InMemoryProvider::new());

        gate.ensure_authorized().await.unwrap();

        assert_eq!(state.get(), StoreState::Ready);
        assert_eq!(gate.provider.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_denied_fails_without_prompt() {
        let (gate, state) =
            gate(InMemoryProvider::new().with_authorization(AuthorizationState::Denied));

        let err = gate.ensure_authorized().await.unwrap_err();

        assert!(matches!(err, AuthError::Denied { .. }));
        assert_eq!(state.get(), StoreState::Uninitialized);
        assert_eq!(gate.provider.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_restricted_is_handled_as_denial() {
        let (gate, state) =
            gate(InMemoryProvider::new().with_authorization(AuthorizationState::Restricted));

        let err = gate.ensure_authorized().await.unwrap_err();

        assert!(err.is_denied());
        assert_eq!(
            err.recovery_hint(),
            AuthError::denied("Authorization was rejected").recovery_hint()
        );
        assert_eq!(state.get(), StoreState::Uninitialized);
        assert_eq!(gate.provider.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_restricted_and_unknown_fail() {
        let (restricted, _) =
            gate(InMemoryProvider::new().with_authorization(AuthorizationState::Restricted));
        let (unknown, _) =
            gate(InMemoryProvider::new().with_authorization(AuthorizationState::Unknown));

        assert_eq!(
            restricted.ensure_authorized().await,
            Err(AuthError::Restricted)
        );
        assert!(matches!(
            unknown.ensure_authorized().await,
            Err(AuthError::Unknown(_))
        ));
    }

    #[tokio::test]
    async fn test_prompt_granted() {
        let (gate, state) = gate(
            InMemoryProvider::new().with_authorization(AuthorizationState::NotDetermined),
        );

        gate.ensure_authorized().await.unwrap();

        assert_eq!(state.get(), StoreState::Ready);
        assert_eq!(gate.provider.prompt_count(), 1);
        assert_eq!(
            gate.provider.authorization_status(),
            AuthorizationState::Authorized
        );
    }

    #[tokio::test]
    async fn test_prompt_refused() {
        let (gate, state) = gate(
            InMemoryProvider::new()
                .with_authorization(AuthorizationState::NotDetermined)
                .with_prompt_answer(false),
        );

        let err = gate.ensure_authorized().await.unwrap_err();

        assert!(err.is_denied());
        assert_eq!(state.get(), StoreState::Uninitialized);

        // The refusal sticks: no second prompt.
        assert!(gate.ensure_authorized().await.is_err());
        assert_eq!(gate.provider.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_prompt() {
        let (gate, _) = gate(
            InMemoryProvider::new()
                .with_authorization(AuthorizationState::NotDetermined)
                .with_prompt_delay(Duration::from_millis(50)),
        );

        let (a, b, c) = tokio::join!(
            gate.ensure_authorized(),
            gate.ensure_authorized(),
            gate.ensure_authorized()
        );

        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(gate.provider.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_revocation_is_noticed() {
        let (gate, state) = gate(InMemoryProvider::new());
        gate.ensure_authorized().await.unwrap();

        gate.provider.set_authorization(AuthorizationState::Denied);

        assert!(gate.ensure_authorized().await.is_err());
        assert_eq!(state.get(), StoreState::Uninitialized);
    }
}
