//! The calendar sync facade.
//!
//! [`CalendarSyncFacade`] owns a provider handle and runs every calendar and
//! event operation through the authorization gate and the store state
//! machine:
//!
//! ```text
//! Uninitialized → AuthorizationPending → Ready → (Committing | Resetting) → Ready
//! ```
//!
//! Operations are split by concern: `identity` resolves and creates the
//! managed calendar, `events` inserts, queries and removes events, and
//! [`Batch`] stages writes for a single commit.

mod batch;
mod events;
mod gate;
mod identity;
mod state;

use std::sync::Arc;

use tokio::sync::broadcast;

use calsync_core::auth::{AuthError, StoreState};
use calsync_core::calendar::StoreChange;
use calsync_core::provider::{translate, CalendarProvider};
use calsync_core::{ConfigError, FacadeConfig, Result};

pub use batch::Batch;

use gate::AuthorizationGate;
use state::StateCell;

/// Buffered store changes per subscriber before it starts lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Facade over a [`CalendarProvider`] scoped to one named calendar.
///
/// Multiple facades may share a provider, but they then share its pending
/// change set: a commit or reset from one affects the other's staged writes.
pub struct CalendarSyncFacade<P> {
    provider: Arc<P>,
    config: FacadeConfig,
    gate: AuthorizationGate<P>,
    state: Arc<StateCell>,
    changes: broadcast::Sender<StoreChange>,
}

impl<P: CalendarProvider> CalendarSyncFacade<P> {
    pub fn new(provider: Arc<P>, config: FacadeConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let state = Arc::new(StateCell::new());
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Ok(Self {
            gate: AuthorizationGate::new(provider.clone(), state.clone()),
            provider,
            config,
            state,
            changes,
        })
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Current store lifecycle state.
    pub fn state(&self) -> StoreState {
        self.state.get()
    }

    /// Makes sure calendar access is granted, prompting the user at most once.
    ///
    /// Concurrent callers during a prompt wait for its answer.
    pub async fn authorize(&self) -> std::result::Result<(), AuthError> {
        self.gate.ensure_authorized().await
    }

    /// Subscribe to changes applied through this facade.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Returns a view whose writes are staged until [`Batch::commit`].
    pub fn batch(&self) -> Batch<'_, P> {
        Batch::new(self)
    }

    /// Flushes every pending change in the store.
    pub async fn commit(&self) -> Result<()> {
        self.gate.ensure_authorized().await?;
        let _guard = self.state.enter(StoreState::Committing)?;

        self.provider
            .commit()
            .await
            .map_err(translate::commit_error)?;

        tracing::debug!("Committed pending changes");
        self.publish(StoreChange::Committed);
        Ok(())
    }

    /// Discards every pending change, reverting to the last committed state.
    pub async fn reset(&self) -> Result<()> {
        self.gate.ensure_authorized().await?;
        let _guard = self.state.enter(StoreState::Resetting)?;

        self.provider.reset().await.map_err(translate::reset_error)?;

        tracing::debug!("Discarded pending changes");
        self.publish(StoreChange::Reset);
        Ok(())
    }

    /// Authorizes, then fails unless the store is ready for operations.
    async fn ready(&self) -> Result<()> {
        self.gate.ensure_authorized().await?;
        self.state.require_ready()?;
        Ok(())
    }

    fn publish(&self, change: StoreChange) {
        // No subscribers is fine.
        let _ = self.changes.send(change);
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::provider::InMemoryProvider;
    use calsync_core::auth::AuthorizationState;
    use calsync_core::calendar::EventRecord;
    use calsync_core::FacadeError;

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let mut config = FacadeConfig::new("Work").unwrap();
        config.window_days = 0;

        let result = CalendarSyncFacade::new(Arc::new(InMemoryProvider::new()), config);
        assert!(matches!(result, Err(ConfigError::InvalidWindow(0))));
    }

    #[tokio::test]
    async fn test_new_rejects_oversized_window() {
        let mut config = FacadeConfig::new("Work").unwrap();
        config.window_days = 200_000_000;

        let result = CalendarSyncFacade::new(Arc::new(InMemoryProvider::new()), config);
        assert!(matches!(
            result,
            Err(ConfigError::WindowTooLarge(200_000_000))
        ));
    }

    #[tokio::test]
    async fn test_starts_uninitialized_and_becomes_ready() {
        let facade = facade(InMemoryProvider::new());
        assert_eq!(facade.state(), StoreState::Uninitialized);

        facade.authorize().await.unwrap();
        assert_eq!(facade.state(), StoreState::Ready);
    }

    #[tokio::test]
    async fn test_commit_publishes_and_returns_to_ready() {
        let facade = facade(InMemoryProvider::new());
        let mut changes = facade.subscribe();

        facade.commit().await.unwrap();

        assert_eq!(facade.state(), StoreState::Ready);
        assert_eq!(changes.recv().await.unwrap(), StoreChange::Committed);
    }

    #[tokio::test]
    async fn test_commit_failure_is_translated() {
        let facade = facade(InMemoryProvider::new());
        facade.provider().fail_commits(true).await;

        let err = facade.commit().await.unwrap_err();

        assert!(matches!(err, FacadeError::Commit(_)));
        assert_eq!(facade.state(), StoreState::Ready);
    }

    #[tokio::test]
    async fn test_reset_discards_staged_insert() {
        let facade = facade(InMemoryProvider::new());
        let calendar = facade.create_or_get("Work", None).await.unwrap();

        facade
            .batch()
            .insert(&EventRecord::new(
                calendar.id.clone(),
                "Staged",
                soon(9),
                soon(10),
            ))
            .await
            .unwrap();
        facade.reset().await.unwrap();

        let events = facade.query_default(Some(&calendar)).await.unwrap();
        assert!(events.is_empty());
        assert_eq!(facade.state(), StoreState::Ready);
    }

    #[tokio::test]
    async fn test_commit_requires_authorization() {
        let facade =
            facade(InMemoryProvider::new().with_authorization(AuthorizationState::Denied));

        let err = facade.commit().await.unwrap_err();
        assert!(err.as_auth().is_some_and(AuthError::is_denied));
    }
}
