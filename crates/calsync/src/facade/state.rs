//! Store lifecycle tracking.

use std::sync::{Mutex, MutexGuard, PoisonError};

use calsync_core::auth::{AuthError, StoreState};

/// Holds the facade's current [`StoreState`].
///
/// The lock is never held across an await point.
#[derive(Debug)]
pub(crate) struct StateCell {
    state: Mutex<StoreState>,
}

impl StateCell {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::Uninitialized),
        }
    }

    pub(crate) fn get(&self) -> StoreState {
        *self.lock()
    }

    pub(crate) fn set(&self, next: StoreState) {
        let mut state = self.lock();
        let previous = *state;
        if previous != next {
            tracing::trace!(from = %previous, to = %next, "Store state changed");
            *state = next;
        }
    }

    /// Marks the store ready unless a commit or reset is in flight.
    pub(crate) fn authorized(&self) {
        let mut state = self.lock();
        if matches!(
            *state,
            StoreState::Uninitialized | StoreState::AuthorizationPending
        ) {
            *state = StoreState::Ready;
        }
    }

    /// Drops back to uninitialized after authorization was refused or revoked.
    pub(crate) fn unauthorized(&self) {
        let mut state = self.lock();
        if matches!(
            *state,
            StoreState::Ready | StoreState::AuthorizationPending
        ) {
            *state = StoreState::Uninitialized;
        }
    }

    /// Fails with `NotReady` unless the store is ready.
    pub(crate) fn require_ready(&self) -> Result<(), AuthError> {
        match self.get() {
            StoreState::Ready => Ok(()),
            other => Err(AuthError::NotReady(other)),
        }
    }

    /// Moves from `Ready` to `transient`, returning a guard that moves back on drop.
    pub(crate) fn enter(&self, transient: StoreState) -> Result<StateGuard<'_>, AuthError> {
        let mut state = self.lock();
        if *state != StoreState::Ready {
            return Err(AuthError::NotReady(*state));
        }
        *state = transient;
        Ok(StateGuard { cell: self })
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restores `Ready` when a commit or reset finishes, including on cancellation.
pub(crate) struct StateGuard<'a> {
    cell: &'a StateCell,
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        self.cell.set(StoreState::Ready);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_uninitialized() {
        let cell = StateCell::new();
        assert_eq!(cell.get(), StoreState::Uninitialized);
        assert_eq!(
            cell.require_ready(),
            Err(AuthError::NotReady(StoreState::Uninitialized))
        );
    }

    #[test]
    fn test_guard_restores_ready() {
        let cell = StateCell::new();
        cell.authorized();

        {
            let _guard = cell.enter(StoreState::Committing).unwrap();
            assert_eq!(cell.get(), StoreState::Committing);
            assert_eq!(
                cell.require_ready(),
                Err(AuthError::NotReady(StoreState::Committing))
            );
        }

        assert_eq!(cell.get(), StoreState::Ready);
    }

    #[test]
    fn test_enter_requires_ready() {
        let cell = StateCell::new();
        cell.authorized();
        let _guard = cell.enter(StoreState::Resetting).unwrap();

        assert!(matches!(
            cell.enter(StoreState::Committing),
            Err(AuthError::NotReady(StoreState::Resetting))
        ));
    }

    #[test]
    fn test_authorization_does_not_interrupt_commit() {
        let cell = StateCell::new();
        cell.authorized();
        let _guard = cell.enter(StoreState::Committing).unwrap();

        cell.authorized();
        cell.unauthorized();

        assert_eq!(cell.get(), StoreState::Committing);
    }

    #[test]
    fn test_revocation_returns_to_uninitialized() {
        let cell = StateCell::new();
        cell.authorized();
        cell.unauthorized();
        assert_eq!(cell.get(), StoreState::Uninitialized);
    }
}
