//! Staged writes.

use calsync_core::calendar::{CalendarRef, EventId, EventRecord, SourceKind, Span};
use calsync_core::provider::CalendarProvider;
use calsync_core::Result;

use super::CalendarSyncFacade;

/// A view over the facade whose writes are staged rather than committed.
///
/// Staged changes become durable on [`Batch::commit`] and are discarded by
/// [`Batch::reset`]. Whether queries see them before the commit depends on
/// the provider.
pub struct Batch<'a, P> {
    facade: &'a CalendarSyncFacade<P>,
}

impl<'a, P: CalendarProvider> Batch<'a, P> {
    pub(super) fn new(facade: &'a CalendarSyncFacade<P>) -> Self {
        Self { facade }
    }

    pub async fn insert(&self, event: &EventRecord) -> Result<EventRecord> {
        self.facade.insert_with(event, false).await
    }

    pub async fn remove_event(&self, id: &EventId) -> Result<()> {
        self.facade
            .remove_event_with(id, self.facade.config.removal_span, false)
            .await
    }

    pub async fn remove_event_with_span(&self, id: &EventId, span: Span) -> Result<()> {
        self.facade.remove_event_with(id, span, false).await
    }

    pub async fn create_or_get(
        &self,
        name: &str,
        source_hint: Option<SourceKind>,
    ) -> Result<CalendarRef> {
        self.facade.create_or_get_with(name, source_hint, false).await
    }

    pub async fn remove_calendar(&self, calendar: &CalendarRef) -> Result<()> {
        self.facade.remove_calendar_with(calendar, false).await
    }

    pub async fn commit(self) -> Result<()> {
        self.facade.commit().await
    }

    pub async fn reset(self) -> Result<()> {
        self.facade.reset().await
    }
}
