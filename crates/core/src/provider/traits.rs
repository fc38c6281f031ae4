use async_trait::async_trait;

use crate::auth::AuthorizationState;
use crate::calendar::{CalendarId, CalendarRef, EventId, EventRecord, NewCalendar, Source, Span};

use super::{DateRange, EventPredicate, Result};

/// Capabilities the facade needs from a calendar backend.
///
/// Every write takes a `commit` flag: `true` flushes the store's whole pending
/// change set immediately, `false` stages the change until [`commit`] or
/// [`reset`]. Whether staged changes are visible to queries is up to the
/// provider.
///
/// [`commit`]: CalendarProvider::commit
/// [`reset`]: CalendarProvider::reset
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Current authorization status for event data.
    fn authorization_status(&self) -> AuthorizationState;

    /// Shows the permission prompt and waits for the answer.
    ///
    /// Returns `Ok(true)` when access was granted.
    async fn request_access(&self) -> Result<bool>;

    /// Lists every calendar that holds events, in provider enumeration order.
    async fn calendars(&self) -> Result<Vec<CalendarRef>>;

    /// Lists every source (account) known to the provider.
    async fn sources(&self) -> Result<Vec<Source>>;

    /// The source new calendars go to when no better match exists.
    async fn default_source(&self) -> Result<Option<Source>>;

    /// Saves a new calendar.
    async fn save_calendar(&self, calendar: &NewCalendar, commit: bool) -> Result<CalendarRef>;

    /// Deletes a calendar along with its events.
    async fn delete_calendar(&self, id: &CalendarId, commit: bool) -> Result<()>;

    /// Saves an event and returns it with its (possibly new) identifier.
    async fn save_event(&self, event: &EventRecord, span: Span, commit: bool)
        -> Result<EventRecord>;

    /// Deletes an event.
    async fn delete_event(&self, id: &EventId, span: Span, commit: bool) -> Result<()>;

    /// Looks up an event by identifier.
    async fn event(&self, id: &EventId) -> Result<Option<EventRecord>>;

    /// Builds a date-range + calendar-set predicate.
    ///
    /// Fails with [`super::ProviderError::PredicateRejected`] when the range
    /// exceeds what the provider supports.
    fn predicate(&self, range: DateRange, calendars: &[CalendarId]) -> Result<EventPredicate>;

    /// Fetches events matching a predicate.
    async fn events_matching(&self, predicate: &EventPredicate) -> Result<Vec<EventRecord>>;

    /// Flushes the pending change set.
    async fn commit(&self) -> Result<()>;

    /// Discards the pending change set, reverting to the last committed state.
    async fn reset(&self) -> Result<()>;
}
