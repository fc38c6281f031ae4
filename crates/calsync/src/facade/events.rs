//! Event operations on a resolved calendar.

use chrono::Utc;

use calsync_core::calendar::{
    find_calendar_by_id, sort_events, validate_event, CalendarRef, ClearReport, EventError,
    EventId, EventRecord, Span, StoreChange,
};
use calsync_core::provider::{translate, CalendarProvider, DateRange};
use calsync_core::{ClearPolicy, MissingEventPolicy, Result};

use super::CalendarSyncFacade;

impl<P: CalendarProvider> CalendarSyncFacade<P> {
    /// Creates an untitled draft in `calendar`, starting and ending now.
    ///
    /// Returns `None` when there is no calendar to attach it to.
    pub fn create_draft(&self, calendar: Option<&CalendarRef>) -> Option<EventRecord> {
        calendar.map(|calendar| EventRecord::draft(calendar.id.clone(), Utc::now()))
    }

    /// Saves `event` and returns it with the identifier the provider issued.
    pub async fn insert(&self, event: &EventRecord) -> Result<EventRecord> {
        self.insert_with(event, self.config.commit_writes).await
    }

    /// Looks up an event by identifier.
    pub async fn event(&self, id: &EventId) -> Result<Option<EventRecord>> {
        self.ready().await?;
        self.provider
            .event(id)
            .await
            .map_err(translate::query_error)
    }

    /// Removes an event using the configured span.
    pub async fn remove_event(&self, id: &EventId) -> Result<()> {
        self.remove_event_with(id, self.config.removal_span, self.config.commit_writes)
            .await
    }

    pub async fn remove_event_with_span(&self, id: &EventId, span: Span) -> Result<()> {
        self.remove_event_with(id, span, self.config.commit_writes)
            .await
    }

    /// Returns the events of `calendar` overlapping `range`, ordered by start,
    /// end and title.
    ///
    /// Fails with `NoCalendar` when `calendar` is absent or no longer exists.
    /// A range the provider refuses is reported, never truncated.
    pub async fn query(
        &self,
        range: DateRange,
        calendar: Option<&CalendarRef>,
    ) -> Result<Vec<EventRecord>> {
        self.ready().await?;
        let calendar = calendar.ok_or(EventError::NoCalendar)?;

        let calendars = self
            .provider
            .calendars()
            .await
            .map_err(translate::lookup_error)?;
        if find_calendar_by_id(&calendars, &calendar.id).is_none() {
            tracing::debug!(calendar_id = %calendar.id, "Query against a stale calendar");
            return Err(EventError::NoCalendar.into());
        }

        let predicate = self
            .provider
            .predicate(range, std::slice::from_ref(&calendar.id))
            .map_err(translate::query_error)?;
        let mut events = self
            .provider
            .events_matching(&predicate)
            .await
            .map_err(translate::query_error)?;
        sort_events(&mut events);

        tracing::trace!(calendar_id = %calendar.id, count = events.len(), "Queried events");
        Ok(events)
    }

    /// Queries the configured window around now.
    pub async fn query_default(&self, calendar: Option<&CalendarRef>) -> Result<Vec<EventRecord>> {
        self.query(self.default_range(), calendar).await
    }

    /// Removes every event of `calendar` in the configured window around now.
    ///
    /// How failures are handled depends on [`ClearPolicy`]. Removals are
    /// staged unless the config commits clears.
    pub async fn clear_all(&self, calendar: &CalendarRef) -> Result<ClearReport> {
        let policy = self.config.clear_policy;
        let report = match policy {
            ClearPolicy::RecreateCalendar => self.recreate(calendar).await?,
            ClearPolicy::BestEffort | ClearPolicy::FailFast => {
                self.sweep(calendar, policy).await?
            }
        };

        tracing::debug!(
            calendar_id = %calendar.id,
            removed = report.removed.len(),
            failed = report.failed.len(),
            "Cleared calendar"
        );
        self.publish(StoreChange::Cleared {
            calendar_id: calendar.id.clone(),
            removed: report.removed.len(),
            failed: report.failed.len(),
        });
        Ok(report)
    }

    pub(crate) async fn insert_with(
        &self,
        event: &EventRecord,
        commit: bool,
    ) -> Result<EventRecord> {
        self.ready().await?;
        validate_event(event)?;

        let saved = self
            .provider
            .save_event(event, Span::ThisEvent, commit)
            .await
            .map_err(translate::event_save_error)?;

        if let Some(id) = &saved.id {
            tracing::debug!(event_id = %id, title = %saved.title, commit, "Saved event");
        }
        self.publish(StoreChange::EventSaved {
            event: saved.clone(),
        });
        Ok(saved)
    }

    pub(crate) async fn remove_event_with(
        &self,
        id: &EventId,
        span: Span,
        commit: bool,
    ) -> Result<()> {
        self.ready().await?;

        let existing = self
            .provider
            .event(id)
            .await
            .map_err(translate::query_error)?;
        let Some(existing) = existing else {
            return match self.config.missing_event {
                MissingEventPolicy::Ignore => {
                    tracing::debug!(event_id = %id, "Event already gone, nothing to remove");
                    Ok(())
                }
                MissingEventPolicy::Report => Err(EventError::NotFound(id.to_string()).into()),
            };
        };

        self.provider
            .delete_event(id, span, commit)
            .await
            .map_err(|err| translate::event_remove_error(err, id))?;

        tracing::debug!(event_id = %id, commit, "Removed event");
        self.publish(StoreChange::EventRemoved {
            event_id: id.clone(),
            calendar_id: existing.calendar_id,
        });
        Ok(())
    }

    async fn sweep(&self, calendar: &CalendarRef, policy: ClearPolicy) -> Result<ClearReport> {
        let events = self.query_default(Some(calendar)).await?;
        let mut report = ClearReport::default();

        for id in events.into_iter().filter_map(|event| event.id) {
            match self.provider.delete_event(&id, Span::ThisEvent, false).await {
                Ok(()) => report.removed.push(id),
                Err(err) => {
                    let err = translate::event_remove_error(err, &id);
                    // Lost access ends the sweep under every policy.
                    if policy == ClearPolicy::FailFast || err.as_auth().is_some() {
                        return Err(err);
                    }
                    tracing::warn!(
                        event_id = %id,
                        error = %err,
                        "Failed to remove event, continuing"
                    );
                    report.failed.push(id);
                }
            }
        }

        if self.config.commit_clear {
            self.commit().await?;
        }
        Ok(report)
    }

    async fn recreate(&self, calendar: &CalendarRef) -> Result<ClearReport> {
        let events = self.query_default(Some(calendar)).await?;

        self.remove_calendar_with(calendar, true).await?;
        let recreated = self
            .create_or_get_with(&calendar.title, Some(calendar.source.kind), true)
            .await?;

        Ok(ClearReport {
            removed: events.into_iter().filter_map(|event| event.id).collect(),
            failed: Vec::new(),
            recreated: Some(recreated),
        })
    }

    fn default_range(&self) -> DateRange {
        DateRange::around(Utc::now(), self.config.window())
    }
}
