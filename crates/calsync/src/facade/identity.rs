//! Calendar identity: find, create and remove the managed calendar.

use calsync_core::calendar::{
    find_calendar_by_name, select_source, validate_calendar_name, CalendarError, CalendarRef,
    NewCalendar, SourceKind, StoreChange,
};
use calsync_core::provider::{translate, CalendarProvider};
use calsync_core::Result;

use super::CalendarSyncFacade;

impl<P: CalendarProvider> CalendarSyncFacade<P> {
    /// Finds an event calendar titled exactly `name`.
    ///
    /// If several calendars share the title, the first one the provider
    /// enumerates wins.
    pub async fn resolve(&self, name: &str) -> Result<Option<CalendarRef>> {
        self.ready().await?;
        self.lookup(name).await
    }

    /// Resolves the configured calendar.
    pub async fn calendar(&self) -> Result<Option<CalendarRef>> {
        self.resolve(&self.config.calendar_name).await
    }

    /// Returns the calendar titled `name`, creating it if it does not exist.
    ///
    /// New calendars go to a writable source of `source_hint` (the configured
    /// preferred kind when `None`), falling back to the provider's default
    /// source.
    pub async fn create_or_get(
        &self,
        name: &str,
        source_hint: Option<SourceKind>,
    ) -> Result<CalendarRef> {
        self.create_or_get_with(name, source_hint, self.config.commit_writes)
            .await
    }

    /// Deletes `calendar` together with all of its events.
    pub async fn remove_calendar(&self, calendar: &CalendarRef) -> Result<()> {
        self.remove_calendar_with(calendar, self.config.commit_writes)
            .await
    }

    pub(crate) async fn create_or_get_with(
        &self,
        name: &str,
        source_hint: Option<SourceKind>,
        commit: bool,
    ) -> Result<CalendarRef> {
        self.ready().await?;
        validate_calendar_name(name)?;

        if let Some(existing) = self.lookup(name).await? {
            tracing::trace!(
                calendar_id = %existing.id,
                calendar_name = name,
                "Calendar already exists"
            );
            return Ok(existing);
        }

        let wanted = source_hint.unwrap_or(self.config.preferred_source);
        let sources = self
            .provider
            .sources()
            .await
            .map_err(translate::lookup_error)?;
        let default = self
            .provider
            .default_source()
            .await
            .map_err(translate::lookup_error)?;

        let source = select_source(&sources, wanted, default.as_ref())
            .ok_or(CalendarError::SourceUnavailable { wanted })?;

        let calendar = self
            .provider
            .save_calendar(&NewCalendar::new(name, source.clone()), commit)
            .await
            .map_err(|err| translate::calendar_save_error(err, source))?;

        tracing::debug!(
            calendar_id = %calendar.id,
            calendar_name = name,
            source = %source.title,
            commit,
            "Created calendar"
        );
        self.publish(StoreChange::CalendarCreated {
            calendar: calendar.clone(),
        });
        Ok(calendar)
    }

    pub(crate) async fn remove_calendar_with(
        &self,
        calendar: &CalendarRef,
        commit: bool,
    ) -> Result<()> {
        self.ready().await?;

        self.provider
            .delete_calendar(&calendar.id, commit)
            .await
            .map_err(|err| translate::calendar_delete_error(err, &calendar.title))?;

        tracing::debug!(
            calendar_id = %calendar.id,
            calendar_name = %calendar.title,
            commit,
            "Removed calendar"
        );
        self.publish(StoreChange::CalendarRemoved {
            calendar_id: calendar.id.clone(),
        });
        Ok(())
    }

    async fn lookup(&self, name: &str) -> Result<Option<CalendarRef>> {
        let calendars = self
            .provider
            .calendars()
            .await
            .map_err(translate::lookup_error)?;
        Ok(find_calendar_by_name(&calendars, name).cloned())
    }
}
