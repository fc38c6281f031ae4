//! Pure functions translating [`ProviderError`]s into the facade taxonomy.
//!
//! One function per provider boundary crossing, so the same raw error can
//! mean different things depending on the operation (a missing calendar is
//! `NoCalendar` for a query but `NotFound` for a deletion).

use super::ProviderError;
use crate::auth::AuthError;
use crate::calendar::{CalendarError, EventError, EventId, Source};
use crate::error::FacadeError;

fn access_denied() -> FacadeError {
    AuthError::denied("The provider refused access to calendar data").into()
}

/// Errors from enumerating calendars or sources.
pub fn lookup_error(error: ProviderError) -> FacadeError {
    match error {
        ProviderError::AccessDenied => access_denied(),
        other => CalendarError::Unknown(other.to_string()).into(),
    }
}

/// Errors from saving a new calendar into `source`.
pub fn calendar_save_error(error: ProviderError, source: &Source) -> FacadeError {
    match error {
        ProviderError::AccessDenied => access_denied(),
        ProviderError::SourceReadOnly(_) => CalendarError::PermissionDenied {
            source_title: source.title.clone(),
        }
        .into(),
        other => CalendarError::Unknown(other.to_string()).into(),
    }
}

/// Errors from deleting the calendar titled `calendar`.
pub fn calendar_delete_error(error: ProviderError, calendar: &str) -> FacadeError {
    match error {
        ProviderError::AccessDenied => access_denied(),
        ProviderError::NotFound { .. } => CalendarError::NotFound(calendar.to_string()).into(),
        other => CalendarError::DeleteFailed {
            calendar: calendar.to_string(),
            reason: other.to_string(),
        }
        .into(),
    }
}

/// Errors from saving an event.
pub fn event_save_error(error: ProviderError) -> FacadeError {
    match error {
        ProviderError::AccessDenied => access_denied(),
        ProviderError::MissingCalendar => EventError::NoCalendar.into(),
        ProviderError::NotFound {
            entity_type: "Calendar",
            ..
        } => EventError::NoCalendar.into(),
        other => EventError::SaveFailed(other.to_string()).into(),
    }
}

/// Errors from removing or looking up the event `id`.
pub fn event_remove_error(error: ProviderError, id: &EventId) -> FacadeError {
    match error {
        ProviderError::AccessDenied => access_denied(),
        ProviderError::NotFound { .. } => EventError::NotFound(id.to_string()).into(),
        other => EventError::RemoveFailed {
            event_id: id.to_string(),
            reason: other.to_string(),
        }
        .into(),
    }
}

/// Errors from building a predicate or fetching matching events.
pub fn query_error(error: ProviderError) -> FacadeError {
    match error {
        ProviderError::AccessDenied => access_denied(),
        ProviderError::PredicateRejected(reason) => EventError::InvalidRange {
            reason: format!("Error generating predicate: {reason}"),
        }
        .into(),
        ProviderError::NotFound {
            entity_type: "Calendar",
            ..
        } => EventError::NoCalendar.into(),
        other => EventError::QueryFailed(other.to_string()).into(),
    }
}

/// Errors from committing the pending change set.
pub fn commit_error(error: ProviderError) -> FacadeError {
    match error {
        ProviderError::AccessDenied => access_denied(),
        other => FacadeError::Commit(other.to_string()),
    }
}

/// Errors from discarding the pending change set.
pub fn reset_error(error: ProviderError) -> FacadeError {
    FacadeError::Reset(error.to_string())
}
