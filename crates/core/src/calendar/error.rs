use thiserror::Error;

use super::SourceKind;
use crate::error::UserFacing;

/// Errors that can occur when resolving, creating or removing a calendar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Calendar not found: {0}")]
    NotFound(String),

    #[error("No writable calendar source available (wanted {wanted})")]
    SourceUnavailable { wanted: SourceKind },

    #[error("Source '{source_title}' does not allow calendar changes")]
    PermissionDenied { source_title: String },

    #[error("Failed to delete calendar '{calendar}': {reason}")]
    DeleteFailed { calendar: String, reason: String },

    #[error("Invalid calendar name: {0}")]
    InvalidName(String),

    #[error("Calendar operation failed: {0}")]
    Unknown(String),
}

impl UserFacing for CalendarError {
    fn description(&self) -> &'static str {
        match self {
            CalendarError::NotFound(_) => "Calendar not found",
            CalendarError::SourceUnavailable { .. } => "No calendar account available",
            CalendarError::PermissionDenied { .. } => "Calendar account is read-only",
            CalendarError::DeleteFailed { .. } => "Could not delete calendar",
            CalendarError::InvalidName(_) => "Invalid calendar name",
            CalendarError::Unknown(_) => "Calendar error",
        }
    }

    fn failure_reason(&self) -> String {
        match self {
            CalendarError::NotFound(name) => format!("No calendar named '{name}'"),
            CalendarError::SourceUnavailable { wanted } => {
                format!("No writable {wanted} source and no default source")
            }
            CalendarError::PermissionDenied { source_title } => {
                format!("'{source_title}' forbids creating or deleting calendars")
            }
            CalendarError::DeleteFailed { reason, .. } => reason.clone(),
            CalendarError::InvalidName(reason) => reason.clone(),
            CalendarError::Unknown(reason) => reason.clone(),
        }
    }

    fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            CalendarError::NotFound(_) => Some("Add calendar before adding events"),
            CalendarError::SourceUnavailable { .. } => {
                Some("Enable iCloud or local calendars in the system settings")
            }
            CalendarError::PermissionDenied { .. } => {
                Some("Pick another calendar account that allows new calendars")
            }
            CalendarError::DeleteFailed { .. } => {
                Some("Delete the calendar manually in the Calendar app")
            }
            CalendarError::InvalidName(_) => Some("Use a non-empty calendar name"),
            CalendarError::Unknown(_) => None,
        }
    }
}

/// Errors that can occur when saving, removing or querying events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Failed to save event: {0}")]
    SaveFailed(String),

    #[error("Calendar not found")]
    NoCalendar,

    #[error("Invalid range: {reason}")]
    InvalidRange { reason: String },

    #[error("Event not found: {0}")]
    NotFound(String),

    #[error("Failed to remove event {event_id}: {reason}")]
    RemoveFailed { event_id: String, reason: String },

    #[error("Failed to fetch events: {0}")]
    QueryFailed(String),
}

impl UserFacing for EventError {
    fn description(&self) -> &'static str {
        match self {
            EventError::SaveFailed(_) => "Could not save event",
            EventError::NoCalendar => "Calendar not found",
            EventError::InvalidRange { .. } => "Invalid range",
            EventError::NotFound(_) => "Event not found",
            EventError::RemoveFailed { .. } => "Could not remove event",
            EventError::QueryFailed(_) => "Could not load events",
        }
    }

    fn failure_reason(&self) -> String {
        match self {
            EventError::SaveFailed(reason) => reason.clone(),
            EventError::NoCalendar => "Calendar not found".to_string(),
            EventError::InvalidRange { reason } => reason.clone(),
            EventError::NotFound(id) => format!("No event with identifier {id}"),
            EventError::RemoveFailed { reason, .. } => reason.clone(),
            EventError::QueryFailed(reason) => reason.clone(),
        }
    }

    fn recovery_hint(&self) -> Option<&'static str> {
        match self {
            EventError::SaveFailed(_) => {
                Some("Check the event dates and that the calendar is writable")
            }
            EventError::NoCalendar => Some("Add calendar before adding events"),
            EventError::InvalidRange { .. } => Some("Use a shorter range (e.g. 4 years)"),
            EventError::NotFound(_) => Some("Refresh the event list"),
            EventError::RemoveFailed { .. } => {
                Some("Remove the event manually in the Calendar app")
            }
            EventError::QueryFailed(_) => None,
        }
    }
}
