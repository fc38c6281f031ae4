use super::error::{CalendarError, EventError};
use super::types::{CalendarId, CalendarRef, EventRecord, Source, SourceKind};

/// Maximum calendar title length accepted by the facade.
const MAX_CALENDAR_NAME_LEN: usize = 255;

/// Finds a calendar by exact title.
///
/// When several calendars share the title, the first one in provider
/// enumeration order wins. That order is not stable across providers.
pub fn find_calendar_by_name<'a>(
    calendars: &'a [CalendarRef],
    name: &str,
) -> Option<&'a CalendarRef> {
    calendars.iter().find(|calendar| calendar.title == name)
}

/// Finds a calendar by provider identifier.
pub fn find_calendar_by_id<'a>(
    calendars: &'a [CalendarRef],
    id: &CalendarId,
) -> Option<&'a CalendarRef> {
    calendars.iter().find(|calendar| &calendar.id == id)
}

/// Picks the source a new calendar should be created in.
///
/// Preference order:
/// 1. the first source of the wanted kind that allows calendar changes
/// 2. the provider's default source, if it allows calendar changes
/// 3. the first source of the wanted kind, even if read-only (the provider
///    will then refuse the save, which surfaces as a permission error)
pub fn select_source<'a>(
    sources: &'a [Source],
    wanted: SourceKind,
    default: Option<&'a Source>,
) -> Option<&'a Source> {
    sources
        .iter()
        .find(|s| s.kind == wanted && s.allows_calendar_changes)
        .or_else(|| default.filter(|s| s.allows_calendar_changes))
        .or_else(|| sources.iter().find(|s| s.kind == wanted))
}

/// Validates a calendar title before creation.
pub fn validate_calendar_name(name: &str) -> Result<(), CalendarError> {
    if name.trim().is_empty() {
        return Err(CalendarError::InvalidName(
            "Calendar name cannot be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_CALENDAR_NAME_LEN {
        return Err(CalendarError::InvalidName(format!(
            "Calendar name too long (max {MAX_CALENDAR_NAME_LEN} characters)"
        )));
    }
    Ok(())
}

/// Validates an event before it is handed to the provider.
pub fn validate_event(event: &EventRecord) -> Result<(), EventError> {
    if event.calendar_id.is_none() {
        return Err(EventError::NoCalendar);
    }
    if event.end < event.start {
        return Err(EventError::SaveFailed(
            "End date must be after or equal to start date".to_string(),
        ));
    }
    Ok(())
}

/// Orders events by start, then end, then title.
pub fn sort_events(events: &mut [EventRecord]) {
    events.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.end.cmp(&b.end))
            .then_with(|| a.title.cmp(&b.title))
    });
}
