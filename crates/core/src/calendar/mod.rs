mod error;
mod operations;
mod types;

pub use error::{CalendarError, EventError};
pub use operations::{
    find_calendar_by_id, find_calendar_by_name, select_source, sort_events,
    validate_calendar_name, validate_event,
};
pub use types::{
    Availability, CalendarId, CalendarRef, ClearReport, EventId, EventRecord, NewCalendar, Source,
    SourceKind, Span, StoreChange,
};
