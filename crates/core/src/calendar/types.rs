use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Provider-assigned calendar identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarId(String);

impl CalendarId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CalendarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Provider-assigned event identifier.
///
/// Only valid until a mutation that changes the owning calendar: providers
/// may issue a new identifier when an event moves. Do not persist it as a
/// long-term key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of account a calendar source belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Local,
    /// Cloud-synced account (iCloud and other CalDAV servers).
    #[default]
    CalDav,
    Exchange,
    Subscribed,
    Birthdays,
    MobileMe,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::CalDav => write!(f, "caldav"),
            Self::Exchange => write!(f, "exchange"),
            Self::Subscribed => write!(f, "subscribed"),
            Self::Birthdays => write!(f, "birthdays"),
            Self::MobileMe => write!(f, "mobileme"),
        }
    }
}

impl FromStr for SourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "caldav" | "icloud" => Ok(Self::CalDav),
            "exchange" => Ok(Self::Exchange),
            "subscribed" => Ok(Self::Subscribed),
            "birthdays" => Ok(Self::Birthdays),
            "mobileme" => Ok(Self::MobileMe),
            other => Err(ConfigError::UnknownSourceKind(other.to_string())),
        }
    }
}

/// An account calendars belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub title: String,
    pub kind: SourceKind,
    /// Whether calendars may be created in or deleted from this source.
    pub allows_calendar_changes: bool,
}

impl Source {
    /// Creates a writable source.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            allows_calendar_changes: true,
        }
    }

    /// Marks this source as forbidding calendar creation and deletion.
    pub fn read_only(mut self) -> Self {
        self.allows_calendar_changes = false;
        self
    }
}

/// Handle to a calendar owned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRef {
    pub id: CalendarId,
    pub title: String,
    pub source: Source,
    /// Whether events in this calendar can be modified.
    pub writable: bool,
}

/// A calendar that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCalendar {
    pub title: String,
    pub source: Source,
}

impl NewCalendar {
    pub fn new(title: impl Into<String>, source: Source) -> Self {
        Self {
            title: title.into(),
            source,
        }
    }
}

/// How an event affects the owner's free/busy status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    NotSupported,
    Busy,
    Free,
    Tentative,
    Unavailable,
}

/// Scope of a save or deletion on a recurring event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    /// Only this occurrence.
    #[default]
    ThisEvent,
    /// This occurrence and all future ones.
    FutureEvents,
}

/// An event record, either a draft or one saved by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Assigned by the provider on save. See [`EventId`] for its lifetime.
    pub id: Option<EventId>,
    /// The calendar this event belongs to. Required before insertion.
    pub calendar_id: Option<CalendarId>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub notes: Option<String>,
    pub location: Option<String>,
    pub availability: Availability,
}

impl EventRecord {
    /// Creates an untitled draft attached to a calendar, starting and ending at `at`.
    pub fn draft(calendar_id: CalendarId, at: DateTime<Utc>) -> Self {
        Self::new(calendar_id, "", at, at)
    }

    /// Creates an unsaved event attached to a calendar.
    pub fn new(
        calendar_id: CalendarId,
        title: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            calendar_id: Some(calendar_id),
            title: title.into(),
            start,
            end,
            all_day: false,
            notes: None,
            location: None,
            availability: Availability::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_times(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Sets a specific ID for this event (useful for testing).
    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns true once the provider has assigned an identifier.
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }

    /// Compares the user-visible content of two events, ignoring identity.
    pub fn same_content(&self, other: &EventRecord) -> bool {
        self.title == other.title
            && self.start == other.start
            && self.end == other.end
            && self.all_day == other.all_day
            && self.notes == other.notes
            && self.location == other.location
    }
}

/// Outcome of clearing every event from a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearReport {
    /// Events the provider confirmed as removed.
    pub removed: Vec<EventId>,
    /// Events whose removal failed and that are still present.
    pub failed: Vec<EventId>,
    /// Set when the calendar was recreated instead of swept.
    pub recreated: Option<CalendarRef>,
}

impl ClearReport {
    /// Returns true if no removal failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A change applied to the store, published so a UI layer can refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreChange {
    CalendarCreated {
        calendar: CalendarRef,
    },
    CalendarRemoved {
        calendar_id: CalendarId,
    },
    EventSaved {
        event: EventRecord,
    },
    EventRemoved {
        event_id: EventId,
        calendar_id: Option<CalendarId>,
    },
    Cleared {
        calendar_id: CalendarId,
        removed: usize,
        failed: usize,
    },
    Committed,
    Reset,
}

impl StoreChange {
    /// The calendar affected by this change, if it concerns a single one.
    pub fn calendar_id(&self) -> Option<&CalendarId> {
        match self {
            StoreChange::CalendarCreated { calendar } => Some(&calendar.id),
            StoreChange::CalendarRemoved { calendar_id } => Some(calendar_id),
            StoreChange::EventSaved { event } => event.calendar_id.as_ref(),
            StoreChange::EventRemoved { calendar_id, .. } => calendar_id.as_ref(),
            StoreChange::Cleared { calendar_id, .. } => Some(calendar_id),
            StoreChange::Committed | StoreChange::Reset => None,
        }
    }

    /// Serializes this change as a JSON payload.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_event_builder() {
        let event = EventRecord::new(CalendarId::new("cal-1"), "Standup", at(9, 0), at(9, 30))
            .with_notes("Daily sync")
            .with_location("Room 4")
            .with_availability(Availability::Free);

        assert_eq!(event.calendar_id, Some(CalendarId::new("cal-1")));
        assert_eq!(event.title, "Standup");
        assert_eq!(event.notes, Some("Daily sync".to_string()));
        assert_eq!(event.location, Some("Room 4".to_string()));
        assert_eq!(event.availability, Availability::Free);
        assert!(!event.all_day);
        assert!(!event.is_saved());
    }

    #[test]
    fn test_draft_is_untitled_and_attached() {
        let draft = EventRecord::draft(CalendarId::new("cal-1"), at(8, 0));

        assert!(draft.title.is_empty());
        assert_eq!(draft.start, draft.end);
        assert_eq!(draft.calendar_id, Some(CalendarId::new("cal-1")));
    }

    #[test]
    fn test_same_content_ignores_identity() {
        let a = EventRecord::new(CalendarId::new("cal-1"), "Standup", at(9, 0), at(9, 30));
        let b = a
            .clone()
            .with_id(EventId::new("evt-1"))
            .with_availability(Availability::Busy);

        assert!(a.same_content(&b));
        assert!(!a.same_content(&b.with_location("Elsewhere")));
    }

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("CalDAV".parse::<SourceKind>().unwrap(), SourceKind::CalDav);
        assert_eq!("icloud".parse::<SourceKind>().unwrap(), SourceKind::CalDav);
        assert_eq!(" local ".parse::<SourceKind>().unwrap(), SourceKind::Local);
        assert!(matches!(
            "gmail".parse::<SourceKind>(),
            Err(ConfigError::UnknownSourceKind(_))
        ));
    }

    #[test]
    fn test_source_kind_display_parses_back() {
        for kind in [
            SourceKind::Local,
            SourceKind::CalDav,
            SourceKind::Exchange,
            SourceKind::Subscribed,
            SourceKind::Birthdays,
            SourceKind::MobileMe,
        ] {
            assert_eq!(kind.to_string().parse::<SourceKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_store_change_json_is_tagged() {
        let change = StoreChange::CalendarRemoved {
            calendar_id: CalendarId::new("cal-1"),
        };
        let json = change.to_json().unwrap();

        assert_eq!(json, r#"{"type":"calendar_removed","calendar_id":"cal-1"}"#);
        assert_eq!(change.calendar_id(), Some(&CalendarId::new("cal-1")));
        assert_eq!(StoreChange::Committed.calendar_id(), None);
    }

    #[test]
    fn test_clear_report_completeness() {
        let mut report = ClearReport::default();
        assert!(report.is_complete());

        report.failed.push(EventId::new("evt-2"));
        assert!(!report.is_complete());
    }
}
