use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{DateRangeError, ProviderError};
use crate::calendar::CalendarId;

/// A range of instants with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates the range `[now - window, now + window]`.
    ///
    /// A negative window is treated as its absolute value. Bounds that fall
    /// outside the representable instants saturate at the earliest or latest
    /// one.
    pub fn around(now: DateTime<Utc>, window: Duration) -> Self {
        let window = window.abs();
        Self {
            start: now
                .checked_sub_signed(window)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: now
                .checked_add_signed(window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Length of the range.
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// Returns true if an event running from `start` to `end` overlaps this range.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start <= self.end && end >= self.start
    }
}

/// A validated date-range + calendar-set filter, built by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPredicate {
    pub range: DateRange,
    pub calendars: Vec<CalendarId>,
}

impl EventPredicate {
    pub fn new(range: DateRange, calendars: Vec<CalendarId>) -> Self {
        Self { range, calendars }
    }

    /// Returns true if an event in `calendar_id` spanning `start..=end` matches.
    pub fn matches(
        &self,
        calendar_id: &CalendarId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        self.calendars.contains(calendar_id) && self.range.overlaps(start, end)
    }
}

/// Rejects ranges longer than a provider's maximum predicate span.
///
/// Providers refuse such ranges outright rather than truncating them.
pub fn check_predicate_span(range: &DateRange, max_span: Duration) -> Result<(), ProviderError> {
    if range.span() > max_span {
        return Err(ProviderError::PredicateRejected(format!(
            "range spans {} days, maximum is {} days",
            range.span().num_days(),
            max_span.num_days()
        )));
    }
    Ok(())
}
