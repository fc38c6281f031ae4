use thiserror::Error;

/// Errors that can occur when constructing a date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid date range: start must be before or equal to end")]
    InvalidRange,
}

/// Errors reported by a calendar provider adapter.
///
/// These stay on the provider side of the boundary: the facade translates
/// them into its own taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Access to calendar data was denied")]
    AccessDenied,
    #[error("Source '{0}' does not allow calendar changes")]
    SourceReadOnly(String),
    #[error("Calendar '{0}' is read-only")]
    CalendarReadOnly(String),
    #[error("Event has no calendar")]
    MissingCalendar,
    #[error("Invalid event dates: {0}")]
    InvalidDates(String),
    #[error("Predicate rejected: {0}")]
    PredicateRejected(String),
    #[error("Operation rejected: {0}")]
    Rejected(String),
    #[error("Backend failure: {0}")]
    Backend(String),
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_error_display() {
        assert_eq!(
            DateRangeError::InvalidRange.to_string(),
            "Invalid date range: start must be before or equal to end"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = ProviderError::NotFound {
            entity_type: "Event",
            id: "evt-123".to_string(),
        };
        assert_eq!(error.to_string(), "Event not found: evt-123");
    }

    #[test]
    fn test_predicate_rejected_display() {
        let error = ProviderError::PredicateRejected("span exceeds 1461 days".to_string());
        assert_eq!(
            error.to_string(),
            "Predicate rejected: span exceeds 1461 days"
        );
    }
}
