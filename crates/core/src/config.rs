//! Facade configuration with validation.

use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{SourceKind, Span};

/// Default query/clear window in each direction (two leap years).
pub const DEFAULT_WINDOW_DAYS: i64 = 2 * 366;

/// Largest accepted window in each direction (a century of leap years).
pub const MAX_WINDOW_DAYS: i64 = 100 * 366;

/// Errors that can occur when building a [`FacadeConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Calendar name cannot be empty")]
    EmptyCalendarName,

    #[error("Query window must be at least one day, got {0} days")]
    InvalidWindow(i64),

    #[error("Query window must be at most {max} days, got {0} days", max = MAX_WINDOW_DAYS)]
    WindowTooLarge(i64),

    #[error("Unknown source kind: {0}")]
    UnknownSourceKind(String),

    #[error("Unknown clear policy: {0} (expected best-effort, fail-fast or recreate)")]
    UnknownClearPolicy(String),

    #[error("Unknown missing-event policy: {0} (expected ignore or report)")]
    UnknownMissingEventPolicy(String),
}

/// How `clear_all` handles per-event failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClearPolicy {
    /// Keep sweeping; failed removals are reported, not raised.
    #[default]
    BestEffort,
    /// Stop at the first failed removal and return it.
    FailFast,
    /// Delete the calendar and create it again with the same name.
    RecreateCalendar,
}

impl FromStr for ClearPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "best-effort" | "best_effort" => Ok(Self::BestEffort),
            "fail-fast" | "fail_fast" => Ok(Self::FailFast),
            "recreate" | "recreate-calendar" => Ok(Self::RecreateCalendar),
            other => Err(ConfigError::UnknownClearPolicy(other.to_string())),
        }
    }
}

/// How removing an unknown event identifier is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingEventPolicy {
    /// Succeed without doing anything.
    #[default]
    Ignore,
    /// Fail with `EventError::NotFound`.
    Report,
}

impl FromStr for MissingEventPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "report" => Ok(Self::Report),
            other => Err(ConfigError::UnknownMissingEventPolicy(other.to_string())),
        }
    }
}

/// Settings passed to the facade at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacadeConfig {
    /// Display name of the calendar the facade manages.
    pub calendar_name: String,
    /// Source kind new calendars are created in (default: cloud-synced).
    pub preferred_source: SourceKind,
    /// Default query/clear window in each direction from now.
    pub window_days: i64,
    /// Whether single writes commit immediately (default: true).
    pub commit_writes: bool,
    /// Whether `clear_all` commits once the sweep ends (default: false).
    pub commit_clear: bool,
    /// Span used by `remove_event` (default: this occurrence only).
    pub removal_span: Span,
    pub clear_policy: ClearPolicy,
    pub missing_event: MissingEventPolicy,
}

impl FacadeConfig {
    /// Creates a validated config for `calendar_name` with every other field at its default.
    pub fn new(calendar_name: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            calendar_name: calendar_name.into(),
            preferred_source: SourceKind::default(),
            window_days: DEFAULT_WINDOW_DAYS,
            commit_writes: true,
            commit_clear: false,
            removal_span: Span::default(),
            clear_policy: ClearPolicy::default(),
            missing_event: MissingEventPolicy::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants that `new` enforces, for configs built field by field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.calendar_name.trim().is_empty() {
            return Err(ConfigError::EmptyCalendarName);
        }
        if self.window_days < 1 {
            return Err(ConfigError::InvalidWindow(self.window_days));
        }
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::WindowTooLarge(self.window_days));
        }
        Ok(())
    }

    /// The default window as a duration, clamped to `1..=MAX_WINDOW_DAYS` days
    /// for configs that skipped [`validate`](Self::validate).
    pub fn window(&self) -> Duration {
        Duration::days(self.window_days.clamp(1, MAX_WINDOW_DAYS))
    }

    pub fn with_preferred_source(mut self, kind: SourceKind) -> Self {
        self.preferred_source = kind;
        self
    }

    pub fn with_clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }

    pub fn with_missing_event(mut self, policy: MissingEventPolicy) -> Self {
        self.missing_event = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FacadeConfig::new("Work").unwrap();

        assert_eq!(config.calendar_name, "Work");
        assert_eq!(config.preferred_source, SourceKind::CalDav);
        assert_eq!(config.window(), Duration::days(732));
        assert!(config.commit_writes);
        assert!(!config.commit_clear);
        assert_eq!(config.removal_span, Span::ThisEvent);
        assert_eq!(config.clear_policy, ClearPolicy::BestEffort);
        assert_eq!(config.missing_event, MissingEventPolicy::Ignore);
    }

    #[test]
    fn test_empty_name_rejected() {
        assert_eq!(
            FacadeConfig::new("  "),
            Err(ConfigError::EmptyCalendarName)
        );
    }

    #[test]
    fn test_invalid_window_rejected() {
        let mut config = FacadeConfig::new("Work").unwrap();
        config.window_days = 0;

        assert_eq!(config.validate(), Err(ConfigError::InvalidWindow(0)));
    }

    #[test]
    fn test_oversized_window_rejected() {
        let mut config = FacadeConfig::new("Work").unwrap();
        config.window_days = MAX_WINDOW_DAYS;
        assert!(config.validate().is_ok());

        config.window_days = 200_000_000;
        assert_eq!(
            config.validate(),
            Err(ConfigError::WindowTooLarge(200_000_000))
        );
        assert_eq!(config.window(), Duration::days(MAX_WINDOW_DAYS));
    }

    #[test]
    fn test_builders() {
        let config = FacadeConfig::new("Work")
            .unwrap()
            .with_preferred_source(SourceKind::Local)
            .with_clear_policy(ClearPolicy::FailFast)
            .with_missing_event(MissingEventPolicy::Report);

        assert_eq!(config.preferred_source, SourceKind::Local);
        assert_eq!(config.clear_policy, ClearPolicy::FailFast);
        assert_eq!(config.missing_event, MissingEventPolicy::Report);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("best-effort".parse::<ClearPolicy>(), Ok(ClearPolicy::BestEffort));
        assert_eq!("FAIL_FAST".parse::<ClearPolicy>(), Ok(ClearPolicy::FailFast));
        assert_eq!("recreate".parse::<ClearPolicy>(), Ok(ClearPolicy::RecreateCalendar));
        assert!(matches!(
            "sometimes".parse::<ClearPolicy>(),
            Err(ConfigError::UnknownClearPolicy(_))
        ));

        assert_eq!("report".parse::<MissingEventPolicy>(), Ok(MissingEventPolicy::Report));
        assert!(matches!(
            "maybe".parse::<MissingEventPolicy>(),
            Err(ConfigError::UnknownMissingEventPolicy(_))
        ));
    }
}
