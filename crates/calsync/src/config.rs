use std::env;

use calsync_core::calendar::SourceKind;
use calsync_core::config::DEFAULT_WINDOW_DAYS;
use calsync_core::{ClearPolicy, ConfigError, FacadeConfig, MissingEventPolicy};

const DEFAULT_CALENDAR_NAME: &str = "calsync";
const DEFAULT_DELIVERY_THREAD: &str = "calsync-delivery";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings handed to the facade.
    pub facade: FacadeConfig,
    /// Name of the thread completions are delivered on (default: "calsync-delivery")
    pub delivery_thread: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CALSYNC_CALENDAR_NAME` - Managed calendar title (default: "calsync")
    /// - `CALSYNC_SOURCE` - Source kind for new calendars (default: "caldav")
    /// - `CALSYNC_WINDOW_DAYS` - Query/clear window each way in days (default: 732)
    /// - `CALSYNC_CLEAR_POLICY` - best-effort, fail-fast or recreate (default: best-effort)
    /// - `CALSYNC_MISSING_EVENT` - ignore or report (default: ignore)
    /// - `CALSYNC_COMMIT_CLEAR` - Commit after clearing (default: false)
    /// - `CALSYNC_DELIVERY_THREAD` - Delivery thread name (default: "calsync-delivery")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let name =
            lookup("CALSYNC_CALENDAR_NAME").unwrap_or_else(|| DEFAULT_CALENDAR_NAME.to_string());
        let mut facade = FacadeConfig::new(name)?;

        if let Some(source) = lookup("CALSYNC_SOURCE") {
            facade.preferred_source = source.parse::<SourceKind>()?;
        }
        if let Some(policy) = lookup("CALSYNC_CLEAR_POLICY") {
            facade.clear_policy = policy.parse::<ClearPolicy>()?;
        }
        if let Some(policy) = lookup("CALSYNC_MISSING_EVENT") {
            facade.missing_event = policy.parse::<MissingEventPolicy>()?;
        }
        facade.window_days = lookup("CALSYNC_WINDOW_DAYS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_WINDOW_DAYS);
        facade.commit_clear = lookup("CALSYNC_COMMIT_CLEAR")
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);
        facade.validate()?;

        Ok(Self {
            facade,
            delivery_thread: lookup("CALSYNC_DELIVERY_THREAD")
                .unwrap_or_else(|| DEFAULT_DELIVERY_THREAD.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = load(&[]).unwrap();

        assert_eq!(config.facade.calendar_name, "calsync");
        assert_eq!(config.facade.preferred_source, SourceKind::CalDav);
        assert_eq!(config.facade.window_days, 732);
        assert_eq!(config.facade.clear_policy, ClearPolicy::BestEffort);
        assert_eq!(config.facade.missing_event, MissingEventPolicy::Ignore);
        assert!(!config.facade.commit_clear);
        assert_eq!(config.delivery_thread, "calsync-delivery");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("CALSYNC_CALENDAR_NAME", "Shifts"),
            ("CALSYNC_SOURCE", "local"),
            ("CALSYNC_WINDOW_DAYS", "30"),
            ("CALSYNC_CLEAR_POLICY", "recreate"),
            ("CALSYNC_MISSING_EVENT", "report"),
            ("CALSYNC_COMMIT_CLEAR", "true"),
        ])
        .unwrap();

        assert_eq!(config.facade.calendar_name, "Shifts");
        assert_eq!(config.facade.preferred_source, SourceKind::Local);
        assert_eq!(config.facade.window_days, 30);
        assert_eq!(config.facade.clear_policy, ClearPolicy::RecreateCalendar);
        assert_eq!(config.facade.missing_event, MissingEventPolicy::Report);
        assert!(config.facade.commit_clear);
    }

    #[test]
    fn test_unparseable_window_falls_back() {
        let config = load(&[("CALSYNC_WINDOW_DAYS", "lots")]).unwrap();
        assert_eq!(config.facade.window_days, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn test_oversized_window_is_reported() {
        assert_eq!(
            load(&[("CALSYNC_WINDOW_DAYS", "200000000")]).unwrap_err(),
            ConfigError::WindowTooLarge(200_000_000)
        );
    }

    #[test]
    fn test_invalid_values_are_reported() {
        assert!(matches!(
            load(&[("CALSYNC_SOURCE", "gmail")]),
            Err(ConfigError::UnknownSourceKind(_))
        ));
        assert!(matches!(
            load(&[("CALSYNC_CLEAR_POLICY", "never")]),
            Err(ConfigError::UnknownClearPolicy(_))
        ));
        assert_eq!(
            load(&[("CALSYNC_WINDOW_DAYS", "-5")]).unwrap_err(),
            ConfigError::InvalidWindow(-5)
        );
        assert_eq!(
            load(&[("CALSYNC_CALENDAR_NAME", "")]).unwrap_err(),
            ConfigError::EmptyCalendarName
        );
    }
}
