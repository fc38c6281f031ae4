//! Core types for the calendar sync facade.
//!
//! This crate holds everything that does not perform I/O:
//! - `auth`: authorization states and the gate decision
//! - `calendar`: calendar/event records and pure operations over them
//! - `provider`: the capability contract a calendar backend must satisfy
//! - `config`: facade configuration with documented defaults
//! - `error`: the error taxonomy surfaced to callers

pub mod auth;
pub mod calendar;
pub mod config;
pub mod error;
pub mod provider;

pub use config::{ClearPolicy, ConfigError, FacadeConfig, MissingEventPolicy};
pub use error::{FacadeError, Result, UserFacing};
