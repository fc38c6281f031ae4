//! In-memory calendar provider for testing.
//!
//! This module provides an implementation of the provider contract that keeps
//! calendars and events in memory, with a working copy for staged changes and
//! a committed snapshot that `reset` restores. Failures can be injected per
//! event to exercise partial-failure handling.

mod provider;

pub use provider::InMemoryProvider;
