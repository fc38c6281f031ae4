//! Calendar provider adapters.
//!
//! Each adapter implements [`calsync_core::provider::CalendarProvider`] for one
//! backend. Platform adapters wrap the host calendar service; the in-memory
//! adapter backs tests and the demo binary.

pub mod inmemory;

pub use inmemory::InMemoryProvider;
