//! The capability contract a calendar backend must satisfy.
//!
//! Concrete adapters live outside this crate (see `calsync::provider`).
//! Errors reported by an adapter are [`ProviderError`]s; the facade translates
//! them with the pure functions in [`translate`] before they reach callers.

mod error;
mod traits;
pub mod translate;
mod types;

pub use error::{DateRangeError, ProviderError, Result};
pub use traits::CalendarProvider;
pub use types::{check_predicate_span, DateRange, EventPredicate};
