//! Calendar sync facade.
//!
//! [`CalendarSyncFacade`] gates every call on calendar authorization, resolves
//! (or creates) a named calendar and runs event operations against it through
//! a [`calsync_core::provider::CalendarProvider`]. Completions can be marshalled
//! onto a single delivery context with [`delivery`].

pub mod config;
pub mod delivery;
pub mod facade;
pub mod provider;

pub use config::Config;
pub use delivery::{delivery_channel, DeliveryContext, DeliveryError, DeliveryThread, Dispatcher};
pub use facade::{Batch, CalendarSyncFacade};
pub use provider::InMemoryProvider;
