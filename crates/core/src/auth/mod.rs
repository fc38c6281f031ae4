mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{gate_decision, prompt_outcome, GateDecision};
pub use types::{AuthorizationState, StoreState};
