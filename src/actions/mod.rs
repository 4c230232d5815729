//! Mutating operations and completion polling.
//!
//! - [`ActionRequest`] / [`ActionExecutor`]: validate, send and classify a mutation
//! - [`CompletionPoller`]: wait until a droplet has no action in progress

mod executor;
mod poller;

pub use executor::{ActionExecutor, ActionRequest};
pub use poller::{CompletionPoller, PollOutcome};
