//! Request lifecycle state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions: the
//! session feeds events in and executes the effects that come out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ExchangeState, PendingExchange, SessionContext};
pub use transition::{transition, TransitionError, TransitionResult};
