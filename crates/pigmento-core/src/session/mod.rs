//! Session and onboarding state.
//!
//! [`SessionContext`] is constructed once at application start and handed to
//! every consumer. It composes two persistent cells, the session token and
//! the onboarding flag, and derives the [`Gate`] route guards read.

mod context;
mod gate;

pub use context::{SessionContext, SessionSnapshot, SessionWatcher};
pub use gate::Gate;
