//! Domain models for the clinic tracker.

mod patient;
mod session;

pub use patient::*;
pub use session::*;
