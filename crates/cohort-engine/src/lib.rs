//! Workflow services for the Cohort engagement engine.
//!
//! Each module owns one slice of the engagement lifecycle and talks only to
//! the abstract ports in `cohort-core`: the store, the notifier, and the
//! clock. State-machine guards run synchronously between awaited port calls;
//! outbound notifications are always best-effort and never roll back a
//! state change.

pub mod badges;
pub mod connections;
pub mod dispatch;
pub mod error;
pub mod invitations;
pub mod scheduler;

pub use error::{Error, Result};

#[cfg(test)]
pub(crate) mod testutil;
