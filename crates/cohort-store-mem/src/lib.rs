//! In-memory backend for the Cohort engagement store.
//!
//! The reference shape is a single in-process store: every call takes one
//! write (or read) lock, so each operation is applied atomically and
//! check-then-apply sequences in the service layer observe a consistent
//! aggregate. A production deployment would replace this crate with a
//! transactional backend implementing the same trait.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemStore;

#[cfg(test)]
mod tests;
