//! Core types and trait definitions for the Cohort engagement engine.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod activity;
pub mod clock;
pub mod connection;
pub mod error;
pub mod invitation;
pub mod matching;
pub mod notification;
pub mod notify;
pub mod person;
pub mod store;

pub use error::{Error, Result};
