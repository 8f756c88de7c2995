//! Error type for `cohort-engine`.
//!
//! Domain failures (state-machine guards, ownership checks, validation) stay
//! typed; backend failures are boxed, since the services are generic over
//! the store implementation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Domain(#[from] cohort_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
