//! The clock port — all age calculations go through this so scheduler tests
//! can run against a pinned or hand-advanced "now".

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// The production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> { Utc::now() }
}

/// A pinned clock for tests; advance it explicitly to simulate elapsed time.
#[derive(Debug)]
pub struct FixedClock {
  now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
  pub fn at(now: DateTime<Utc>) -> Self { Self { now: Mutex::new(now) } }

  pub fn advance(&self, by: Duration) {
    let mut now = self.now.lock().expect("clock lock");
    *now += by;
  }

  pub fn set(&self, to: DateTime<Utc>) {
    *self.now.lock().expect("clock lock") = to;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> { *self.now.lock().expect("clock lock") }
}
