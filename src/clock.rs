//! Monotonic timing probe.
//!
//! Durations are always measured against a monotonic source so system time
//! adjustments never leak into reported numbers.

use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Instant;

/// A strictly monotonic nanosecond clock.
pub trait Clock {
  fn now_nanos(&self) -> u64;
}

/// Clock backed by [`Instant`], counting from the moment it was created.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
  origin: Instant,
}

impl MonotonicClock {
  pub fn new() -> Self {
    Self {
      origin: Instant::now(),
    }
  }
}

impl Default for MonotonicClock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock for MonotonicClock {
  fn now_nanos(&self) -> u64 {
    u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
  }
}

/// Clock that replays a fixed script of readings.
///
/// Once the script runs out the last reading repeats, so a short script never
/// makes time go backwards.
#[derive(Debug, Default)]
pub struct ScriptedClock {
  readings: RefCell<VecDeque<u64>>,
  last: Cell<u64>,
}

impl ScriptedClock {
  pub fn new(readings: impl IntoIterator<Item = u64>) -> Self {
    Self {
      readings: RefCell::new(readings.into_iter().collect()),
      last: Cell::new(0),
    }
  }

  /// Number of readings not consumed yet.
  pub fn remaining(&self) -> usize {
    self.readings.borrow().len()
  }
}

impl Clock for ScriptedClock {
  fn now_nanos(&self) -> u64 {
    if let Some(next) = self.readings.borrow_mut().pop_front() {
      self.last.set(next);
    }
    self.last.get()
  }
}

/// One labelled measurement: total elapsed time over a number of iterations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingSample {
  pub label: String,
  pub total_nanos: u64,
  pub iterations: u32,
}

impl TimingSample {
  /// Builds a sample from two clock readings. An `end` before `start` counts as zero.
  pub fn between(label: impl Into<String>, start: u64, end: u64, iterations: u32) -> Self {
    Self {
      label: label.into(),
      total_nanos: end.saturating_sub(start),
      iterations: iterations.max(1),
    }
  }

  pub fn mean_nanos(&self) -> f64 {
    self.total_nanos as f64 / f64::from(self.iterations)
  }

  pub fn mean_ms(&self) -> f64 {
    self.mean_nanos() / 1_000_000.0
  }

  /// `<label> in <mean_ms> ms per iteration`
  pub fn display_line(&self) -> String {
    format!("{} in {:.2} ms per iteration", self.label, self.mean_ms())
  }
}

pub fn format_timing(label: &str, start: u64, end: u64, iterations: u32) -> String {
  TimingSample::between(label, start, end, iterations).display_line()
}
