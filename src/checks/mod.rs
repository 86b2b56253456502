//! Signal checkers
//!
//! One checker per monitored signal: daily data presence per device, and
//! host memory, CPU and storage levels. Each checker performs exactly one
//! measurement per tick and reports a breach as an [`AlertEvent`]; the
//! scheduler owns the loop and the dispatch.

use std::time::Duration;

use async_trait::async_trait;

use crate::alerts::AlertEvent;

pub mod data_presence;
pub mod resources;

pub use data_presence::DataPresenceChecker;
pub use resources::{CpuChecker, MemoryChecker, StorageChecker};

/// One monitored signal.
///
/// `sample_and_evaluate` takes one measurement and applies the breach
/// predicate for its kind. Measurement failures are logged inside the
/// checker and never escape; the next tick simply retries.
#[async_trait]
pub trait SignalChecker: Send {
    /// Name used in log lines (the channel id).
    fn name(&self) -> &str;

    /// Pacing of this checker's loop.
    fn interval(&self) -> Duration;

    /// Take one sample; `Some` on breach.
    async fn sample_and_evaluate(&mut self) -> Option<AlertEvent>;
}

/// Strict "alert if above" predicate. A reading exactly at the threshold
/// does not breach.
pub fn breaches_above(sampled: f64, threshold: f64) -> bool {
    sampled > threshold
}

/// Strict "alert if below" predicate. A reading exactly at the threshold
/// does not breach.
pub fn breaches_below(sampled: f64, threshold: f64) -> bool {
    sampled < threshold
}
