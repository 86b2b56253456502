//! Host resource checkers
//!
//! Memory and CPU alert when usage rises above their thresholds; storage
//! alerts when free space on the root volume falls below its threshold.
//! Samples come from `sysinfo`; an unmeasurable resource is logged and
//! skipped, never alerted on.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{Disks, System};

use super::{breaches_above, breaches_below, SignalChecker};
use crate::alerts::AlertEvent;

/// Alert channel for the memory checker.
pub const RAM_CHANNEL: &str = "ram";
/// Alert channel for the CPU checker.
pub const CPU_CHANNEL: &str = "cpu";
/// Alert channel for the storage checker.
pub const STORAGE_CHANNEL: &str = "storage";

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

fn gb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_GB
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// One memory reading; the figures feed the alert body.
#[derive(Debug, Clone, Copy)]
pub struct MemorySample {
    pub total: u64,
    pub used: u64,
    pub available: u64,
}

impl MemorySample {
    /// Percent of total memory in use.
    pub fn percent_used(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64 * 100.0
        }
    }
}

/// Alerts when memory usage rises above a percentage threshold.
pub struct MemoryChecker {
    system: System,
    threshold_percent: f64,
    interval: Duration,
}

impl MemoryChecker {
    pub fn new(threshold_percent: f64, interval: Duration) -> Self {
        Self {
            system: System::new(),
            threshold_percent,
            interval,
        }
    }

    fn sample(&mut self) -> MemorySample {
        self.system.refresh_memory();
        MemorySample {
            total: self.system.total_memory(),
            used: self.system.used_memory(),
            available: self.system.available_memory(),
        }
    }

    fn evaluate(&self, sample: &MemorySample) -> Option<AlertEvent> {
        let percent = sample.percent_used();
        if !breaches_above(percent, self.threshold_percent) {
            return None;
        }
        Some(AlertEvent::new(
            RAM_CHANNEL,
            format!("Alert: memory usage at {percent:.1}%"),
            format!(
                "Memory usage is {:.1}% (threshold {}%).\n\
                 Total: {:.2} GB\nUsed: {:.2} GB\nAvailable: {:.2} GB",
                percent,
                self.threshold_percent,
                gb(sample.total),
                gb(sample.used),
                gb(sample.available),
            ),
        ))
    }
}

#[async_trait]
impl SignalChecker for MemoryChecker {
    fn name(&self) -> &str {
        RAM_CHANNEL
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn sample_and_evaluate(&mut self) -> Option<AlertEvent> {
        let sample = self.sample();
        tracing::debug!(percent = sample.percent_used(), "Memory sampled");
        self.evaluate(&sample)
    }
}

// ---------------------------------------------------------------------------
// CPU
// ---------------------------------------------------------------------------

/// Alerts when global CPU usage rises above a percentage threshold.
pub struct CpuChecker {
    system: System,
    threshold_percent: f64,
    interval: Duration,
}

impl CpuChecker {
    pub fn new(threshold_percent: f64, interval: Duration) -> Self {
        Self {
            system: System::new(),
            threshold_percent,
            interval,
        }
    }

    /// CPU usage needs two refreshes separated by the sysinfo minimum
    /// sampling window; the first tick after startup measures against the
    /// previous refresh of the same `System`.
    async fn sample(&mut self) -> f64 {
        self.system.refresh_cpu();
        tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
        self.system.refresh_cpu();
        f64::from(self.system.global_cpu_info().cpu_usage())
    }

    fn evaluate(&self, percent: f64) -> Option<AlertEvent> {
        if !breaches_above(percent, self.threshold_percent) {
            return None;
        }
        Some(AlertEvent::new(
            CPU_CHANNEL,
            format!("Alert: CPU usage at {percent:.1}%"),
            format!(
                "CPU usage is {:.1}% (threshold {}%).",
                percent, self.threshold_percent
            ),
        ))
    }
}

#[async_trait]
impl SignalChecker for CpuChecker {
    fn name(&self) -> &str {
        CPU_CHANNEL
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn sample_and_evaluate(&mut self) -> Option<AlertEvent> {
        let percent = self.sample().await;
        tracing::debug!(percent, "CPU sampled");
        self.evaluate(percent)
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// One reading of the root volume.
#[derive(Debug, Clone, Copy)]
pub struct DiskSample {
    pub total: u64,
    pub available: u64,
}

impl DiskSample {
    pub fn free_gb(&self) -> f64 {
        gb(self.available)
    }
}

/// Alerts when free space on the root volume falls below a GB threshold.
pub struct StorageChecker {
    threshold_gb: f64,
    interval: Duration,
}

impl StorageChecker {
    pub fn new(threshold_gb: f64, interval: Duration) -> Self {
        Self {
            threshold_gb,
            interval,
        }
    }

    /// Reads the root volume, falling back to the first listed disk when no
    /// mount point is exactly `/` (e.g. some containers).
    fn sample(&self) -> Option<DiskSample> {
        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"))
            .or_else(|| disks.list().first())?;

        Some(DiskSample {
            total: disk.total_space(),
            available: disk.available_space(),
        })
    }

    fn evaluate(&self, sample: &DiskSample) -> Option<AlertEvent> {
        let free = sample.free_gb();
        if !breaches_below(free, self.threshold_gb) {
            return None;
        }
        Some(AlertEvent::new(
            STORAGE_CHANNEL,
            format!("Alert: low disk space ({free:.1} GB free)"),
            format!(
                "Free space on the root volume is {:.2} GB (threshold {} GB).\n\
                 Total: {:.2} GB\nUsed: {:.2} GB",
                free,
                self.threshold_gb,
                gb(sample.total),
                gb(sample.total.saturating_sub(sample.available)),
            ),
        ))
    }
}

#[async_trait]
impl SignalChecker for StorageChecker {
    fn name(&self) -> &str {
        STORAGE_CHANNEL
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn sample_and_evaluate(&mut self) -> Option<AlertEvent> {
        let Some(sample) = self.sample() else {
            tracing::error!("No disks visible, skipping storage check");
            return None;
        };
        tracing::debug!(free_gb = sample.free_gb(), "Storage sampled");
        self.evaluate(&sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1024 * 1024 * 1024;

    #[test]
    fn test_memory_breach_body_carries_sampled_figures() {
        let checker = MemoryChecker::new(70.0, Duration::from_secs(300));
        let sample = MemorySample {
            total: 16 * GIB,
            used: 12 * GIB,
            available: 4 * GIB,
        };

        let event = checker.evaluate(&sample).unwrap();
        assert_eq!(event.channel_id, RAM_CHANNEL);
        assert!(event.subject.contains("75.0%"));
        assert!(event.body.contains("Total: 16.00 GB"));
        assert!(event.body.contains("Used: 12.00 GB"));
        assert!(event.body.contains("Available: 4.00 GB"));
    }

    #[test]
    fn test_memory_at_threshold_does_not_breach() {
        let checker = MemoryChecker::new(70.0, Duration::from_secs(300));
        let sample = MemorySample {
            total: 100,
            used: 70,
            available: 30,
        };
        assert!(checker.evaluate(&sample).is_none());
    }

    #[test]
    fn test_memory_percent_of_empty_total_is_zero() {
        let sample = MemorySample {
            total: 0,
            used: 0,
            available: 0,
        };
        assert_eq!(sample.percent_used(), 0.0);
    }

    #[test]
    fn test_cpu_threshold_is_strict() {
        let checker = CpuChecker::new(80.0, Duration::from_secs(300));
        assert!(checker.evaluate(80.0).is_none());
        assert!(checker.evaluate(81.0).is_some());
    }

    #[test]
    fn test_cpu_breach_names_the_reading() {
        let checker = CpuChecker::new(80.0, Duration::from_secs(300));
        let event = checker.evaluate(93.5).unwrap();
        assert_eq!(event.channel_id, CPU_CHANNEL);
        assert!(event.subject.contains("93.5%"));
        assert!(event.body.contains("threshold 80%"));
    }

    #[test]
    fn test_storage_at_threshold_does_not_breach() {
        let checker = StorageChecker::new(80.0, Duration::from_secs(900));
        let sample = DiskSample {
            total: 500 * GIB,
            available: 80 * GIB,
        };
        assert!(checker.evaluate(&sample).is_none());
    }

    #[test]
    fn test_storage_below_threshold_breaches() {
        let checker = StorageChecker::new(80.0, Duration::from_secs(900));
        let sample = DiskSample {
            total: 500 * GIB,
            available: (79.9 * BYTES_PER_GB) as u64,
        };

        let event = checker.evaluate(&sample).unwrap();
        assert_eq!(event.channel_id, STORAGE_CHANNEL);
        assert!(event.body.contains("threshold 80 GB"));
        assert!(event.body.contains("Total: 500.00 GB"));
    }

    #[tokio::test]
    async fn test_live_memory_sample_is_plausible() {
        let mut checker = MemoryChecker::new(100.0, Duration::from_secs(300));
        let sample = checker.sample();
        assert!(sample.total > 0);
        assert!(sample.used <= sample.total);
        // Threshold 100% means a live sample can never breach.
        assert!(checker.evaluate(&sample).is_none());
    }
}
