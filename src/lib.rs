//! Vigil: deduplicated email alerting for a sensor-data pipeline
//!
//! A long-running monitor that watches two families of signals: daily data
//! presence for a set of field devices behind an HTTP data service, and
//! local host resources (memory, CPU, storage free space). Each signal is
//! sampled by its own independent periodic task; breaches funnel through a
//! shared cooldown gate so a persistently bad signal sends at most one
//! email per half hour.
//!
//! # Features
//!
//! - **Independent check loops**: one task per signal, "sleep then run"
//!   pacing, no loop ever blocks a sibling
//! - **Per-channel cooldown**: atomic read-check-write on each channel's
//!   last-alert timestamp
//! - **Email delivery**: authenticated STARTTLS SMTP, fresh session per send
//! - **No false alarms from flaky measurement**: a failed sample is logged
//!   and retried on the next tick, never alerted on
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use vigil::alerts::{AlertDispatcher, Notifier, SmtpRelay};
//! use vigil::checks::resources::MemoryChecker;
//! use vigil::config::{self, SmtpConfig};
//! use vigil::scheduler::Scheduler;
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let smtp = SmtpConfig::from_env()?;
//! let notifier = Notifier::new(
//!     Box::new(SmtpRelay::new(smtp.clone())),
//!     smtp.sender.clone(),
//!     smtp.recipient.clone(),
//! );
//! let dispatcher = Arc::new(AlertDispatcher::new(notifier, config::COOLDOWN_WINDOW));
//!
//! let mut scheduler = Scheduler::new(dispatcher);
//! scheduler.spawn(Box::new(MemoryChecker::new(
//!     config::MEMORY_THRESHOLD_PERCENT,
//!     config::MEMORY_CHECK_INTERVAL,
//! )));
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod checks;
pub mod config;
pub mod scheduler;

// Re-export commonly used types
pub use alerts::{AlertDispatcher, AlertEvent, CooldownGate, DispatchOutcome, Notifier, SmtpRelay};
pub use checks::SignalChecker;
pub use scheduler::Scheduler;
