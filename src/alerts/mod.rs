//! Alert dispatch: per-channel cooldown deduplication and email delivery
//!
//! Breaches from every checker funnel through one [`AlertDispatcher`], which
//! consults the [`CooldownGate`] before handing the event to the
//! [`Notifier`].

pub mod cooldown;
pub mod dispatch;
pub mod event;
pub mod notifier;

pub use cooldown::CooldownGate;
pub use dispatch::{AlertDispatcher, DispatchOutcome};
pub use event::AlertEvent;
pub use notifier::{DeliveryError, MailTransport, Notifier, SmtpRelay};
