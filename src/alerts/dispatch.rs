//! Alert dispatch path: cooldown gate in front of the notifier

use std::time::Duration;

use super::cooldown::CooldownGate;
use super::event::AlertEvent;
use super::notifier::Notifier;

/// What happened to a submitted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event passed the gate and was delivered.
    Dispatched,
    /// The channel was still inside its cooldown window; the event was
    /// dropped with no side effect.
    Suppressed,
    /// The event passed the gate but delivery failed. The cooldown
    /// timestamp stays recorded; the event is dropped without retry.
    DeliveryFailed,
}

/// Shared dispatch path for all signal checkers.
///
/// Every breach funnels through here: the cooldown gate decides per channel,
/// and only a dispatched event reaches the notifier.
pub struct AlertDispatcher {
    gate: CooldownGate,
    notifier: Notifier,
}

impl AlertDispatcher {
    /// Create a dispatcher with the given per-channel cooldown window.
    pub fn new(notifier: Notifier, cooldown_window: Duration) -> Self {
        Self {
            gate: CooldownGate::new(cooldown_window),
            notifier,
        }
    }

    /// Run one event through the gate and, if it fires, the notifier.
    ///
    /// The gate records the fire time before the send, so a failed delivery
    /// still starts the channel's cooldown. That can suppress the next alert
    /// after a broken send; accepted, since the alternative is a flood of
    /// retries against a failing relay.
    pub async fn submit(&self, event: AlertEvent) -> DispatchOutcome {
        if !self.gate.try_fire(&event.channel_id) {
            tracing::debug!(channel = %event.channel_id, "Alert suppressed by cooldown");
            return DispatchOutcome::Suppressed;
        }

        match self.notifier.send(&event).await {
            Ok(()) => DispatchOutcome::Dispatched,
            Err(e) => {
                tracing::error!(
                    channel = %event.channel_id,
                    error = %e,
                    "Failed to deliver alert, event dropped"
                );
                DispatchOutcome::DeliveryFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use tokio::time::advance;

    use super::*;
    use crate::alerts::notifier::testing::RecordingTransport;

    const WINDOW: Duration = Duration::from_secs(30 * 60);

    fn event(channel: &str) -> AlertEvent {
        AlertEvent::new(channel, format!("Alert on {channel}"), "body")
    }

    fn dispatcher(transport: RecordingTransport) -> AlertDispatcher {
        let notifier = Notifier::new(Box::new(transport), "vigil@localhost", "ops@localhost");
        AlertDispatcher::new(notifier, WINDOW)
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_delivery_per_channel_per_window() {
        let (transport, delivered) = RecordingTransport::new();
        let dispatcher = dispatcher(transport);

        assert_eq!(
            dispatcher.submit(event("data:6:SOIL-03")).await,
            DispatchOutcome::Dispatched
        );
        assert_eq!(
            dispatcher.submit(event("data:6:SOIL-03")).await,
            DispatchOutcome::Suppressed
        );
        assert_eq!(delivered.load(Ordering::SeqCst), 1);

        // A third breach after the window elapses dispatches again.
        advance(WINDOW).await;
        assert_eq!(
            dispatcher.submit(event("data:6:SOIL-03")).await,
            DispatchOutcome::Dispatched
        );
        assert_eq!(delivered.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_channels_dispatch_independently() {
        let (transport, delivered) = RecordingTransport::new();
        let dispatcher = dispatcher(transport);

        assert_eq!(
            dispatcher.submit(event("ram")).await,
            DispatchOutcome::Dispatched
        );
        assert_eq!(
            dispatcher.submit(event("cpu")).await,
            DispatchOutcome::Dispatched
        );
        assert_eq!(
            dispatcher.submit(event("storage")).await,
            DispatchOutcome::Dispatched
        );
        assert_eq!(delivered.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_delivery_still_starts_cooldown() {
        let dispatcher = dispatcher(RecordingTransport::failing());

        assert_eq!(
            dispatcher.submit(event("storage")).await,
            DispatchOutcome::DeliveryFailed
        );

        // No second attempt within the window: the timestamp was recorded
        // even though the send failed.
        assert_eq!(
            dispatcher.submit(event("storage")).await,
            DispatchOutcome::Suppressed
        );
    }
}
