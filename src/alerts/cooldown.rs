//! Per-channel alert cooldown

use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::Instant;

/// Tracks when each alert channel last fired and suppresses re-fires within
/// the cooldown window.
///
/// The map is keyed by channel id; the entry API locks a single key for the
/// whole read-check-write, so the decision and the timestamp update are
/// atomic per channel. Distinct channels never contend.
pub struct CooldownGate {
    window: Duration,
    last_alert: DashMap<String, Instant>,
}

impl CooldownGate {
    /// Create a gate with the given cooldown window, shared by all channels.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_alert: DashMap::new(),
        }
    }

    /// Decide whether an alert on `channel` may fire now.
    ///
    /// Returns `true` and records the fire time if the channel has never
    /// fired or its window has elapsed; returns `false` with no side effect
    /// otherwise. A channel whose window elapsed exactly now fires.
    pub fn try_fire(&self, channel: &str) -> bool {
        let now = Instant::now();
        match self.last_alert.entry(channel.to_string()) {
            Entry::Occupied(mut slot) => {
                if now.duration_since(*slot.get()) < self.window {
                    false
                } else {
                    slot.insert(now);
                    true
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
        }
    }

    /// When `channel` last fired, if ever.
    pub fn last_fired(&self, channel: &str) -> Option<Instant> {
        self.last_alert.get(channel).map(|entry| *entry.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    const WINDOW: Duration = Duration::from_secs(30 * 60);

    #[tokio::test(start_paused = true)]
    async fn test_second_fire_within_window_is_suppressed() {
        let gate = CooldownGate::new(WINDOW);

        assert!(gate.try_fire("ram"));
        assert!(!gate.try_fire("ram"));

        advance(WINDOW - Duration::from_secs(1)).await;
        assert!(!gate.try_fire("ram"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_again_after_window_elapses() {
        let gate = CooldownGate::new(WINDOW);

        assert!(gate.try_fire("cpu"));
        advance(WINDOW).await;
        assert!(gate.try_fire("cpu"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_channels_do_not_share_cooldown() {
        let gate = CooldownGate::new(WINDOW);

        assert!(gate.try_fire("ram"));
        assert!(gate.try_fire("cpu"));
        assert!(gate.try_fire("data:6:SOIL-03"));

        // Still suppressed individually.
        assert!(!gate.try_fire("ram"));
        assert!(!gate.try_fire("data:6:SOIL-03"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_fired_is_monotonically_non_decreasing() {
        let gate = CooldownGate::new(WINDOW);

        assert!(gate.try_fire("storage"));
        let first = gate.last_fired("storage").unwrap();

        // A suppressed attempt must not touch the timestamp.
        advance(Duration::from_secs(60)).await;
        assert!(!gate.try_fire("storage"));
        assert_eq!(gate.last_fired("storage").unwrap(), first);

        advance(WINDOW).await;
        assert!(gate.try_fire("storage"));
        assert!(gate.last_fired("storage").unwrap() > first);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_channel_has_no_timestamp() {
        let gate = CooldownGate::new(WINDOW);
        assert!(gate.last_fired("ram").is_none());
    }
}
