//! Alert event type

use chrono::{DateTime, Utc};

/// One breach, ready to be dispatched.
///
/// Constructed by a signal checker at breach time, consumed once by the
/// notifier, then discarded. There is no retry queue: an event whose
/// delivery fails is dropped.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    /// Deduplication bucket this event belongs to ("ram", "cpu", "storage",
    /// or `data:{project}:{device}`).
    pub channel_id: String,
    /// Human-readable mail subject.
    pub subject: String,
    /// Human-readable mail body.
    pub body: String,
    /// When the breach was detected.
    pub raised_at: DateTime<Utc>,
}

impl AlertEvent {
    /// Create an event stamped with the current time.
    pub fn new(
        channel_id: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            subject: subject.into(),
            body: body.into(),
            raised_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_channel_and_text() {
        let event = AlertEvent::new("data:6:SOIL-03", "subject", "body");
        assert_eq!(event.channel_id, "data:6:SOIL-03");
        assert_eq!(event.subject, "subject");
        assert_eq!(event.body, "body");
        assert!(event.raised_at <= Utc::now());
    }
}
