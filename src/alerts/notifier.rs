//! Email notification delivery

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::event::AlertEvent;
use crate::config::SmtpConfig;

/// Outbound mail transport.
///
/// The production implementation is [`SmtpRelay`]; tests substitute a
/// recording transport so dispatch behavior can be asserted without a relay.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one assembled message.
    async fn deliver(&self, message: Message) -> Result<(), DeliveryError>;
}

/// SMTP relay that opens a fresh authenticated STARTTLS session per send.
///
/// No connection pooling: each delivery builds, uses and drops its own
/// session, so a dead connection can never go stale between alerts.
pub struct SmtpRelay {
    config: SmtpConfig,
}

impl SmtpRelay {
    /// Create a relay from SMTP settings.
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailTransport for SmtpRelay {
    async fn deliver(&self, message: Message) -> Result<(), DeliveryError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
            .port(self.config.port)
            .credentials(Credentials::new(
                self.config.user.clone(),
                self.config.password.clone(),
            ))
            .build();

        mailer.send(message).await?;
        Ok(())
    }
}

/// Formats alert events as plain-text mail and hands them to a transport.
pub struct Notifier {
    transport: Box<dyn MailTransport>,
    sender: String,
    recipient: String,
}

impl Notifier {
    /// Create a notifier addressing the fixed configured recipient.
    pub fn new(
        transport: Box<dyn MailTransport>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            sender: sender.into(),
            recipient: recipient.into(),
        }
    }

    /// Send one alert. Failure is returned to the caller; there is no retry.
    pub async fn send(&self, event: &AlertEvent) -> Result<(), DeliveryError> {
        let message = self.build_message(event)?;
        self.transport.deliver(message).await?;

        tracing::info!(
            channel = %event.channel_id,
            recipient = %self.recipient,
            "Alert email sent"
        );
        Ok(())
    }

    fn build_message(&self, event: &AlertEvent) -> Result<Message, DeliveryError> {
        Message::builder()
            .from(self.sender.parse()?)
            .to(self.recipient.parse()?)
            .subject(event.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(event.body.clone())
            .map_err(|e| DeliveryError::Build(e.to_string()))
    }
}

/// Delivery errors
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP transport failure (authentication, connection, timeout).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The sender or recipient address could not be parsed.
    #[error("address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("message build error: {0}")]
    Build(String),
}
