//! SMTP delivery via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport as _};
use secrecy::ExposeSecret;

use crate::config::SmtpConfig;
use crate::error::TransportError;
use crate::templates::EmailContent;
use crate::transport::Transport;

/// Sends through an authenticated SMTP relay.
///
/// lettre's `SmtpTransport` is blocking, so each send runs on the
/// blocking pool.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, TransportError> {
        let from: Mailbox = parse_mailbox(&config.from_address)?;

        let creds = Credentials::new(
            config.username.clone(),
            config.password.expose_secret().to_string(),
        );

        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| TransportError::Send {
                transport: "smtp".into(),
                reason: format!("SMTP relay error: {e}"),
            })?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { transport, from })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, TransportError> {
    address.parse().map_err(|e| TransportError::Address {
        address: address.to_string(),
        reason: format!("{e}"),
    })
}

/// Build the MIME message for one recipient.
pub fn build_message(
    from: &Mailbox,
    to: &str,
    content: &EmailContent,
) -> Result<Message, TransportError> {
    Message::builder()
        .from(from.clone())
        .to(parse_mailbox(to)?)
        .subject(content.subject.as_str())
        .body(content.body.clone())
        .map_err(|e| TransportError::Build(e.to_string()))
}

#[async_trait]
impl Transport for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, to: &str, content: &EmailContent) -> Result<(), TransportError> {
        let email = build_message(&self.from, to, content)?;
        let transport = self.transport.clone();

        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| TransportError::Send {
                transport: "smtp".into(),
                reason: format!("send task failed: {e}"),
            })?
            .map_err(|e| TransportError::Send {
                transport: "smtp".into(),
                reason: format!("SMTP send failed: {e}"),
            })?;

        tracing::info!(to, "Email sent");
        Ok(())
    }
}
