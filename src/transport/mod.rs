//! Outbound mail transport: the only collaborator a campaign sends through.

pub mod smtp;

pub use smtp::SmtpMailer;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::templates::EmailContent;

/// Delivers one rendered message to one address.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, to: &str, content: &EmailContent) -> Result<(), TransportError>;
}

/// Dry-run transport: logs what would be sent and always succeeds.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

impl LogTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for LogTransport {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, to: &str, content: &EmailContent) -> Result<(), TransportError> {
        tracing::info!(to, subject = %content.subject, "Email sent (dry run)");
        Ok(())
    }
}
