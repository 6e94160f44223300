// Mail Transport - Using lettre

use crate::config::SmtpConfig;
use crate::MailerError;
use async_trait::async_trait;
use lettre::message::header;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

/// Mail transport trait - implement this for custom transports
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send one message to the full recipient list
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> crate::Result<()>;

    /// Get the transport name for logging
    fn transport_name(&self) -> &str;

    /// Test the transport connectivity (optional)
    async fn test_connection(&self) -> crate::Result<()> {
        Ok(())
    }
}

/// SMTP mail transport
pub struct SmtpMailer {
    config: SmtpConfig,
}

impl SmtpMailer {
    /// Create new SMTP mailer
    pub fn new(config: SmtpConfig) -> crate::Result<Self> {
        Ok(Self { config })
    }

    /// Build one plain-text message addressed to every recipient
    fn build_message(
        &self,
        recipients: &[String],
        subject: &str,
        body: &str,
    ) -> crate::Result<Message> {
        let mut message_builder = Message::builder()
            .from(self.config.from_address.parse().map_err(MailerError::from)?)
            .subject(subject);

        // Add all recipients
        for to_addr in recipients {
            message_builder = message_builder.to(to_addr.parse().map_err(MailerError::from)?);
        }

        let message = message_builder
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(MailerError::from)?;

        Ok(message)
    }

    /// Get SMTP transport
    fn get_transport(&self) -> crate::Result<SmtpTransport> {
        let creds = Credentials::new(self.config.username.clone(), self.config.password.clone());

        let transport = if self.config.use_tls {
            SmtpTransport::starttls_relay(&self.config.server).map_err(MailerError::from)?
        } else {
            SmtpTransport::relay(&self.config.server).map_err(MailerError::from)?
        };

        let transport = transport
            .credentials(creds)
            .port(self.config.port)
            .build();

        Ok(transport)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, recipients: &[String], subject: &str, body: &str) -> crate::Result<()> {
        let message = self.build_message(recipients, subject, body)?;
        let transport = self.get_transport()?;

        // Send email (blocking operation, run in blocking task)
        tokio::task::spawn_blocking(move || {
            transport
                .send(&message)
                .map_err(|e| anyhow::Error::from(MailerError::SmtpError(e)))
        })
        .await??;

        Ok(())
    }

    fn transport_name(&self) -> &str {
        "smtp"
    }

    async fn test_connection(&self) -> crate::Result<()> {
        let transport = self.get_transport()?;

        tokio::task::spawn_blocking(move || {
            transport
                .test_connection()
                .map_err(|e| anyhow::Error::from(MailerError::SmtpError(e)))
        })
        .await??;

        Ok(())
    }
}
