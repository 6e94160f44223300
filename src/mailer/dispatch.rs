// Notification Dispatcher
// Turns one certificate and its owning registration into one outbound
// warning message

use crate::db::models::{CertificateRecord, RegistrationRecord};
use crate::mailer::smtp::MailTransport;
use crate::mailer::template::{EmailContent, WarningTemplate};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Renders and sends expiration warnings
pub struct NotificationDispatcher {
    transport: Box<dyn MailTransport>,
    template: WarningTemplate,
}

impl NotificationDispatcher {
    /// Create new dispatcher
    pub fn new(transport: Box<dyn MailTransport>, template: WarningTemplate) -> Self {
        Self {
            transport,
            template,
        }
    }

    /// Send one warning for a certificate to all mailto contacts of its
    /// registration. Returns the number of recipients; zero means the
    /// registration has no mailto contact and no message was produced,
    /// which is not an error.
    pub async fn dispatch(
        &self,
        cert: &CertificateRecord,
        registration: &RegistrationRecord,
        now: DateTime<Utc>,
    ) -> crate::Result<usize> {
        let recipients = registration.mailto_addresses();
        if recipients.is_empty() {
            debug!(
                "Registration {} has no mailto contact, nothing to send for certificate {}",
                registration.id, cert.serial
            );
            return Ok(0);
        }

        let content = EmailContent::for_certificate(cert, now);
        let subject = self.template.subject(&content);
        let body = self.template.render(&content)?;

        // One message carrying the full recipient list
        self.transport.send(&recipients, &subject, &body).await?;

        debug!(
            "Sent expiration warning for certificate {} to {} recipients via {}",
            cert.serial,
            recipients.len(),
            self.transport.transport_name()
        );

        Ok(recipients.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use std::sync::{Arc, Mutex};

    type SentMessages = Arc<Mutex<Vec<(Vec<String>, String, String)>>>;

    struct RecordingTransport {
        sent: SentMessages,
    }

    impl RecordingTransport {
        fn new() -> (Self, SentMessages) {
            let sent: SentMessages = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    sent: Arc::clone(&sent),
                },
                sent,
            )
        }
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        async fn send(
            &self,
            recipients: &[String],
            subject: &str,
            body: &str,
        ) -> crate::Result<()> {
            self.sent.lock().unwrap().push((
                recipients.to_vec(),
                subject.to_string(),
                body.to_string(),
            ));
            Ok(())
        }

        fn transport_name(&self) -> &str {
            "recording"
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl MailTransport for FailingTransport {
        async fn send(
            &self,
            _recipients: &[String],
            _subject: &str,
            _body: &str,
        ) -> crate::Result<()> {
            Err(anyhow::anyhow!("relay unavailable"))
        }

        fn transport_name(&self) -> &str {
            "failing"
        }
    }

    fn test_certificate(now: DateTime<Utc>) -> CertificateRecord {
        CertificateRecord::new(
            "00af".to_string(),
            1,
            "example.com".to_string(),
            now + Duration::days(3),
        )
        .with_dns_names(vec!["example.com".to_string()])
    }

    #[tokio::test]
    async fn test_dispatch_sends_one_message_to_all_recipients() {
        let now = Utc::now();
        let (transport, sent) = RecordingTransport::new();
        let dispatcher = NotificationDispatcher::new(
            Box::new(transport),
            WarningTemplate::default_template().unwrap(),
        );

        let registration = RegistrationRecord::new(1).with_contacts(vec![
            "mailto:admin@example.com".to_string(),
            "mailto:ops@example.com".to_string(),
        ]);

        let count = dispatcher
            .dispatch(&test_certificate(now), &registration, now)
            .await
            .unwrap();
        assert_eq!(count, 2);

        // One message, both recipients on it
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, vec!["admin@example.com", "ops@example.com"]);
        assert!(sent[0].2.contains("example.com"));
    }

    #[tokio::test]
    async fn test_dispatch_without_mailto_contacts_sends_nothing() {
        let now = Utc::now();
        let (transport, _sent) = RecordingTransport::new();
        let dispatcher = NotificationDispatcher::new(
            Box::new(transport),
            WarningTemplate::default_template().unwrap(),
        );

        let registration =
            RegistrationRecord::new(1).with_contacts(vec!["tel:+15555551212".to_string()]);

        let count = dispatcher
            .dispatch(&test_certificate(now), &registration, now)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_dispatch_surfaces_transport_failure() {
        let now = Utc::now();
        let dispatcher = NotificationDispatcher::new(
            Box::new(FailingTransport),
            WarningTemplate::default_template().unwrap(),
        );

        let registration = RegistrationRecord::new(1)
            .with_contacts(vec!["mailto:admin@example.com".to_string()]);

        let result = dispatcher
            .dispatch(&test_certificate(now), &registration, now)
            .await;
        assert!(result.is_err());
    }
}
