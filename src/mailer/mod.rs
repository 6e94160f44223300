// Expiration Mailer - Main orchestration
// One pass over every warning window: pull candidates, dispatch warnings,
// commit the nag counter per certificate

pub mod dispatch;
pub mod smtp;
pub mod template;
pub mod windows;

pub use dispatch::NotificationDispatcher;
pub use smtp::{MailTransport, SmtpMailer};
pub use template::{EmailContent, WarningTemplate, DEFAULT_WARNING_TEMPLATE};
pub use windows::{WarningThresholds, WarningWindow};

use crate::config::DispatchErrorPolicy;
use crate::db::MailerDatabase;
use crate::MailerError;
use anyhow::Context;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

/// Counters accumulated over one mailer pass.
/// Returned by value so runs stay inspectable without process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub windows_scanned: usize,
    pub windows_skipped: usize,
    pub certificates_examined: usize,
    pub certificates_notified: usize,
    /// Total recipients across all messages sent
    pub messages_sent: usize,
    pub dispatch_failures: usize,
    pub nag_commit_failures: usize,
}

/// One-shot expiration mailer
pub struct ExpirationMailer {
    thresholds: WarningThresholds,
    dispatcher: NotificationDispatcher,
    policy: DispatchErrorPolicy,
    advance_without_contacts: bool,
    message_limit: Option<usize>,
}

impl ExpirationMailer {
    /// Create new mailer with default policies
    pub fn new(thresholds: WarningThresholds, dispatcher: NotificationDispatcher) -> Self {
        Self {
            thresholds,
            dispatcher,
            policy: DispatchErrorPolicy::default(),
            advance_without_contacts: true,
            message_limit: None,
        }
    }

    /// Set the dispatch failure policy
    pub fn with_policy(mut self, policy: DispatchErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set whether certificates without mailto contacts still consume their
    /// warning threshold
    pub fn with_advance_without_contacts(mut self, advance: bool) -> Self {
        self.advance_without_contacts = advance;
        self
    }

    /// Cap the number of emails sent per run
    pub fn with_message_limit(mut self, limit: Option<usize>) -> Self {
        self.message_limit = limit;
        self
    }

    /// Run one full pass over all warning windows, most urgent first.
    ///
    /// A window's query failure skips that window only. A missing
    /// registration halts the run. A dispatch failure halts the run under
    /// the abort policy and skips the certificate under the skip policy. A
    /// nag-commit failure skips that certificate; the certificate is
    /// re-attempted next run, so delivery is at-least-once.
    pub async fn run(
        &self,
        db: &MailerDatabase,
        now: DateTime<Utc>,
    ) -> crate::Result<RunSummary> {
        let mut summary = RunSummary::default();

        info!(
            "Starting expiration mailer pass, warning thresholds {:?} days",
            self.thresholds.days()
        );

        'windows: for window in self.thresholds.windows(now) {
            info!(
                "Searching for certificates that expire between {} and {}",
                window.left, window.right
            );

            let certs = match db
                .certificates()
                .find_expiring(window.left, window.right, window.max_nag_count)
                .await
            {
                Ok(certs) => certs,
                Err(e) => {
                    error!(
                        "Error loading certificates for the {}-day window: {}",
                        window.days, e
                    );
                    summary.windows_skipped += 1;
                    continue;
                }
            };
            summary.windows_scanned += 1;

            if certs.is_empty() {
                info!("None found, no expiration emails needed");
                continue;
            }

            info!("Found {} certificates, starting sending messages", certs.len());

            for cert in certs {
                summary.certificates_examined += 1;

                if let Some(limit) = self.message_limit {
                    if summary.messages_sent >= limit {
                        warn!("Message limit {} reached, ending run early", limit);
                        break 'windows;
                    }
                }

                let registration = db
                    .registrations()
                    .get_by_id(cert.registration_id)
                    .await
                    .with_context(|| {
                        format!("loading registration for certificate {}", cert.serial)
                    })?
                    .ok_or_else(|| MailerError::MissingRegistration {
                        id: cert.registration_id,
                        serial: cert.serial.clone(),
                    })?;

                let recipients = match self.dispatcher.dispatch(&cert, &registration, now).await {
                    Ok(recipients) => recipients,
                    Err(e) => match self.policy {
                        DispatchErrorPolicy::Abort => {
                            return Err(e.context(format!(
                                "dispatch failed for certificate {}",
                                cert.serial
                            )));
                        }
                        DispatchErrorPolicy::Skip => {
                            error!("Dispatch failed for certificate {}: {}", cert.serial, e);
                            summary.dispatch_failures += 1;
                            continue;
                        }
                    },
                };

                if recipients == 0 && !self.advance_without_contacts {
                    debug!(
                        "No mailto contact for certificate {}, leaving nag state untouched",
                        cert.serial
                    );
                    continue;
                }

                if recipients > 0 {
                    summary.certificates_notified += 1;
                    summary.messages_sent += recipients;
                }

                // The dispatch completed; record that this threshold fired.
                // A failure here is retried next run and may re-notify.
                if let Err(e) = db.nag_state().commit(&cert.serial, window.max_nag_count).await {
                    error!(
                        "Failed to record nag state for certificate {}: {}",
                        cert.serial, e
                    );
                    summary.nag_commit_failures += 1;
                    continue;
                }
            }

            info!("Finished sending messages for the {}-day window", window.days);
        }

        info!(
            "Expiration mailer pass complete: {} messages to {} certificates",
            summary.messages_sent, summary.certificates_notified
        );

        Ok(summary)
    }
}
