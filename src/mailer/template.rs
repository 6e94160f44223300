// Warning Template
// Renders the expiration warning body with handlebars

use crate::db::models::CertificateRecord;
use crate::MailerError;
use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

const TEMPLATE_NAME: &str = "warning";

/// Built-in warning template, used when no template file is configured
pub const DEFAULT_WARNING_TEMPLATE: &str = "\
Hello,

Your certificate for common name {{CommonName}} (and DNSNames {{DNSNames}}) is
going to expire in {{DaysToExpiration}} days ({{ExpirationDate}}). Make sure
you renew it before then!

Regards,
ExpiryRun
";

/// Fields available to the warning template
#[derive(Debug, Clone, Serialize)]
pub struct EmailContent {
    #[serde(rename = "CommonName")]
    pub common_name: String,
    #[serde(rename = "DNSNames")]
    pub dns_names: String,
    #[serde(rename = "ExpirationDate")]
    pub expiration_date: String,
    #[serde(rename = "DaysToExpiration")]
    pub days_to_expiration: i64,
}

impl EmailContent {
    /// Build template fields for a certificate. Days-to-expiration is the
    /// signed whole-day count from `now` until expiry: positive while the
    /// certificate is still valid, negative once it has lapsed.
    pub fn for_certificate(cert: &CertificateRecord, now: DateTime<Utc>) -> Self {
        Self {
            common_name: cert.common_name.clone(),
            dns_names: cert.dns_names_joined(),
            expiration_date: cert.expires.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            days_to_expiration: (cert.expires - now).num_days(),
        }
    }
}

/// Compiled warning template
pub struct WarningTemplate {
    registry: Handlebars<'static>,
}

impl WarningTemplate {
    /// Compile a template from source
    pub fn new(source: &str) -> crate::Result<Self> {
        let mut registry = Handlebars::new();
        registry
            .register_template_string(TEMPLATE_NAME, source)
            .map_err(MailerError::from)?;
        Ok(Self { registry })
    }

    /// Compile the built-in template
    pub fn default_template() -> crate::Result<Self> {
        Self::new(DEFAULT_WARNING_TEMPLATE)
    }

    /// Compile a template read from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let source = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("Failed to read template file {:?}: {}", path.as_ref(), e)
        })?;
        Self::new(&source)
    }

    /// Render the warning body
    pub fn render(&self, content: &EmailContent) -> crate::Result<String> {
        let body = self
            .registry
            .render(TEMPLATE_NAME, content)
            .map_err(MailerError::from)?;
        Ok(body)
    }

    /// Subject line for a warning message
    pub fn subject(&self, content: &EmailContent) -> String {
        format!(
            "Certificate expiration notice for {} ({} days remaining)",
            content.common_name, content.days_to_expiration
        )
    }
}
