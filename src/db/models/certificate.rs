// Certificate Record Model
// An issued certificate, keyed by hex-rendered serial. Immutable here: the
// mailer only reads certificates, it never issues or revokes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status tag of a certificate that may still be warned about
pub const STATUS_VALID: &str = "valid";
/// Terminal status excluded from every warning window
pub const STATUS_REVOKED: &str = "revoked";

/// Certificate record in database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Hex-rendered serial, the join key to nag state
    pub serial: String,
    pub registration_id: i64,
    pub status: String,
    pub common_name: String,
    pub dns_names: Vec<String>,
    pub expires: DateTime<Utc>,
    /// Raw DER encoding; not needed for dispatch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub der_bytes: Option<Vec<u8>>,
}

impl CertificateRecord {
    /// Create new certificate record
    pub fn new(
        serial: String,
        registration_id: i64,
        common_name: String,
        expires: DateTime<Utc>,
    ) -> Self {
        Self {
            serial,
            registration_id,
            status: STATUS_VALID.to_string(),
            common_name,
            dns_names: Vec::new(),
            expires,
            der_bytes: None,
        }
    }

    /// Set DNS names
    pub fn with_dns_names(mut self, dns_names: Vec<String>) -> Self {
        self.dns_names = dns_names;
        self
    }

    /// Set status tag
    pub fn with_status(mut self, status: String) -> Self {
        self.status = status;
        self
    }

    /// Set DER bytes
    pub fn with_der_bytes(mut self, der: Vec<u8>) -> Self {
        self.der_bytes = Some(der);
        self
    }

    pub fn is_revoked(&self) -> bool {
        self.status == STATUS_REVOKED
    }

    /// Comma-joined DNS names for the warning template
    pub fn dns_names_joined(&self) -> String {
        self.dns_names.join(", ")
    }
}
