// Database Traits
// Defines repository interfaces for database operations

use crate::db::models::{CertificateRecord, RegistrationRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Certificate repository trait
#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Certificates whose expiry falls in the half-open window
    /// [left, right), excluding revoked certificates and certificates whose
    /// nag counter already reached max_nag_count. Ordered by ascending
    /// expiry.
    async fn find_expiring(
        &self,
        left: DateTime<Utc>,
        right: DateTime<Utc>,
        max_nag_count: i64,
    ) -> crate::Result<Vec<CertificateRecord>>;
}

/// Registration lookup trait
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Get registration by id; None if it does not exist
    async fn get_by_id(&self, id: i64) -> crate::Result<Option<RegistrationRecord>>;
}

/// Nag state store trait
///
/// The per-certificate counter of warnings already sent. All mutation goes
/// through `commit`, which wraps its read-then-write in one transaction —
/// there is no way to hold a nag-state transaction open across calls.
#[async_trait]
pub trait NagStateStore: Send + Sync {
    /// Current counter for a serial; a missing row reads as 0
    async fn sent_count(&self, serial: &str) -> crate::Result<i64>;

    /// Atomically set the counter to new_count, creating the row if the
    /// certificate was never tracked. Rolls back on any failure.
    async fn commit(&self, serial: &str, new_count: i64) -> crate::Result<()>;
}
