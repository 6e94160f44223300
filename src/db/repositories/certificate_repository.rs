// Certificate Repository Implementation
// Read side of the certificate table: window queries for the scanner plus
// an insert used by fixtures and tests

use crate::db::connection::DatabasePool;
use crate::db::models::{CertificateRecord, STATUS_REVOKED};
use crate::db::traits::CertificateStore;
use crate::MailerError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

const FIND_EXPIRING_PG: &str = r#"
    SELECT c.serial, c.registration_id, c.status, c.common_name, c.dns_names, c.expires
    FROM certificates AS c
    LEFT JOIN nag_state AS n ON n.serial = c.serial
    WHERE c.expires >= $1 AND c.expires < $2
      AND c.status != $3
      AND COALESCE(n.sent_count, 0) < $4
    ORDER BY c.expires ASC
"#;

const FIND_EXPIRING_SQLITE: &str = r#"
    SELECT c.serial, c.registration_id, c.status, c.common_name, c.dns_names, c.expires
    FROM certificates AS c
    LEFT JOIN nag_state AS n ON n.serial = c.serial
    WHERE c.expires >= ? AND c.expires < ?
      AND c.status != ?
      AND COALESCE(n.sent_count, 0) < ?
    ORDER BY c.expires ASC
"#;

pub struct CertificateRepositoryImpl {
    pool: DatabasePool,
}

impl CertificateRepositoryImpl {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert a certificate row. The issuance pipeline owns this table in
    /// production; the mailer itself only inserts from fixtures and tests.
    pub async fn insert(&self, cert: &CertificateRecord) -> crate::Result<()> {
        let dns_names_json = serde_json::to_string(&cert.dns_names).map_err(MailerError::from)?;

        match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO certificates (serial, registration_id, status, common_name, dns_names, expires, der_bytes)
                    VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(&cert.serial)
                .bind(cert.registration_id)
                .bind(&cert.status)
                .bind(&cert.common_name)
                .bind(&dns_names_json)
                .bind(cert.expires)
                .bind(&cert.der_bytes)
                .execute(pool)
                .await
                .map_err(|e| {
                    MailerError::DatabaseError(format!("Failed to insert certificate: {}", e))
                })?;
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO certificates (serial, registration_id, status, common_name, dns_names, expires, der_bytes)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&cert.serial)
                .bind(cert.registration_id)
                .bind(&cert.status)
                .bind(&cert.common_name)
                .bind(&dns_names_json)
                .bind(cert.expires)
                .bind(&cert.der_bytes)
                .execute(pool)
                .await
                .map_err(|e| {
                    MailerError::DatabaseError(format!("Failed to insert certificate: {}", e))
                })?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CertificateStore for CertificateRepositoryImpl {
    async fn find_expiring(
        &self,
        left: DateTime<Utc>,
        right: DateTime<Utc>,
        max_nag_count: i64,
    ) -> crate::Result<Vec<CertificateRecord>> {
        // A certificate with no nag row has never been warned: LEFT JOIN
        // with COALESCE treats it as sent_count = 0
        match &self.pool {
            DatabasePool::Postgres(pool) => {
                let rows = sqlx::query(FIND_EXPIRING_PG)
                    .bind(left)
                    .bind(right)
                    .bind(STATUS_REVOKED)
                    .bind(max_nag_count)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| {
                        MailerError::DatabaseError(format!("Failed to load certificates: {}", e))
                    })?;

                let mut certs = Vec::with_capacity(rows.len());
                for row in rows {
                    let dns_names_json: String = row.get("dns_names");
                    certs.push(CertificateRecord {
                        serial: row.get("serial"),
                        registration_id: row.get("registration_id"),
                        status: row.get("status"),
                        common_name: row.get("common_name"),
                        dns_names: serde_json::from_str(&dns_names_json)
                            .map_err(MailerError::from)?,
                        expires: row.get("expires"),
                        der_bytes: None,
                    });
                }
                Ok(certs)
            }
            DatabasePool::Sqlite(pool) => {
                let rows = sqlx::query(FIND_EXPIRING_SQLITE)
                    .bind(left)
                    .bind(right)
                    .bind(STATUS_REVOKED)
                    .bind(max_nag_count)
                    .fetch_all(pool)
                    .await
                    .map_err(|e| {
                        MailerError::DatabaseError(format!("Failed to load certificates: {}", e))
                    })?;

                let mut certs = Vec::with_capacity(rows.len());
                for row in rows {
                    let dns_names_json: String = row.get("dns_names");
                    certs.push(CertificateRecord {
                        serial: row.get("serial"),
                        registration_id: row.get("registration_id"),
                        status: row.get("status"),
                        common_name: row.get("common_name"),
                        dns_names: serde_json::from_str(&dns_names_json)
                            .map_err(MailerError::from)?,
                        expires: row.get("expires"),
                        der_bytes: None,
                    });
                }
                Ok(certs)
            }
        }
    }
}
