// Database Module
// Storage layer for the expiration mailer: certificate and registration
// lookups plus the durable nag-state counter

pub mod config;
pub mod connection;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod traits;

// Re-exports
pub use config::{DatabaseConfig, DatabaseType};
pub use connection::DatabasePool;
pub use migrations::run_migrations;
pub use models::*;
pub use traits::*;

use repositories::{CertificateRepositoryImpl, NagStateStoreImpl, RegistrationRepositoryImpl};

/// Main database struct
pub struct MailerDatabase {
    pool: DatabasePool,
    certificates: CertificateRepositoryImpl,
    registrations: RegistrationRepositoryImpl,
    nag_state: NagStateStoreImpl,
}

impl MailerDatabase {
    /// Create new database instance
    pub async fn new(config: &DatabaseConfig) -> crate::Result<Self> {
        let pool = DatabasePool::new(config).await?;

        // Run migrations
        run_migrations(&pool).await?;

        let certificates = CertificateRepositoryImpl::new(pool.clone());
        let registrations = RegistrationRepositoryImpl::new(pool.clone());
        let nag_state = NagStateStoreImpl::new(pool.clone());

        Ok(Self {
            pool,
            certificates,
            registrations,
            nag_state,
        })
    }

    /// Get database pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Certificate repository
    pub fn certificates(&self) -> &dyn CertificateStore {
        &self.certificates
    }

    /// Registration lookup
    pub fn registrations(&self) -> &dyn RegistrationStore {
        &self.registrations
    }

    /// Nag state store
    pub fn nag_state(&self) -> &dyn NagStateStore {
        &self.nag_state
    }

    /// Close database connection
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_database_creation() {
        let config = DatabaseConfig::sqlite(PathBuf::from(":memory:"));
        let db = MailerDatabase::new(&config).await.unwrap();

        assert!(matches!(db.pool.db_type(), DatabaseType::Sqlite));
        assert_eq!(db.nag_state().sent_count("00af").await.unwrap(), 0);

        db.close().await;
    }
}
