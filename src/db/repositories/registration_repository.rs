// Registration Repository Implementation
// Lookup of certificate owners and their contact URIs

use crate::db::connection::DatabasePool;
use crate::db::models::RegistrationRecord;
use crate::db::traits::RegistrationStore;
use crate::MailerError;
use async_trait::async_trait;
use sqlx::Row;

pub struct RegistrationRepositoryImpl {
    pool: DatabasePool,
}

impl RegistrationRepositoryImpl {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Insert a registration row. Owned by the issuance pipeline in
    /// production; used here by fixtures and tests.
    pub async fn insert(&self, registration: &RegistrationRecord) -> crate::Result<()> {
        let contacts_json =
            serde_json::to_string(&registration.contacts).map_err(MailerError::from)?;

        match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO registrations (id, contacts)
                    VALUES ($1, $2)
                    "#,
                )
                .bind(registration.id)
                .bind(&contacts_json)
                .execute(pool)
                .await
                .map_err(|e| {
                    MailerError::DatabaseError(format!("Failed to insert registration: {}", e))
                })?;
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query(
                    r#"
                    INSERT INTO registrations (id, contacts)
                    VALUES (?, ?)
                    "#,
                )
                .bind(registration.id)
                .bind(&contacts_json)
                .execute(pool)
                .await
                .map_err(|e| {
                    MailerError::DatabaseError(format!("Failed to insert registration: {}", e))
                })?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl RegistrationStore for RegistrationRepositoryImpl {
    async fn get_by_id(&self, id: i64) -> crate::Result<Option<RegistrationRecord>> {
        let row = match &self.pool {
            DatabasePool::Postgres(pool) => sqlx::query(
                r#"
                SELECT id, contacts
                FROM registrations
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                MailerError::DatabaseError(format!("Failed to fetch registration: {}", e))
            })?
            .map(|row| {
                let contacts_json: String = row.get("contacts");
                (row.get::<i64, _>("id"), contacts_json)
            }),
            DatabasePool::Sqlite(pool) => sqlx::query(
                r#"
                SELECT id, contacts
                FROM registrations
                WHERE id = ?
                "#,
            )
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                MailerError::DatabaseError(format!("Failed to fetch registration: {}", e))
            })?
            .map(|row| {
                let contacts_json: String = row.get("contacts");
                (row.get::<i64, _>("id"), contacts_json)
            }),
        };

        match row {
            Some((id, contacts_json)) => {
                let contacts: Vec<String> =
                    serde_json::from_str(&contacts_json).map_err(MailerError::from)?;
                Ok(Some(RegistrationRecord { id, contacts }))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::config::DatabaseConfig;
    use crate::db::migrations::run_migrations;
    use std::path::PathBuf;

    async fn test_pool() -> DatabasePool {
        let config = DatabaseConfig::sqlite(PathBuf::from(":memory:"));
        let pool = DatabasePool::new(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_insert_and_get_registration() {
        let pool = test_pool().await;
        let repo = RegistrationRepositoryImpl::new(pool.clone());

        let registration = RegistrationRecord::new(7)
            .with_contacts(vec!["mailto:admin@example.com".to_string()]);
        repo.insert(&registration).await.unwrap();

        let fetched = repo.get_by_id(7).await.unwrap().unwrap();
        assert_eq!(fetched.id, 7);
        assert_eq!(fetched.contacts, vec!["mailto:admin@example.com"]);

        pool.close().await;
    }

    #[tokio::test]
    async fn test_get_missing_registration() {
        let pool = test_pool().await;
        let repo = RegistrationRepositoryImpl::new(pool.clone());

        let fetched = repo.get_by_id(404).await.unwrap();
        assert!(fetched.is_none());

        pool.close().await;
    }
}
