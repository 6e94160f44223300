// Nag State Store Implementation
// Durable per-certificate counter of warnings already sent. Every mutation
// runs inside one transaction scoped to this call: begin, read the current
// row, insert-or-update, commit. The transaction value never leaves this
// store, and sqlx rolls an uncommitted transaction back on drop, so every
// failure path exits the atomic boundary cleanly.

use crate::db::connection::DatabasePool;
use crate::db::traits::NagStateStore;
use crate::MailerError;
use async_trait::async_trait;
use chrono::Utc;

pub struct NagStateStoreImpl {
    pool: DatabasePool,
}

impl NagStateStoreImpl {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NagStateStore for NagStateStoreImpl {
    async fn sent_count(&self, serial: &str) -> crate::Result<i64> {
        let count: Option<i64> = match &self.pool {
            DatabasePool::Postgres(pool) => {
                sqlx::query_scalar("SELECT sent_count FROM nag_state WHERE serial = $1")
                    .bind(serial)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        MailerError::DatabaseError(format!("Failed to read nag state: {}", e))
                    })?
            }
            DatabasePool::Sqlite(pool) => {
                sqlx::query_scalar("SELECT sent_count FROM nag_state WHERE serial = ?")
                    .bind(serial)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        MailerError::DatabaseError(format!("Failed to read nag state: {}", e))
                    })?
            }
        };

        // A certificate that was never tracked reads as zero warnings sent
        Ok(count.unwrap_or(0))
    }

    async fn commit(&self, serial: &str, new_count: i64) -> crate::Result<()> {
        let updated_at = Utc::now();

        match &self.pool {
            DatabasePool::Postgres(pool) => {
                let mut tx = pool.begin().await.map_err(|e| {
                    MailerError::DatabaseError(format!("Failed to begin nag transaction: {}", e))
                })?;

                let current: Option<i64> =
                    sqlx::query_scalar("SELECT sent_count FROM nag_state WHERE serial = $1")
                        .bind(serial)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|e| {
                            MailerError::DatabaseError(format!(
                                "Failed to read nag state for {}: {}",
                                serial, e
                            ))
                        })?;

                match current {
                    Some(_) => {
                        sqlx::query(
                            "UPDATE nag_state SET sent_count = $1, updated_at = $2 WHERE serial = $3",
                        )
                        .bind(new_count)
                        .bind(updated_at)
                        .bind(serial)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            MailerError::DatabaseError(format!(
                                "Failed to update nag state for {}: {}",
                                serial, e
                            ))
                        })?;
                    }
                    None => {
                        sqlx::query(
                            "INSERT INTO nag_state (serial, sent_count, updated_at) VALUES ($1, $2, $3)",
                        )
                        .bind(serial)
                        .bind(new_count)
                        .bind(updated_at)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            MailerError::DatabaseError(format!(
                                "Failed to create nag state for {}: {}",
                                serial, e
                            ))
                        })?;
                    }
                }

                tx.commit().await.map_err(|e| {
                    MailerError::DatabaseError(format!(
                        "Failed to commit nag state for {}: {}",
                        serial, e
                    ))
                })?;
            }
            DatabasePool::Sqlite(pool) => {
                let mut tx = pool.begin().await.map_err(|e| {
                    MailerError::DatabaseError(format!("Failed to begin nag transaction: {}", e))
                })?;

                let current: Option<i64> =
                    sqlx::query_scalar("SELECT sent_count FROM nag_state WHERE serial = ?")
                        .bind(serial)
                        .fetch_optional(&mut *tx)
                        .await
                        .map_err(|e| {
                            MailerError::DatabaseError(format!(
                                "Failed to read nag state for {}: {}",
                                serial, e
                            ))
                        })?;

                match current {
                    Some(_) => {
                        sqlx::query(
                            "UPDATE nag_state SET sent_count = ?, updated_at = ? WHERE serial = ?",
                        )
                        .bind(new_count)
                        .bind(updated_at)
                        .bind(serial)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            MailerError::DatabaseError(format!(
                                "Failed to update nag state for {}: {}",
                                serial, e
                            ))
                        })?;
                    }
                    None => {
                        sqlx::query(
                            "INSERT INTO nag_state (serial, sent_count, updated_at) VALUES (?, ?, ?)",
                        )
                        .bind(serial)
                        .bind(new_count)
                        .bind(updated_at)
                        .execute(&mut *tx)
                        .await
                        .map_err(|e| {
                            MailerError::DatabaseError(format!(
                                "Failed to create nag state for {}: {}",
                                serial, e
                            ))
                        })?;
                    }
                }

                tx.commit().await.map_err(|e| {
                    MailerError::DatabaseError(format!(
                        "Failed to commit nag state for {}: {}",
                        serial, e
                    ))
                })?;
            }
        }

        Ok(())
    }
}
