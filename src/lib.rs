// ExpiryRun - Certificate expiration notification mailer

//! ExpiryRun scans a certificate repository for certificates approaching
//! expiration and sends each owner at most one warning per configured
//! threshold. A per-certificate nag counter is committed transactionally
//! after every dispatch, so repeated runs never duplicate a notification.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod mailer;

// Re-export commonly used types
pub use crate::cli::Args;
pub use crate::config::MailerConfig;
pub use crate::error::MailerError;
pub use crate::mailer::{ExpirationMailer, RunSummary};

/// Result type for ExpiryRun operations
pub type Result<T> = anyhow::Result<T>;
