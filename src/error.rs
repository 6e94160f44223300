// Error types for ExpiryRun
//
// Structured error types using thiserror, layered under the crate-wide
// anyhow::Result alias so call sites can attach context while callers that
// care about the failure class can still downcast.

use thiserror::Error;

/// Main error type for ExpiryRun operations
#[derive(Debug, Error)]
pub enum MailerError {
    /// Database operation errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A certificate references a registration that does not exist.
    /// Referential-integrity violation; halts the run.
    #[error("Registration {id} not found for certificate {serial}")]
    MissingRegistration { id: i64, serial: String },

    /// Warning template failed to compile
    #[error("Template error: {0}")]
    TemplateError(#[from] Box<handlebars::TemplateError>),

    /// Warning template failed to render
    #[error("Template render error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// Outbound message could not be assembled
    #[error("Email error: {0}")]
    EmailError(#[from] lettre::error::Error),

    /// Sender or recipient address was rejected
    #[error("Email address error: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    /// SMTP transport failure
    #[error("SMTP error: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    /// Invalid warning threshold sequence
    #[error("Invalid warning thresholds: {message}")]
    ThresholdError { message: String },

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<handlebars::TemplateError> for MailerError {
    fn from(err: handlebars::TemplateError) -> Self {
        MailerError::TemplateError(Box::new(err))
    }
}
