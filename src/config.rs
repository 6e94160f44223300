// Mailer configuration

use crate::db::config::DatabaseConfig;
use crate::{MailerError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main mailer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    pub mailer: MailerSettings,
    pub smtp: SmtpConfig,
    pub database: DatabaseConfig,
}

/// Mailer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerSettings {
    /// Warning thresholds in days before expiry, ascending
    pub warning_days: Vec<i64>,

    /// Warning template file; the built-in template is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,

    /// Maximum number of emails to send per run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_limit: Option<usize>,

    /// What to do when a single certificate's dispatch fails
    #[serde(default)]
    pub dispatch_error_policy: DispatchErrorPolicy,

    /// Advance the nag counter even when a registration has no mailto
    /// contact. Disabling this retries the certificate on every run until a
    /// contact appears.
    #[serde(default = "default_advance_without_contacts")]
    pub advance_without_contacts: bool,
}

/// Policy applied when rendering or sending a warning fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchErrorPolicy {
    /// Abort the whole run on the first failure
    #[default]
    Abort,
    /// Skip the failed certificate (no nag update) and continue
    Skip,
}

/// SMTP relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub from_address: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub use_tls: bool,
}

fn default_advance_without_contacts() -> bool {
    true
}

impl Default for MailerSettings {
    fn default() -> Self {
        Self {
            warning_days: vec![1, 3, 7, 14],
            template_path: None,
            message_limit: None,
            dispatch_error_policy: DispatchErrorPolicy::default(),
            advance_without_contacts: true,
        }
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            port: 25,
            from_address: "expiry@localhost".to_string(),
            username: String::new(),
            password: String::new(),
            use_tls: false,
        }
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            mailer: MailerSettings::default(),
            smtp: SmtpConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl MailerConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| MailerError::ConfigError {
            message: format!("Failed to read config file {:?}: {}", path.as_ref(), e),
        })?;

        let config: MailerConfig = toml::from_str(&contents).map_err(|e| {
            MailerError::ConfigError {
                message: format!("Failed to parse TOML config: {}", e),
            }
        })?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).map_err(|e| MailerError::ConfigError {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path.as_ref(), toml_str).map_err(|e| MailerError::ConfigError {
            message: format!("Failed to write config file {:?}: {}", path.as_ref(), e),
        })?;

        Ok(())
    }

    /// Create example configuration file
    pub fn create_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let example = r#"[mailer]
# Warning thresholds in days before expiry, ascending
warning_days = [1, 3, 7, 14]

# Warning template file (built-in template used when unset)
# template_path = "/etc/expiryrun/warning.hbs"

# Maximum number of emails per run (unlimited when unset)
# message_limit = 1000

# "abort" stops the run on the first dispatch failure, "skip" continues
# with the next certificate
dispatch_error_policy = "abort"

# Advance the nag counter even when a registration has no mailto contact
advance_without_contacts = true

[smtp]
server = "smtp.example.com"
port = 587
from_address = "expiry@example.com"
username = "expiry"
password = "secure_password"
use_tls = true

[database]
# Database type: "postgres" or "sqlite"
type = "postgres"

# PostgreSQL configuration
host = "localhost"
port = 5432
database = "expiryrun"
username = "expiryrun_user"
password = "secure_password"
max_connections = 10

# SQLite configuration (uncomment to use)
# type = "sqlite"
# path = "./expiryrun.db"
"#;

        fs::write(path.as_ref(), example).map_err(|e| MailerError::ConfigError {
            message: format!("Failed to write config file {:?}: {}", path.as_ref(), e),
        })?;

        Ok(())
    }
}
