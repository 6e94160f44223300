// Command line arguments

use clap::Parser;
use std::path::PathBuf;

/// Certificate expiration notification mailer
///
/// Scans the certificate repository for certificates approaching expiration
/// and sends each owner at most one warning per configured threshold.
#[derive(Parser, Debug, Clone)]
#[command(name = "expiryrun", version, about)]
pub struct Args {
    /// Configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write an example configuration file and exit
    #[arg(long = "config-example", value_name = "FILE")]
    pub config_example: Option<PathBuf>,

    /// Initialise the database schema and exit
    #[arg(long = "db-init")]
    pub db_init: bool,

    /// Test the SMTP relay connection and exit
    #[arg(long = "smtp-check")]
    pub smtp_check: bool,

    /// Override the configured warning thresholds (days before expiry,
    /// ascending, comma separated)
    #[arg(long = "warning-days", value_name = "DAYS", value_delimiter = ',')]
    pub warning_days: Option<Vec<i64>>,

    /// Override the warning template file
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Maximum number of emails to send per run
    #[arg(long = "message-limit", env = "EMAIL_LIMIT", value_name = "N")]
    pub message_limit: Option<usize>,
}
