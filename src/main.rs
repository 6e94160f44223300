// ExpiryRun - Certificate expiration notification mailer

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use expiryrun::config::MailerConfig;
use expiryrun::db::MailerDatabase;
use expiryrun::mailer::{
    ExpirationMailer, MailTransport, NotificationDispatcher, SmtpMailer, WarningTemplate,
    WarningThresholds,
};
use expiryrun::Args;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging - respect RUST_LOG environment variable
    let log_level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    // Parse command line arguments
    let args = Args::parse();

    // Handle --config-example (generate example config and exit)
    if let Some(path) = &args.config_example {
        MailerConfig::create_example(path)?;
        println!("✓ Example configuration saved to: {}", path.display());
        return Ok(());
    }

    // Load configuration
    let mut config = match &args.config {
        Some(path) => MailerConfig::from_file(path)?,
        None => MailerConfig::default(),
    };

    // Apply CLI overrides
    if let Some(days) = &args.warning_days {
        config.mailer.warning_days = days.clone();
    }
    if let Some(limit) = args.message_limit {
        config.mailer.message_limit = Some(limit);
    }
    if let Some(template) = &args.template {
        config.mailer.template_path = Some(template.clone());
    }

    let transport = SmtpMailer::new(config.smtp.clone())?;

    // Handle --smtp-check (test the relay and exit)
    if args.smtp_check {
        info!("Testing SMTP relay {}:{}", config.smtp.server, config.smtp.port);
        match transport.test_connection().await {
            Ok(()) => {
                println!("✓ SMTP relay {} reachable", config.smtp.server);
                return Ok(());
            }
            Err(e) => {
                println!("✗ SMTP relay {} unreachable: {}", config.smtp.server, e);
                return Err(e);
            }
        }
    }

    // Configure database (runs migrations)
    let db = MailerDatabase::new(&config.database).await?;

    // Handle --db-init (schema is initialised above, report and exit)
    if args.db_init {
        println!("✓ Database schema initialised");
        db.close().await;
        return Ok(());
    }

    let thresholds = WarningThresholds::new(config.mailer.warning_days.clone())?;

    // Load warning template
    let template = match &config.mailer.template_path {
        Some(path) => WarningTemplate::from_file(path)?,
        None => WarningTemplate::default_template()?,
    };

    let dispatcher = NotificationDispatcher::new(Box::new(transport), template);
    let mailer = ExpirationMailer::new(thresholds, dispatcher)
        .with_policy(config.mailer.dispatch_error_policy)
        .with_advance_without_contacts(config.mailer.advance_without_contacts)
        .with_message_limit(config.mailer.message_limit);

    info!("Starting expiration mailer");
    let summary = mailer.run(&db, Utc::now()).await?;
    db.close().await;

    println!("\n{}", "Expiration mailer run complete".bold());
    println!("  Windows scanned:       {}", summary.windows_scanned);
    println!("  Windows skipped:       {}", summary.windows_skipped);
    println!("  Certificates examined: {}", summary.certificates_examined);
    println!("  Certificates notified: {}", summary.certificates_notified);
    println!("  Messages sent:         {}", summary.messages_sent);
    if summary.dispatch_failures > 0 || summary.nag_commit_failures > 0 {
        println!(
            "  {}",
            format!(
                "Failures: {} dispatch, {} state commit",
                summary.dispatch_failures, summary.nag_commit_failures
            )
            .red()
        );
    }

    Ok(())
}
