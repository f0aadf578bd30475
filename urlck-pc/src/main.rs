//! urlck-pc - Product catalog URL data integrity checks
//!
//! Read-only command-line front end: resolves configuration, opens the
//! catalog database, runs one checker and prints its report. Any failure
//! is reported as a single error line and exit code 1; no partial report
//! is ever printed.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use urlck_common::config::{resolve_database_path, TomlConfig};
use urlck_common::db::connect_readonly;
use urlck_pc::report::{self, ReportFormat};
use urlck_pc::source::{CatalogDataSource, SqliteCatalogSource};
use urlck_pc::{Checker, UrlKeyChecker, UrlPathChecker};

/// Command-line arguments for urlck-pc
#[derive(Parser, Debug)]
#[command(name = "urlck-pc")]
#[command(about = "URL data integrity checks for a multi-store product catalog")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Catalog SQLite database
    #[arg(short, long, value_name = "FILE")]
    database: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,

    /// Log level or filter directive (overrides RUST_LOG and the config file)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: CheckCommand,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum CheckCommand {
    /// Checks data integrity of the values of the url_key product attribute
    UrlKey,
    /// Checks data integrity of the values of the url_path product attribute
    UrlPath,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // The config file also carries the log level, so it is read before
    // tracing is up; its own errors still end up on stderr below.
    let loaded = TomlConfig::load(args.config.as_deref());

    let level = loaded
        .as_ref()
        .map(|(c, _)| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_tracing(args.log_level.as_deref(), &level);

    info!(
        "Starting urlck-pc v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let result = match loaded {
        Ok((config, source)) => {
            source.log();
            run(&args, &config).await
        }
        Err(e) => Err(anyhow::Error::new(e).context("Failed to load configuration")),
    };

    match result {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Check aborted: {:#}", e);
            eprintln!("An unexpected error occurred: '{:#}'", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli_level: Option<&str>, config_level: &str) {
    let filter = match cli_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level)),
    };

    // stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: &Args, config: &TomlConfig) -> Result<String> {
    let db_path = resolve_database_path(args.database.as_deref(), config);
    info!("Database path: {}", db_path.display());

    let pool = connect_readonly(&db_path)
        .await
        .context("Failed to open catalog database")?;

    let source: Arc<dyn CatalogDataSource> = Arc::new(SqliteCatalogSource::new(pool.clone()));
    let checker: Box<dyn Checker> = match args.command {
        CheckCommand::UrlKey => Box::new(UrlKeyChecker::new(source, &config.attributes.url_key)),
        CheckCommand::UrlPath => Box::new(UrlPathChecker::new(source, &config.attributes.url_path)),
    };

    info!("Running {}: {}", checker.name(), checker.description());
    let records = checker.check().await?;
    pool.close().await;

    Ok(report::render(&records, args.format)?)
}
