use std::path::Path;

use anyhow::Context;
use pixstore_core::{AppError, DatabaseConfig, ErrorMetadata, LogLevel, StorageConfig};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "pixstore=info";

/// Initialize tracing for the CLI; `RUST_LOG` overrides the default filter.
pub fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Object-store settings only, from `STORAGE_*` variables in `vars`.
pub fn storage_config_from_vars<I>(vars: I) -> anyhow::Result<StorageConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    StorageConfig::from_vars(vars)
        .and_then(|config| config.validate().map(|_| config))
        .map_err(|e| AppError::Config(format!("{:#}", e)))
        .context("Failed to load storage configuration")
}

/// Database settings only, from `DB_*` variables in `vars`.
pub fn database_config_from_vars<I>(vars: I) -> anyhow::Result<DatabaseConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    DatabaseConfig::from_vars(vars)
        .and_then(|config| config.validate().map(|_| config))
        .map_err(|e| AppError::Config(format!("{:#}", e)))
        .context("Failed to load database configuration")
}

/// Filename to upload `path` under: its own file name, or `name` plus the file's extension.
pub fn upload_filename(path: &Path, name: Option<&str>) -> Option<String> {
    match name {
        Some(name) => match path.extension() {
            Some(ext) => Some(format!("{}.{}", name, ext.to_string_lossy())),
            None => Some(name.to_string()),
        },
        None => path
            .file_name()
            .map(|file_name| file_name.to_string_lossy().into_owned()),
    }
}

/// Log a failed command at the level its error kind calls for and print a short message.
pub fn report_error(err: &anyhow::Error) {
    let Some(app_err) = err.downcast_ref::<AppError>() else {
        tracing::error!(error = %format!("{:#}", err), "Command failed");
        eprintln!("error: {:#}", err);
        return;
    };

    let code = app_err.error_code();
    let recoverable = app_err.is_recoverable();
    let details = app_err.detailed_message();
    match app_err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(code, recoverable, error = %details, "Command failed")
        }
        LogLevel::Warn => tracing::warn!(code, recoverable, error = %details, "Command failed"),
        LogLevel::Error => {
            tracing::error!(code, recoverable, error = %details, "Command failed")
        }
    }

    eprintln!("error [{}]: {}", code, app_err.client_message());
}
