//! pixstore: verified image uploads into a versioned bucket, with metadata in PostgreSQL.
//!
//! Configuration comes from `STORAGE_*` and `DB_*` environment variables (a `.env` file is
//! loaded when present).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pixstore_cli::{
    database_config_from_vars, init_tracing, print_json, report_error, storage_config_from_vars,
    upload_filename,
};
use pixstore_core::constants::{DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_OFFSET};
use pixstore_core::models::{CreateImage, Pagination};
use pixstore_core::{AppError, Config};
use pixstore_db::{setup_database, ImageRepository};
use pixstore_processing::{UploadRequest, Uploader};
use pixstore_storage::{create_storage, ensure_bucket};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "pixstore", about = "Verified image uploads to versioned object storage")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the configured bucket if missing and enable versioning
    Bootstrap,
    /// Upload an image and record its metadata
    Upload {
        /// Path to the image file
        file: PathBuf,
        /// Store under this name instead of the file's own
        #[arg(long)]
        name: Option<String>,
        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List recorded images
    List {
        /// Maximum number of items
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: u32,
        /// Offset for pagination
        #[arg(long, default_value_t = DEFAULT_PAGE_OFFSET)]
        offset: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, cancelling");
                cancel.cancel();
            }
        });
    }

    match run(cli.command, &cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    Config::from_env()
        .map_err(|e| AppError::Config(format!("{:#}", e)))
        .context("Failed to load configuration")
}

async fn run(command: Commands, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        Commands::Bootstrap => {
            dotenvy::dotenv().ok();
            let config = storage_config_from_vars(std::env::vars())?;

            let storage = create_storage(&config)
                .await
                .context("Failed to create storage backend")?;
            let created = ensure_bucket(storage.as_ref(), &config.bucket, &config.region)
                .await
                .context("Failed to bootstrap bucket")?;

            tracing::info!(bucket = %config.bucket, created, "Bucket ready with versioning enabled");
        }

        Commands::Upload { file, name, tags } => {
            let config = load_config()?;
            let filename = upload_filename(&file, name.as_deref())
                .with_context(|| format!("{} has no file name", file.display()))?;

            let pool = setup_database(&config.database).await?;
            let repo = ImageRepository::new(pool);

            let storage = create_storage(&config.storage)
                .await
                .context("Failed to create storage backend")?;
            let uploader = Uploader::new(storage, config.bucket());

            let request = UploadRequest::from_path(&file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?
                .with_filename(filename);

            let upload = uploader
                .upload(request, cancel)
                .await
                .map_err(AppError::from)?;

            let image = repo
                .create(&CreateImage::from_upload(&upload, tags), cancel)
                .await
                .map_err(AppError::from)
                .with_context(|| format!("Uploaded {} but failed to record it", upload.key))?;

            print_json(&image)?;
        }

        Commands::List { limit, offset } => {
            dotenvy::dotenv().ok();
            let config = database_config_from_vars(std::env::vars())?;
            let pool = setup_database(&config).await?;
            let repo = ImageRepository::new(pool);

            let images = repo
                .find_all(Pagination::new(limit, offset), cancel)
                .await
                .map_err(AppError::from)?;

            print_json(&images)?;
        }
    }

    Ok(())
}
