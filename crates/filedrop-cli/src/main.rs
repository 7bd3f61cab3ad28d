//! Filedrop CLI: manage stored files and run the expiry reaper.
//!
//! Reads its configuration from the environment (DATABASE_URL, STORAGE_PATH, ...).

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use filedrop_cli::{
    bootstrap, error_body, expiry_after, parse_sort_direction, parse_sort_field, share_duration,
    App,
};
use filedrop_core::constants::DEFAULT_SHARE_DURATION_HOURS;
use filedrop_core::models::{FileSearchParams, SortDirection, SortField};
use filedrop_core::Config;
use filedrop_infra::init_telemetry;
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "filedrop", about = "File storage with expiring uploads and share links")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a local file
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Owner UUID
        #[arg(long)]
        owner: Uuid,
        /// Stored name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
        /// Remove the file this many seconds after upload
        #[arg(long)]
        expires_in: Option<i64>,
    },
    /// Get a file's metadata by ID
    Get {
        /// File UUID
        id: Uuid,
        /// Bypass the metadata cache
        #[arg(long)]
        no_cache: bool,
    },
    /// List all files of an owner, newest first
    List {
        #[arg(long)]
        owner: Uuid,
    },
    /// Search an owner's files
    Search {
        #[arg(long)]
        owner: Uuid,
        /// Case-insensitive substring of the file name
        #[arg(long)]
        query: Option<String>,
        /// File type (extension), e.g. pdf
        #[arg(long = "type")]
        file_type: Option<String>,
        /// Only files created at or after this RFC 3339 timestamp
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Only files created at or before this RFC 3339 timestamp
        #[arg(long)]
        to: Option<DateTime<Utc>>,
        /// Sort field: name, size, type, created_at, updated_at
        #[arg(long, value_parser = parse_sort_field)]
        sort: Option<SortField>,
        /// Sort direction: asc or desc
        #[arg(long, value_parser = parse_sort_direction)]
        dir: Option<SortDirection>,
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
    },
    /// Create a share link for a file
    Share {
        /// File UUID
        id: Uuid,
        /// Requesting owner UUID
        #[arg(long)]
        owner: Uuid,
        /// Link lifetime in hours
        #[arg(long, default_value_t = DEFAULT_SHARE_DURATION_HOURS)]
        hours: i64,
    },
    /// Resolve a share token to its file
    OpenShare {
        token: String,
    },
    /// Run one expiry sweep and exit
    Sweep,
    /// Run the expiry reaper until interrupted
    Run,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    init_telemetry(config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    let app = bootstrap(&config).await?;

    if let Err(err) = execute(&app, &config, cli.command).await {
        eprintln!("{}", serde_json::to_string_pretty(&error_body(&err))?);
        std::process::exit(1);
    }

    Ok(())
}

async fn execute(app: &App, config: &Config, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Upload {
            file,
            owner,
            name,
            expires_in,
        } => {
            let name = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .context("Upload path has no file name")?,
            };
            let handle = tokio::fs::File::open(&file)
                .await
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let size = handle.metadata().await?.len() as i64;
            let expires_at = expires_in
                .map(|secs| expiry_after(Utc::now(), secs))
                .transpose()?;

            let created = app
                .files
                .upload_with_expiry(owner, &name, Box::pin(handle), size, expires_at)
                .await?;
            print_json(&created)?;
        }
        Commands::Get { id, no_cache } => {
            let file = if no_cache {
                app.files.get_file_uncached(id).await?
            } else {
                app.files.get_file(id).await?
            };
            print_json(&file)?;
        }
        Commands::List { owner } => {
            let files = app.files.get_files(owner).await?;
            print_json(&files)?;
        }
        Commands::Search {
            owner,
            query,
            file_type,
            from,
            to,
            sort,
            dir,
            limit,
            offset,
        } => {
            let params = FileSearchParams {
                query,
                file_type,
                created_from: from,
                created_to: to,
                sort_by: sort,
                sort_dir: dir,
                limit,
                offset,
            };
            let files = app.files.search_files(owner, &params).await?;
            print_json(&files)?;
        }
        Commands::Share { id, owner, hours } => {
            let url = app
                .files
                .share_file(id, owner, share_duration(hours)?)
                .await?;
            print_json(&serde_json::json!({ "url": url }))?;
        }
        Commands::OpenShare { token } => {
            let file = app.files.open_share_link(&token).await?;
            print_json(&file)?;
        }
        Commands::Sweep => {
            let report = app.reaper.sweep().await?;
            print_json(&report)?;
        }
        Commands::Run => {
            if !config.reaper_enabled {
                tracing::warn!("Expiry reaper disabled (REAPER_ENABLED=false), nothing to run");
                return Ok(());
            }

            let shutdown = CancellationToken::new();
            let handle = app.reaper.clone().start(shutdown.clone());

            shutdown_signal().await?;
            shutdown.cancel();
            handle.await.context("Expiry reaper task panicked")?;
            tracing::info!("Expiry reaper stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C (SIGINT) or SIGTERM.
async fn shutdown_signal() -> anyhow::Result<()> {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    let mut sigterm =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?;
    #[cfg(unix)]
    let terminate = async {
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = ctrl_c => {
            result.context("Failed to listen for Ctrl+C")?;
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
