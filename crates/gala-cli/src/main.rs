//! Gala CLI — command-line client for the Gala gallery API.
//!
//! Set GALA_API_URL (or API_URL) to point at the server.

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use gala_api_client::{ApiClient, PendingFile, Uploader};
use gala_cli::{content_type_for, format_size, init_tracing};

#[derive(Parser)]
#[command(name = "gala", about = "Gala gallery CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload photos or videos as a named guest
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<std::path::PathBuf>,
        /// Guest display name to attribute the uploads to
        #[arg(long)]
        guest: String,
        /// Retry attempts per file (each retry restarts the full protocol)
        #[arg(long, default_value = "3")]
        attempts: u32,
    },
    /// List the gallery
    List {
        /// Page size
        #[arg(long, default_value = "20")]
        limit: i64,
        /// Continuation cursor from a previous page
        #[arg(long)]
        cursor: Option<String>,
        /// Walk all pages instead of fetching one
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let api = ApiClient::from_env()?;

    match cli.command {
        Commands::Upload {
            files,
            guest,
            attempts,
        } => upload(api, files, guest, attempts).await,
        Commands::List { limit, cursor, all } => list(api, limit, cursor, all).await,
    }
}

async fn upload(
    api: ApiClient,
    files: Vec<std::path::PathBuf>,
    guest: String,
    attempts: u32,
) -> anyhow::Result<()> {
    let uploader = Uploader::new(api);

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for path in files {
        let data = std::fs::read(&path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("File has no printable name")?
            .to_string();

        let pending = PendingFile {
            content_type: content_type_for(&file_name).to_string(),
            bytes: Bytes::from(data),
            guest_name: guest.clone(),
            file_name: file_name.clone(),
        };

        match uploader.upload_with_retries(&pending, attempts).await {
            Ok(media) => {
                succeeded += 1;
                println!(
                    "uploaded {} ({}) as {}",
                    file_name,
                    format_size(media.size),
                    media.media_id
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("failed {}: {}", file_name, e);
            }
        }
    }

    println!("{} uploaded, {} failed", succeeded, failed);
    if succeeded == 0 && failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

async fn list(
    api: ApiClient,
    limit: i64,
    cursor: Option<String>,
    all: bool,
) -> anyhow::Result<()> {
    if all {
        let media = api.list_all_media(limit).await?;
        for item in &media {
            print_item(item);
        }
        println!("{} items", media.len());
        return Ok(());
    }

    let page = api.list_media(cursor.as_deref(), Some(limit)).await?;
    for item in &page.media {
        print_item(item);
    }
    println!(
        "{} of {} items{}",
        page.media.len(),
        page.total,
        if page.has_more { " (more available)" } else { "" }
    );
    if let Some(next) = page.next_cursor {
        println!("next cursor: {}", next);
    }
    Ok(())
}

fn print_item(item: &gala_api_client::MediaView) {
    println!(
        "{}  {}  {:>10}  {}  by {}",
        item.uploaded_at.format("%Y-%m-%d %H:%M:%S"),
        serde_json::to_value(item.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "image".to_string()),
        format_size(item.size),
        item.name,
        item.guest_name
    );
}
