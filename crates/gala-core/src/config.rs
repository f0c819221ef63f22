//! Configuration module
//!
//! This module provides the application configuration, loaded from the
//! environment (with `.env` support via dotenvy). All variables use the
//! `GALA_` prefix except the conventional `DATABASE_URL` and AWS settings,
//! which keep their standard names so existing tooling works unchanged.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_URL_TTL_SECS: u64 = 3600;
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Object storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    S3,
    Memory,
}

impl StorageBackend {
    pub fn parse(s: &str) -> Result<Self, anyhow::Error> {
        match s.to_lowercase().as_str() {
            "s3" => Ok(StorageBackend::S3),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown storage backend '{}': expected 's3' or 'memory'",
                other
            )),
        }
    }
}

/// Metadata store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataBackend {
    Postgres,
    Memory,
}

impl MetadataBackend {
    pub fn parse(s: &str) -> Result<Self, anyhow::Error> {
        match s.to_lowercase().as_str() {
            "postgres" => Ok(MetadataBackend::Postgres),
            "memory" => Ok(MetadataBackend::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown metadata backend '{}': expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    // Metadata store
    pub metadata_backend: MetadataBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    // Object storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    // Presigned URL validity windows
    pub upload_url_ttl_secs: u64,
    pub download_url_ttl_secs: u64,
    // Listing page sizes
    pub default_page_size: i64,
    pub max_page_size: i64,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let server_port = env_parse("GALA_SERVER_PORT", DEFAULT_SERVER_PORT)?;

        let cors_origins = env::var("GALA_CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("GALA_ENVIRONMENT")
            .or_else(|_| env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "development".to_string());

        let metadata_backend = MetadataBackend::parse(
            &env::var("GALA_METADATA_BACKEND").unwrap_or_else(|_| "postgres".to_string()),
        )?;
        let database_url = env::var("DATABASE_URL").ok();
        if metadata_backend == MetadataBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL is required when GALA_METADATA_BACKEND=postgres");
        }

        let storage_backend = StorageBackend::parse(
            &env::var("GALA_STORAGE_BACKEND").unwrap_or_else(|_| "s3".to_string()),
        )?;
        let s3_bucket = env::var("GALA_S3_BUCKET").ok();
        if storage_backend == StorageBackend::S3 && s3_bucket.is_none() {
            anyhow::bail!("GALA_S3_BUCKET is required when GALA_STORAGE_BACKEND=s3");
        }
        let s3_region = env::var("AWS_REGION")
            .or_else(|_| env::var("GALA_S3_REGION"))
            .ok();
        let s3_endpoint = env::var("GALA_S3_ENDPOINT").ok();

        Ok(Config {
            server_port,
            cors_origins,
            environment,
            metadata_backend,
            database_url,
            db_max_connections: env_parse("GALA_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            storage_backend,
            s3_bucket,
            s3_region,
            s3_endpoint,
            upload_url_ttl_secs: env_parse("GALA_UPLOAD_URL_TTL_SECS", DEFAULT_URL_TTL_SECS)?,
            download_url_ttl_secs: env_parse("GALA_DOWNLOAD_URL_TTL_SECS", DEFAULT_URL_TTL_SECS)?,
            default_page_size: env_parse("GALA_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_page_size: env_parse("GALA_MAX_PAGE_SIZE", MAX_PAGE_SIZE)?,
        })
    }

    /// A configuration suitable for tests and local experiments: memory
    /// backends, permissive CORS, default TTLs and page sizes.
    pub fn for_memory_backends() -> Self {
        Config {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
            metadata_backend: MetadataBackend::Memory,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            storage_backend: StorageBackend::Memory,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            upload_url_ttl_secs: DEFAULT_URL_TTL_SECS,
            download_url_ttl_secs: DEFAULT_URL_TTL_SECS,
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
