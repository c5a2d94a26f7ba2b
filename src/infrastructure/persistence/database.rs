use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tokio::fs;
use tracing::info;

/// Start/stop hooks for collaborators owned by the server process
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Verify the collaborator is reachable
    async fn ping(&self) -> Result<()>;

    /// Release held resources
    async fn close(&self);
}

/// Database connection, established once at startup.
///
/// The prediction path never touches it; it only has to be reachable
/// when the process starts.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
    url: String,
}

impl Database {
    pub async fn connect(db_url: &str) -> Result<Self> {
        // Ensure the directory exists if it's a file path
        if let Some(path_part) = db_url.strip_prefix("sqlite://") {
            let path = Path::new(path_part);
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
                && !parent.exists()
            {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::from_str(db_url)
            .with_context(|| format!("Invalid DATABASE_URL: {}", db_url))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Could not connect to database")?;

        let db = Self {
            pool,
            url: db_url.to_string(),
        };
        db.ping().await?;

        info!("Successfully connected to database: {}", db_url);
        Ok(db)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Lifecycle for Database {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }

    async fn close(&self) {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("Database connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_connect_and_close() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        assert_eq!(db.url(), "sqlite::memory:");
        tokio_test::assert_ok!(db.ping().await);

        db.close().await;
        assert!(db.pool.is_closed());
        assert!(db.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_file_database_creates_directory() {
        let dir = std::env::temp_dir().join(format!("riskscan-db-{}", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}/riskscan.db", dir.display());

        let db = Database::connect(&url).await.unwrap();
        assert!(dir.exists());
        db.close().await;

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_invalid_url_fails() {
        assert!(Database::connect("postgres://nowhere").await.is_err());
    }
}
