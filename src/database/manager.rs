use std::sync::Arc;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::store::{Store, StoreError};

/// Builds the store the server runs against.
///
/// With a `DATABASE_URL` the store is PostgreSQL (migrations applied on
/// connect); without one everything lives in memory for the lifetime of the
/// process.
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Connected to database at {}", Self::redacted_url(url));
        Ok(pool)
    }

    pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pick the store implementation according to configuration
    pub async fn store(config: &DatabaseConfig) -> Result<Arc<dyn Store>, StoreError> {
        let Some(url) = config.url.as_deref() else {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on exit)");
            return Ok(Arc::new(MemoryStore::new()));
        };

        let pool = Self::connect(url, config).await?;
        if config.run_migrations {
            Self::migrate(&pool).await?;
        }
        Ok(Arc::new(PgStore::new(pool)))
    }

    /// Connection URL with the password masked, for logs
    pub fn redacted_url(raw: &str) -> String {
        match url::Url::parse(raw) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("****"));
                }
                parsed.to_string()
            }
            Err(_) => "<invalid database url>".to_string(),
        }
    }
}
