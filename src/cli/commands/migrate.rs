use anyhow::Context;

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let database = &config().database;
    let url = database
        .url
        .as_deref()
        .context("DATABASE_URL must be set to run migrations")?;

    let pool = DatabaseManager::connect(url, database).await?;
    DatabaseManager::migrate(&pool).await?;

    let mut details = serde_json::Map::new();
    details.insert("database".to_string(), DatabaseManager::redacted_url(url).into());
    output_format.success("Migrations applied", details)
}
