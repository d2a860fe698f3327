use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::fixtures::Fixtures;
use crate::database::DatabaseManager;

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[arg(help = "YAML fixture file (see fixtures/blog.yaml)")]
    pub file: PathBuf,
}

pub async fn handle(args: SeedArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config();
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL must be set to seed; use `serve --seed` for the in-memory store");
    }

    let fixtures = Fixtures::from_file(&args.file).with_context(|| format!("failed to read {}", args.file.display()))?;
    let store = DatabaseManager::store(&config.database).await?;
    let summary = fixtures.load(store.as_ref(), config.auth.bcrypt_cost).await?;

    let mut details = Map::new();
    details.insert("permissions".to_string(), Value::from(summary.permissions));
    details.insert("categories".to_string(), Value::from(summary.categories));
    details.insert("users".to_string(), Value::from(summary.users));
    details.insert("articles".to_string(), Value::from(summary.articles));
    output_format.success(&format!("Seeded from {}", args.file.display()), details)
}
