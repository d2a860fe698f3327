use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::config::config;
use crate::database::fixtures::Fixtures;
use crate::database::DatabaseManager;
use crate::state::AppState;

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Load this YAML fixture file before serving")]
    pub seed: Option<PathBuf>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let config = config().clone();
    tracing::info!("Starting Blog API in {:?} mode", config.environment);
    if crate::is_production!() && config.database.url.is_none() {
        tracing::warn!("Running in production without DATABASE_URL; nothing will be persisted");
    }

    let store = DatabaseManager::store(&config.database)
        .await
        .context("failed to initialise the store")?;

    if let Some(path) = &args.seed {
        let fixtures = Fixtures::from_file(path).with_context(|| format!("failed to read {}", path.display()))?;
        fixtures
            .load(store.as_ref(), config.auth.bcrypt_cost)
            .await
            .context("failed to load fixtures")?;
    }

    let port = args.port.unwrap_or(config.server.port);
    let app = crate::app(AppState::new(store, config));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Blog API listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
