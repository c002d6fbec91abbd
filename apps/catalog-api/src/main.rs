//! Catalog API - product catalog REST server

use axum_helpers::server::{close_postgres, create_production_app, create_router};
use axum_helpers::parse_allowed_origins;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!(app = config.app.name, version = config.app.version, "Starting");

    let db = connect_from_config_with_retry(config.database.clone(), None).await?;

    if config.run_migrations {
        run_migrations::<Migrator>(&db, config.app.name).await?;
    } else {
        info!("RUN_MIGRATIONS=false, skipping migrations");
    }

    tokio::fs::create_dir_all(&config.uploads.dir).await?;
    info!(
        dir = %config.uploads.dir.display(),
        prefix = %config.uploads.public_prefix,
        max_bytes = config.uploads.max_bytes,
        "Serving uploaded images"
    );

    let state = AppState {
        config: config.clone(),
        db,
    };

    let allowed_origins = parse_allowed_origins(&config.cors_allowed_origin)?;
    let router = create_router::<openapi::ApiDoc>(
        api::routes(&state),
        api::public_routes(&state),
        allowed_origins,
    )?;

    info!("Catalog API listening on {}", config.server.address());

    create_production_app(router, &config.server, Duration::from_secs(30), async move {
        close_postgres(state.db, "catalog").await;
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
