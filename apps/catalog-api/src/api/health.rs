//! Readiness endpoint

use axum::{Router, extract::State, response::IntoResponse, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health;

use crate::state::AppState;

/// Database reachable and content directory present.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let db = state.db.clone();
    let dir = state.config.uploads.dir.clone();

    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async move { check_health(&db).await.map_err(|e| e.to_string()) }),
        ),
        (
            "uploads",
            Box::pin(async move {
                match tokio::fs::metadata(&dir).await {
                    Ok(meta) if meta.is_dir() => Ok(()),
                    Ok(_) => Err(format!("{} is not a directory", dir.display())),
                    Err(e) => Err(format!("{}: {}", dir.display(), e)),
                }
            }),
        ),
    ];

    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/ready", get(ready)).with_state(state)
}
