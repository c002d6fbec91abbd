//! API routes module

pub mod health;
pub mod products;

use axum::Router;
use axum_helpers::health_router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Routes nested under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/products", products::router(state))
}

/// Routes merged at the root: probes and the uploaded images
pub fn public_routes(state: &AppState) -> Router {
    let uploads = &state.config.uploads;

    Router::new()
        .merge(health_router(state.config.app))
        .merge(health::router(state.clone()))
        .nest_service(&uploads.public_prefix, ServeDir::new(&uploads.dir))
}
