//! Products API routes

use axum::Router;
use domain_products::{LocalImageStore, PgProductRepository, ProductService, handlers};

use crate::state::AppState;

/// Create products router
pub fn router(state: &AppState) -> Router {
    let uploads = &state.config.uploads;
    let repository = PgProductRepository::new(state.db.clone());
    let images = LocalImageStore::new(uploads.clone());
    let service = ProductService::new(repository, images);
    handlers::router(service, uploads)
}
