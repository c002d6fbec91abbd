//! Products Domain
//!
//! Catalog products stored in PostgreSQL, with images kept in a content
//! directory and referenced by their public path.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart form intake
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Validation, image staging, list assembly
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼───┐ ┌─▼──────────┐
//! │ Repo │ │ ImageStore │  ← PostgreSQL / in-memory, local filesystem
//! └──────┘ └────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use core_config::uploads::UploadConfig;
//! use domain_products::{handlers, LocalImageStore, PgProductRepository, ProductService};
//! use sea_orm::DatabaseConnection;
//!
//! fn routes(db: DatabaseConnection) -> axum::Router {
//!     let uploads = UploadConfig::default();
//!     let service = ProductService::new(
//!         PgProductRepository::new(db),
//!         LocalImageStore::new(uploads.clone()),
//!     );
//!     handlers::router(service, &uploads)
//! }
//! ```

pub mod entity;
pub mod error;
pub mod filter;
pub mod form;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use filter::{
    AppliedFilters, ListProductsParams, Pagination, ProductFilter, ProductPage, ProductQuery,
};
pub use form::ProductForm;
pub use handlers::ApiDoc;
pub use models::{CreateProduct, DeleteResponse, Product, ProductInput, UpdateProduct};
pub use postgres::PgProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
pub use storage::{ImageStore, ImageUpload, LocalImageStore};
