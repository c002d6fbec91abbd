//! PostgreSQL connectivity for the catalog services
//!
//! - [`postgres`]: pool configuration, connect with retry, health checks, migration runner
//! - [`retry`]: exponential backoff used while the database is still coming up
//!
//! ```ignore
//! use database::postgres::{self, PostgresConfig};
//! use core_config::FromEnv;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "catalog_api").await?;
//! ```

pub mod error;
pub mod postgres;
pub mod retry;

pub use error::{DatabaseError, DatabaseResult};
pub use retry::RetryConfig;
