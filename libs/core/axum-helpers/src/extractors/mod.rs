//! Extractors shared by the API routers.

pub mod id_path;

pub use id_path::IdPath;
