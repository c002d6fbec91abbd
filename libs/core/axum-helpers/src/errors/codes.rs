//! Error codes carried in every error body.
//!
//! Each code has a string form for clients (`"VALIDATION_ERROR"`), an integer
//! form for logs and dashboards (`1001`) and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::InvalidId;
//! assert_eq!(code.as_str(), "INVALID_ID");
//! assert_eq!(code.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request field or query parameter failed validation
    ValidationError,

    /// Path id is not a valid integer
    InvalidId,

    /// Malformed multipart body
    MultipartError,

    /// Requested resource was not found
    NotFound,

    /// An unexpected internal server error occurred
    InternalError,

    /// Uploaded file is not an acceptable image
    InvalidImage,

    /// HTTP method not supported by the route
    MethodNotAllowed,

    // Database errors (2000-2999)
    /// Query or connection failure
    DatabaseError,

    /// No pooled connection became available in time
    DatabasePoolTimeout,

    // Migration errors (3000s)
    /// Database migration failed
    MigrationError,

    // Storage errors (4000s)
    /// File system I/O error
    StorageError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidId => "INVALID_ID",
            Self::MultipartError => "MULTIPART_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::InvalidImage => "INVALID_IMAGE",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabasePoolTimeout => "DATABASE_POOL_TIMEOUT",
            Self::MigrationError => "MIGRATION_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// - 1000-1999: client errors
    /// - 2000-2999: database errors
    /// - 3000-3999: migration errors
    /// - 4000-4999: storage errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidId => 1002,
            Self::MultipartError => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::InvalidImage => 1006,
            Self::MethodNotAllowed => 1007,

            Self::DatabaseError => 2001,
            Self::DatabasePoolTimeout => 2013,

            Self::MigrationError => 3001,

            Self::StorageError => 4001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidId => "Invalid id format",
            Self::MultipartError => "Malformed multipart request",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::InvalidImage => "Uploaded file is not an acceptable image",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::DatabaseError => "Database error occurred",
            Self::DatabasePoolTimeout => "Database connection pool timed out",
            Self::MigrationError => "Migration error",
            Self::StorageError => "Storage error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::InvalidId.as_str(), "INVALID_ID");
        assert_eq!(ErrorCode::StorageError.as_str(), "STORAGE_ERROR");
    }

    #[test]
    fn test_error_code_ranges() {
        assert_eq!(ErrorCode::NotFound.code(), 1004);
        assert_eq!(ErrorCode::DatabaseError.code(), 2001);
        assert_eq!(ErrorCode::MigrationError.code(), 3001);
        assert_eq!(ErrorCode::StorageError.code(), 4001);
    }

    #[test]
    fn test_error_code_display_matches_serde() {
        let json = serde_json::to_string(&ErrorCode::InvalidImage).unwrap();
        assert_eq!(json, format!("\"{}\"", ErrorCode::InvalidImage));

        let parsed: ErrorCode = serde_json::from_str("\"MULTIPART_ERROR\"").unwrap();
        assert_eq!(parsed, ErrorCode::MultipartError);
    }
}
