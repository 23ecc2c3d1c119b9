//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kasir POS                              │
//! │                                                                         │
//! │  Command Function → Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ├── Domain error?  ── CoreError::InsufficientStock ──┐          │
//! │         ├── Storage error? ── DbError::QueryFailed("...")  ──┤          │
//! │         ├── Config error?  ── ConfigError::InvalidValue    ──┤          │
//! │         │                                                    ▼          │
//! │         │                                                ApiError       │
//! │         │                                                    │          │
//! │         ▼                                                    ▼          │
//! │  stdout: JSON result                      stderr: {"code","message"}   │
//! │  exit 0                                   exit 1                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Storage details are logged, not printed: callers only see a generic
//! `STORAGE_FAILURE` message.

use serde::Serialize;

use crate::config::ConfigError;
use kasir_core::{CoreError, ErrorKind};
use kasir_db::DbError;

/// Error printed when a command fails.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for product 2: available 20, requested 21"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed or empty checkout input
    InvalidInput,

    ProductNotFound,

    InsufficientStock,

    InvalidDateFormat,

    /// Range end not after start
    InvalidDateRange,

    /// Report window held no sales
    NoTransactions,

    /// Looked-up record does not exist
    NotFound,

    /// Anything the store reported unexpectedly
    StorageFailure,

    /// Environment configuration rejected
    ConfigError,
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidInput => ErrorCode::InvalidInput,
            ErrorKind::ProductNotFound => ErrorCode::ProductNotFound,
            ErrorKind::InsufficientStock => ErrorCode::InsufficientStock,
            ErrorKind::InvalidDateFormat => ErrorCode::InvalidDateFormat,
            ErrorKind::InvalidDateRange => ErrorCode::InvalidDateRange,
            ErrorKind::NoTransactions => ErrorCode::NoTransactions,
            ErrorKind::StorageFailure => ErrorCode::StorageFailure,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    /// Creates a storage failure.
    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageFailure, message)
    }

    /// Renders the error as one JSON line.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":"STORAGE_FAILURE","message":{:?}}}"#, self.message)
        })
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError::new(err.kind().into(), err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => e.into(),
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::storage("Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::storage("Database migration failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::storage("Database transaction failed")
            }
            DbError::PoolExhausted => ApiError::storage("Database pool exhausted"),
            other => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", other);
                ApiError::storage("Database operation failed")
            }
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_domain_errors_keep_kind_and_message() {
        let err: ApiError = DbError::from(CoreError::InsufficientStock {
            product_id: 2,
            available: 20,
            requested: 21,
        })
        .into();

        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(
            err.to_json(),
            r#"{"code":"INSUFFICIENT_STOCK","message":"Insufficient stock for product 2: available 20, requested 21"}"#
        );
    }

    #[test]
    fn test_every_domain_kind_has_a_code() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let cases = [
            (CoreError::ProductNotFound(9), "PRODUCT_NOT_FOUND"),
            (CoreError::invalid_date("15-01-2024"), "INVALID_DATE_FORMAT"),
            (
                CoreError::InvalidDateRange { start: day, end: day },
                "INVALID_DATE_RANGE",
            ),
            (
                CoreError::NoTransactions { start: day, end: day },
                "NO_TRANSACTIONS",
            ),
        ];

        for (core, code) in cases {
            let json = serde_json::to_value(ApiError::from(core)).unwrap();
            assert_eq!(json["code"], code);
        }
    }

    #[test]
    fn test_storage_errors_hide_details() {
        let err = ApiError::from(DbError::QueryFailed("no such table: products".to_string()));
        assert_eq!(err.code, ErrorCode::StorageFailure);
        assert_eq!(err.message, "Database operation failed");

        let err = ApiError::from(DbError::not_found("Transaction", "42"));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Transaction not found: 42");
    }

    #[test]
    fn test_config_error_code() {
        let err = ApiError::from(ConfigError::InvalidValue("KASIR_UTC_OFFSET".to_string()));
        assert_eq!(
            serde_json::to_value(&err).unwrap()["code"],
            "CONFIG_ERROR"
        );
    }
}
