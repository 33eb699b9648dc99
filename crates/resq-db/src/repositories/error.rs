//! Error handling utilities for repositories

use resq_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create an "alert not found" error
pub fn alert_not_found(id: &str) -> DomainError {
    DomainError::AlertNotFound(id.to_string())
}
