//! # resq-common
//!
//! Shared utilities including configuration, error handling, authentication, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{hash_password, verify_password, Claims, JwtService, PasswordService, TokenPair, TokenType};
pub use config::{
    AlertCollection, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    DirectoryConfig, Environment, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{init_tracing, TracingConfig, TracingError};
