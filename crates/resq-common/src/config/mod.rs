//! Configuration structs

mod app_config;

pub use app_config::{
    AlertCollection, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    DirectoryConfig, Environment, JwtConfig, RateLimitConfig, RedisConfig, ServerConfig,
};
