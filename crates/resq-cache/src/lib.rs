//! # resq-cache
//!
//! Redis layer for admin sessions.
//!
//! - **Connection Pool**: managed Redis connections via deadpool
//! - **Session Storage**: refresh tokens per admin identity, so an admin can be
//!   signed out everywhere when their admin flag is withdrawn
//!
//! ## Example
//!
//! ```ignore
//! use resq_cache::{RedisPool, RefreshTokenStore};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let sessions = RefreshTokenStore::with_ttl(pool.clone(), 86_400);
//! ```

pub mod pool;
pub mod session;

pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use session::RefreshTokenStore;
