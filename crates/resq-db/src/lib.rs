//! # resq-db
//!
//! Database layer implementing the `resq-core` repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers (including alert normalization)
//! - Repository implementations
//! - The `LISTEN/NOTIFY` alert change feed
//!
//! ## Usage
//!
//! ```rust,ignore
//! use resq_common::{AlertCollection, DatabaseConfig};
//! use resq_db::{create_pool, PgAlertRepository};
//!
//! async fn example(config: &DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(config).await?;
//!     let alerts = PgAlertRepository::new(pool, AlertCollection::DashboardAlerts);
//!     Ok(())
//! }
//! ```

pub mod feed;
pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use feed::{PgAlertChangeFeed, ALERT_CHANGE_CHANNEL};
pub use pool::{create_pool, ping, run_migrations, PgPool};
pub use repositories::{
    PgAdminRepository, PgAlertRepository, PgIdentityRepository, PgUserRepository,
};
