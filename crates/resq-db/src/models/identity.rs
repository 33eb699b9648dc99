//! Staff identity database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for identities table
#[derive(Debug, Clone, FromRow)]
pub struct IdentityModel {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}
