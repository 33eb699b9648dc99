//! Admin flag database model

use sqlx::FromRow;

/// Database model for admins table
#[derive(Debug, Clone, FromRow)]
pub struct AdminModel {
    pub uid: String,
    pub is_admin: Option<bool>,
    pub name: Option<String>,
}
