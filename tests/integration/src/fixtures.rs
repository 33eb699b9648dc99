//! Test fixtures
//!
//! Seeds identities, admin flags, user profiles and alerts straight into
//! PostgreSQL. Every row gets a unique id so tests can share one database.

use anyhow::Result;
use resq_common::{hash_password, AppConfig};
use resq_db::{create_pool, PgPool};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "Resq!Dispatch2024";

fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Login request body
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Auth response body
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub admin: AdminResponse,
}

#[derive(Debug, Deserialize)]
pub struct AdminResponse {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub name: String,
}

/// A seeded dashboard identity
#[derive(Debug, Clone)]
pub struct SeededIdentity {
    pub uid: String,
    pub email: String,
    pub display_name: String,
}

impl SeededIdentity {
    pub fn login(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

/// Direct database access for test data
pub struct Seeder {
    pool: PgPool,
    alert_table: &'static str,
}

impl Seeder {
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            pool: create_pool(&config.database).await?,
            alert_table: config.alert_collection.table_name(),
        })
    }

    async fn identity(&self) -> Result<SeededIdentity> {
        let uid = unique("uid");
        let email = format!("{uid}@resq.test");
        let display_name = format!("Responder {}", &uid[4..12]);
        let hash = hash_password(TEST_PASSWORD)?;

        sqlx::query(
            "INSERT INTO identities (uid, email, display_name, password_hash) VALUES ($1, $2, $3, $4)",
        )
        .bind(&uid)
        .bind(&email)
        .bind(&display_name)
        .bind(&hash)
        .execute(&self.pool)
        .await?;

        Ok(SeededIdentity {
            uid,
            email,
            display_name,
        })
    }

    /// Identity with `isAdmin = true`
    pub async fn admin(&self) -> Result<SeededIdentity> {
        let identity = self.identity().await?;
        self.set_admin(&identity.uid, Some(true)).await?;
        Ok(identity)
    }

    /// Identity whose admin record says `isAdmin = false`
    pub async fn non_admin(&self) -> Result<SeededIdentity> {
        let identity = self.identity().await?;
        self.set_admin(&identity.uid, Some(false)).await?;
        Ok(identity)
    }

    pub async fn set_admin(&self, uid: &str, is_admin: Option<bool>) -> Result<()> {
        sqlx::query(
            "INSERT INTO admins (uid, is_admin, name) VALUES ($1, $2, 'Ops Desk') \
             ON CONFLICT (uid) DO UPDATE SET is_admin = EXCLUDED.is_admin",
        )
        .bind(uid)
        .bind(is_admin)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// App user profile; returns its id
    pub async fn user(&self, name: &str, phone: Option<&str>) -> Result<String> {
        let id = unique("user");
        sqlx::query(
            "INSERT INTO users (id, name, email, phone_number, created_at) \
             VALUES ($1, $2, $3, $4, NOW())",
        )
        .bind(&id)
        .bind(name)
        .bind(format!("{id}@mail.test"))
        .bind(phone)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// Pending alert sent by `sender_id` with no stored sender name
    pub async fn alert(&self, sender_id: &str, content: &str) -> Result<String> {
        let id = unique("alert");
        let sql = format!(
            "INSERT INTO {} (id, sender_id, content, type, status, ts_seconds, ts_nanos) \
             VALUES ($1, $2, $3, 'manual_alert', 'pending', EXTRACT(EPOCH FROM NOW())::BIGINT, 0)",
            self.alert_table
        );
        sqlx::query(&sql)
            .bind(&id)
            .bind(sender_id)
            .bind(content)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }
}
