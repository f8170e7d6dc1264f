use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{CustomerId, UserId};

/// CustomerProfile model - 1:1 with a User of role customer.
///
/// Administrative "delete customer" always archives the profile and its
/// owning user together, so a live profile implies a live user; the lookups
/// still join the owner so a half-archived pair reads as not-found.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerProfile {
    pub id: CustomerId,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CustomerProfile {
    /// Find a live profile by ID. Profiles whose owning user is archived
    /// are treated as not-found.
    pub async fn find_by_id(id: CustomerId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT cp.* FROM customer_profiles cp
            JOIN users u ON u.id = cp.user_id
            WHERE cp.id = $1 AND cp.deleted_at IS NULL AND u.deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Find a live profile by owning user
    pub async fn find_by_user_id(user_id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT cp.* FROM customer_profiles cp
            JOIN users u ON u.id = cp.user_id
            WHERE cp.user_id = $1 AND cp.deleted_at IS NULL AND u.deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new profile for a user
    pub async fn create(user_id: UserId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO customer_profiles (id, user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(CustomerId::new())
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
