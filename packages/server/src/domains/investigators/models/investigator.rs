use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{InvestigatorId, UserId};

/// Investigator status enum for type-safe querying
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvestigatorStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for InvestigatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvestigatorStatus::Pending => write!(f, "pending"),
            InvestigatorStatus::Approved => write!(f, "approved"),
            InvestigatorStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for InvestigatorStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(InvestigatorStatus::Pending),
            "approved" => Ok(InvestigatorStatus::Approved),
            "rejected" => Ok(InvestigatorStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid investigator status: {}", s)),
        }
    }
}

/// InvestigatorProfile model - vetting state for a User of role investigator.
///
/// Status moves pending -> approved or pending/approved -> rejected;
/// approved is unreachable from rejected or from an archived profile.
/// Deletion forces status to rejected in the same transaction that sets
/// `deleted_at`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvestigatorProfile {
    pub id: InvestigatorId,
    pub user_id: Uuid,

    // Vetting workflow
    pub status: String,
    pub review_note: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl InvestigatorProfile {
    /// Find a live profile by ID. Profiles whose owning user is archived
    /// are treated as not-found.
    pub async fn find_by_id(id: InvestigatorId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT ip.* FROM investigator_profiles ip
            JOIN users u ON u.id = ip.user_id
            WHERE ip.id = $1 AND ip.deleted_at IS NULL AND u.deleted_at IS NULL
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
            SELECT ip.* FROM investigator_profiles ip
            JOIN users u ON u.id = ip.user_id
            WHERE ip.user_id = $1 AND ip.deleted_at IS NULL AND u.deleted_at IS NULL
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Find all live profiles with a specific status
    pub async fn find_by_status(status: &str, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT ip.* FROM investigator_profiles ip
            JOIN users u ON u.id = ip.user_id
            WHERE ip.status = $1 AND ip.deleted_at IS NULL AND u.deleted_at IS NULL
            ORDER BY ip.created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Find all pending profiles (for the admin approval queue)
    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>> {
        Self::find_by_status("pending", pool).await
    }

    /// Insert a new profile for a user, starting in pending
    pub async fn create(user_id: UserId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO investigator_profiles (id, user_id, status)
            VALUES ($1, $2, 'pending')
            RETURNING *
            "#,
        )
        .bind(InvestigatorId::new())
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
