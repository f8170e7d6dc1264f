use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{RequestId, UserId};

/// Request status enum for type-safe querying
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Matching,
    Assigned,
    Completed,
    Cancelled,
}

impl RequestStatus {
    /// Completed and cancelled are terminal; no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Matching => write!(f, "matching"),
            RequestStatus::Assigned => write!(f, "assigned"),
            RequestStatus::Completed => write!(f, "completed"),
            RequestStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "matching" => Ok(RequestStatus::Matching),
            "assigned" => Ok(RequestStatus::Assigned),
            "completed" => Ok(RequestStatus::Completed),
            "cancelled" => Ok(RequestStatus::Cancelled),
            _ => Err(anyhow::anyhow!("Invalid request status: {}", s)),
        }
    }
}

/// InvestigationRequest model - a customer's case.
///
/// Invariant: status = assigned implies investigator_id references a live
/// approved investigator; investigator_id null implies status != assigned.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvestigationRequest {
    pub id: RequestId,
    pub user_id: Uuid,
    pub investigator_id: Option<Uuid>,
    pub status: String,

    pub title: String,
    pub details: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InvestigationRequest {
    /// Find a request by ID
    pub async fn find_by_id(id: RequestId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM investigation_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find all requests owned by a customer, newest first
    pub async fn find_by_customer(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM investigation_requests WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Find all requests currently assigned to an investigator
    pub async fn find_assigned_to(investigator_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM investigation_requests
            WHERE investigator_id = $1 AND status = 'assigned'
            ORDER BY created_at DESC
            "#,
        )
        .bind(investigator_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a new request, starting in matching
    pub async fn create(
        user_id: UserId,
        title: String,
        details: Option<String>,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO investigation_requests (id, user_id, status, title, details)
            VALUES ($1, $2, 'matching', $3, $4)
            RETURNING *
            "#,
        )
        .bind(RequestId::new())
        .bind(user_id)
        .bind(&title)
        .bind(&details)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
