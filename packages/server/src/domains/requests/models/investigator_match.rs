use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::MatchId;

/// InvestigatorMatch model - a confirmed pairing between a request and an
/// investigator.
///
/// Rows exist only while both sides are active: the moderation cascades
/// delete them whenever the request reaches a terminal status or the
/// investigator profile is archived, so no row ever references a deleted
/// profile.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvestigatorMatch {
    pub id: MatchId,
    pub request_id: Uuid,
    pub investigator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl InvestigatorMatch {
    /// Find all matches referencing an investigator
    pub async fn find_by_investigator(investigator_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM investigator_matches WHERE investigator_id = $1 ORDER BY created_at",
        )
        .bind(investigator_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Find all matches for a request
    pub async fn find_by_request(request_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM investigator_matches WHERE request_id = $1 ORDER BY created_at",
        )
        .bind(request_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
