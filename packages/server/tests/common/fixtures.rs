//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly; status tweaks that only
//! the cascades perform in production are applied with raw SQL.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use server_core::common::{InvestigatorId, RequestId, UserId};
use server_core::domains::accounts::models::{CustomerProfile, User};
use server_core::domains::investigators::models::InvestigatorProfile;
use server_core::domains::requests::models::InvestigationRequest;

/// Unique email per call so tests never collide on the live-email index.
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

pub async fn create_admin(pool: &PgPool) -> Result<User> {
    User::create(
        unique_email("admin"),
        "Test Admin".to_string(),
        "admin".to_string(),
        pool,
    )
    .await
}

pub async fn create_customer(pool: &PgPool) -> Result<(User, CustomerProfile)> {
    let user = User::create(
        unique_email("customer"),
        "Test Customer".to_string(),
        "customer".to_string(),
        pool,
    )
    .await?;
    let profile = CustomerProfile::create(user.id, pool).await?;
    Ok((user, profile))
}

/// Create an investigator profile in the given status.
pub async fn create_investigator(
    pool: &PgPool,
    status: &str,
) -> Result<(User, InvestigatorProfile)> {
    let user = User::create(
        unique_email("investigator"),
        "Test Investigator".to_string(),
        "investigator".to_string(),
        pool,
    )
    .await?;
    let mut profile = InvestigatorProfile::create(user.id, pool).await?;

    if status != "pending" {
        profile = sqlx::query_as::<_, InvestigatorProfile>(
            "UPDATE investigator_profiles SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(profile.id)
        .bind(status)
        .fetch_one(pool)
        .await?;
    }

    Ok((user, profile))
}

pub async fn create_request(
    pool: &PgPool,
    user_id: UserId,
    title: &str,
) -> Result<InvestigationRequest> {
    InvestigationRequest::create(user_id, title.to_string(), None, pool).await
}

/// Put a request into assigned state with a matching pairing record, the
/// way a committed assignment cascade leaves it.
pub async fn assign_request_fixture(
    pool: &PgPool,
    request_id: RequestId,
    investigator_id: InvestigatorId,
) -> Result<()> {
    sqlx::query(
        "UPDATE investigation_requests SET status = 'assigned', investigator_id = $2 WHERE id = $1",
    )
    .bind(request_id)
    .bind(investigator_id)
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT INTO investigator_matches (id, request_id, investigator_id) VALUES ($1, $2, $3)",
    )
    .bind(Uuid::now_v7())
    .bind(request_id)
    .bind(investigator_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a request row regardless of status.
pub async fn fetch_request(pool: &PgPool, id: RequestId) -> Result<InvestigationRequest> {
    InvestigationRequest::find_by_id(id, pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("request {} not found", id))
}

/// Fetch an investigator profile row, including archived ones.
pub async fn fetch_investigator_any(
    pool: &PgPool,
    id: InvestigatorId,
) -> Result<InvestigatorProfile> {
    sqlx::query_as::<_, InvestigatorProfile>("SELECT * FROM investigator_profiles WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
}

/// Fetch a user row, including archived ones.
pub async fn fetch_user_any(pool: &PgPool, id: UserId) -> Result<User> {
    User::find_by_id_any(id, pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user {} not found", id))
}

pub async fn count_matches_for_investigator(
    pool: &PgPool,
    investigator_id: InvestigatorId,
) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM investigator_matches WHERE investigator_id = $1")
        .bind(investigator_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
}
