//! Moderation Orchestrator
//!
//! Entry-point actions called from the admin routes. Each action runs the
//! same read-plan-write sequence: authorize, open a transaction, load the
//! target (and owner) with `FOR UPDATE`, hand the snapshot to the
//! Lifecycle Engine, apply the resulting cascade plan, commit, then emit a
//! best-effort audit event. A planner error aborts before any write; a
//! storage error rolls the whole cascade back.
//!
//! The row locks are what make concurrent moderation of the same entity
//! safe: the loser of two racing approves blocks on the lock, re-reads the
//! winner's committed row, and fails with `AlreadyApproved` instead of
//! silently re-applying the review stamp.

mod apply;

pub use apply::ApplySummary;
pub(crate) use apply::apply_plan;

use chrono::Utc;
use serde_json::json;
use sqlx::{Postgres, Transaction};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

use crate::common::{Actor, Capability, CustomerId, InvestigatorId, Role, UserId};
use crate::domains::accounts::models::CustomerProfile;
use crate::domains::investigators::models::{InvestigatorProfile, InvestigatorStatus};
use crate::domains::moderation::errors::ModerationError;
use crate::domains::moderation::machines::{
    self, CustomerSnapshot, InvestigatorSnapshot,
};
use crate::kernel::{record_async, AuditEvent, ServerDeps};

/// Result of deleting an investigator profile
#[derive(Debug, Clone)]
pub struct DeleteInvestigatorResult {
    pub investigator_id: InvestigatorId,
    pub user_id: UserId,
    /// Requests released back to matching by the cascade
    pub released_request_ids: Vec<Uuid>,
}

/// Result of deleting a customer
#[derive(Debug, Clone)]
pub struct DeleteCustomerResult {
    pub customer_id: CustomerId,
    pub user_id: UserId,
    /// Requests cancelled by the cascade
    pub cancelled_request_ids: Vec<Uuid>,
}

// ============================================================================
// Snapshot plumbing
// ============================================================================

/// Live-row lookup with both the profile and its owning user locked for the
/// remainder of the transaction. Archived rows (either side) read as absent.
async fn load_investigator_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: InvestigatorId,
) -> Result<Option<InvestigatorProfile>, sqlx::Error> {
    sqlx::query_as::<_, InvestigatorProfile>(
        r#"
        SELECT ip.* FROM investigator_profiles ip
        JOIN users u ON u.id = ip.user_id
        WHERE ip.id = $1 AND ip.deleted_at IS NULL AND u.deleted_at IS NULL
        FOR UPDATE OF ip, u
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

async fn load_customer_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: CustomerId,
) -> Result<Option<CustomerProfile>, sqlx::Error> {
    sqlx::query_as::<_, CustomerProfile>(
        r#"
        SELECT cp.* FROM customer_profiles cp
        JOIN users u ON u.id = cp.user_id
        WHERE cp.id = $1 AND cp.deleted_at IS NULL AND u.deleted_at IS NULL
        FOR UPDATE OF cp, u
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

/// A status string the decoder cannot parse means the row violates the
/// schema contract, so it surfaces as a storage error, not a domain one.
pub(crate) fn investigator_snapshot(
    profile: &InvestigatorProfile,
) -> Result<InvestigatorSnapshot, ModerationError> {
    let status = InvestigatorStatus::from_str(&profile.status)
        .map_err(|e| ModerationError::Storage(sqlx::Error::Decode(e.into())))?;

    Ok(InvestigatorSnapshot {
        id: profile.id,
        user_id: UserId::from_uuid(profile.user_id),
        status,
        deleted: profile.deleted_at.is_some(),
    })
}

// ============================================================================
// Entry points
// ============================================================================

/// Approve an investigator profile.
///
/// Idempotent on read: retrying a successful approve observes the approved
/// row and fails with `AlreadyApproved` rather than re-stamping
/// `reviewed_at`.
pub async fn approve_investigator(
    actor_id: UserId,
    role: Role,
    investigator_id: InvestigatorId,
    note: Option<String>,
    deps: &ServerDeps,
) -> Result<InvestigatorProfile, ModerationError> {
    let caller = Actor::new(actor_id, role)
        .can(Capability::ModerateInvestigators)
        .check()?;

    let mut tx = deps.db_pool.begin().await?;

    let profile = load_investigator_for_update(&mut tx, investigator_id)
        .await?
        .ok_or(ModerationError::NotFound("Investigator profile"))?;

    let snapshot = investigator_snapshot(&profile)?;
    let plan =
        machines::plan_approve_investigator(&snapshot, caller.user_id, note.clone(), Utc::now())?;
    apply_plan(&mut tx, &plan).await?;

    let updated =
        sqlx::query_as::<_, InvestigatorProfile>("SELECT * FROM investigator_profiles WHERE id = $1")
            .bind(investigator_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    info!(
        investigator_id = %investigator_id,
        actor_id = %caller.user_id,
        "Investigator approved"
    );

    record_async(
        deps.audit.clone(),
        AuditEvent::new(
            caller.user_id,
            "investigator.approve",
            "investigator_profile",
            investigator_id.into_uuid(),
        )
        .with_metadata(json!({ "note": note })),
    );

    Ok(updated)
}

/// Delete (reject + soft-delete) an investigator profile.
///
/// The cascade releases every assigned request back to matching, removes
/// the profile's pairing records, and archives the profile together with
/// its owning user. A second delete on the same profile fails `NotFound`
/// because the live-row lookup excludes archived profiles.
pub async fn delete_investigator(
    actor_id: UserId,
    role: Role,
    investigator_id: InvestigatorId,
    deps: &ServerDeps,
) -> Result<DeleteInvestigatorResult, ModerationError> {
    let caller = Actor::new(actor_id, role)
        .can(Capability::ModerateInvestigators)
        .check()?;

    let mut tx = deps.db_pool.begin().await?;

    let profile = load_investigator_for_update(&mut tx, investigator_id)
        .await?
        .ok_or(ModerationError::NotFound("Investigator profile"))?;

    let snapshot = investigator_snapshot(&profile)?;
    let plan = machines::plan_delete_investigator(&snapshot, Utc::now())?;
    let summary = apply_plan(&mut tx, &plan).await?;

    tx.commit().await?;

    info!(
        investigator_id = %investigator_id,
        actor_id = %caller.user_id,
        released = summary.released_request_ids.len(),
        "Investigator deleted"
    );

    record_async(
        deps.audit.clone(),
        AuditEvent::new(
            caller.user_id,
            "investigator.delete",
            "investigator_profile",
            investigator_id.into_uuid(),
        )
        .with_metadata(json!({ "released_request_ids": summary.released_request_ids.clone() })),
    );

    Ok(DeleteInvestigatorResult {
        investigator_id,
        user_id: snapshot.user_id,
        released_request_ids: summary.released_request_ids,
    })
}

/// Delete a customer and their account.
///
/// Cancels every non-terminal request the customer owns and archives the
/// profile and owning user together; the archived email rewrite frees the
/// address for a future signup.
pub async fn delete_customer(
    actor_id: UserId,
    role: Role,
    customer_id: CustomerId,
    deps: &ServerDeps,
) -> Result<DeleteCustomerResult, ModerationError> {
    let caller = Actor::new(actor_id, role)
        .can(Capability::ModerateCustomers)
        .check()?;

    let mut tx = deps.db_pool.begin().await?;

    let profile = load_customer_for_update(&mut tx, customer_id)
        .await?
        .ok_or(ModerationError::NotFound("Customer profile"))?;

    let snapshot = CustomerSnapshot {
        id: profile.id,
        user_id: UserId::from_uuid(profile.user_id),
    };
    let plan = machines::plan_delete_customer(&snapshot, Utc::now());
    let summary = apply_plan(&mut tx, &plan).await?;

    tx.commit().await?;

    info!(
        customer_id = %customer_id,
        actor_id = %caller.user_id,
        cancelled = summary.cancelled_request_ids.len(),
        "Customer deleted"
    );

    record_async(
        deps.audit.clone(),
        AuditEvent::new(
            caller.user_id,
            "customer.delete",
            "customer_profile",
            customer_id.into_uuid(),
        )
        .with_metadata(json!({ "cancelled_request_ids": summary.cancelled_request_ids.clone() })),
    );

    Ok(DeleteCustomerResult {
        customer_id,
        user_id: snapshot.user_id,
        cancelled_request_ids: summary.cancelled_request_ids,
    })
}
