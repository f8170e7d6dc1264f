//! Investigation request actions
//!
//! Request transitions run through the same plan-then-apply sequence as
//! the moderation cascades, with ownership rules layered on top: a
//! customer may create and cancel their own requests, while assignment and
//! completion require the `requests.manage` capability.

use chrono::Utc;
use serde_json::json;
use sqlx::{Postgres, Transaction};
use std::str::FromStr;
use tracing::info;

use crate::common::{Actor, Capability, InvestigatorId, RequestId, Role, UserId};
use crate::domains::accounts::models::CustomerProfile;
use crate::domains::investigators::models::InvestigatorProfile;
use crate::domains::moderation::actions::{apply_plan, investigator_snapshot};
use crate::domains::moderation::errors::ModerationError;
use crate::domains::moderation::machines::{self, RequestSnapshot};
use crate::domains::requests::models::{InvestigationRequest, RequestStatus};
use crate::kernel::{record_async, AuditEvent, ServerDeps};

async fn load_request_for_update(
    tx: &mut Transaction<'_, Postgres>,
    id: RequestId,
) -> Result<Option<InvestigationRequest>, sqlx::Error> {
    sqlx::query_as::<_, InvestigationRequest>(
        "SELECT * FROM investigation_requests WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
}

fn request_snapshot(request: &InvestigationRequest) -> Result<RequestSnapshot, ModerationError> {
    let status = RequestStatus::from_str(&request.status)
        .map_err(|e| ModerationError::Storage(sqlx::Error::Decode(e.into())))?;

    Ok(RequestSnapshot {
        id: request.id,
        user_id: UserId::from_uuid(request.user_id),
        status,
        investigator_id: request.investigator_id,
    })
}

async fn fetch_request(
    tx: &mut Transaction<'_, Postgres>,
    id: RequestId,
) -> Result<InvestigationRequest, sqlx::Error> {
    sqlx::query_as::<_, InvestigationRequest>("SELECT * FROM investigation_requests WHERE id = $1")
        .bind(id)
        .fetch_one(&mut **tx)
        .await
}

/// Create a new request for the calling customer.
///
/// The live-profile lookup doubles as the deleted-actor guard: a token
/// issued before the account was archived can no longer open cases.
pub async fn create_request(
    actor_id: UserId,
    role: Role,
    title: String,
    details: Option<String>,
    deps: &ServerDeps,
) -> Result<InvestigationRequest, ModerationError> {
    if role != Role::Customer {
        return Err(ModerationError::Forbidden("requests.create".to_string()));
    }

    CustomerProfile::find_by_user_id(actor_id, &deps.db_pool)
        .await
        .map_err(storage)?
        .ok_or(ModerationError::NotFound("Customer profile"))?;

    let request = InvestigationRequest::create(actor_id, title, details, &deps.db_pool)
        .await
        .map_err(storage)?;

    info!(request_id = %request.id, user_id = %actor_id, "Investigation request created");

    record_async(
        deps.audit.clone(),
        AuditEvent::new(
            actor_id,
            "request.create",
            "investigation_request",
            request.id.into_uuid(),
        ),
    );

    Ok(request)
}

/// Assign a matching request to an approved investigator.
///
/// The investigator row is locked alongside the request so a racing
/// profile deletion either sees the new assignment (and releases it) or
/// commits first and makes this call fail `InvestigatorNotEligible`.
pub async fn assign_request(
    actor_id: UserId,
    role: Role,
    request_id: RequestId,
    investigator_id: InvestigatorId,
    deps: &ServerDeps,
) -> Result<InvestigationRequest, ModerationError> {
    let caller = Actor::new(actor_id, role)
        .can(Capability::ManageRequests)
        .check()?;

    let mut tx = deps.db_pool.begin().await?;

    let request = load_request_for_update(&mut tx, request_id)
        .await?
        .ok_or(ModerationError::NotFound("Investigation request"))?;

    // Load the target profile whatever its state: a deleted or unapproved
    // investigator is an eligibility failure, not a missing entity.
    let investigator = sqlx::query_as::<_, InvestigatorProfile>(
        "SELECT * FROM investigator_profiles WHERE id = $1 FOR UPDATE",
    )
    .bind(investigator_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(ModerationError::NotFound("Investigator profile"))?;

    let owner_archived: bool =
        sqlx::query_scalar("SELECT deleted_at IS NOT NULL FROM users WHERE id = $1")
            .bind(investigator.user_id)
            .fetch_one(&mut *tx)
            .await?;

    let mut investigator_snap = investigator_snapshot(&investigator)?;
    investigator_snap.deleted = investigator_snap.deleted || owner_archived;

    let request_snap = request_snapshot(&request)?;
    let plan = machines::plan_assign_request(&request_snap, &investigator_snap, Utc::now())?;
    apply_plan(&mut tx, &plan).await?;

    let updated = fetch_request(&mut tx, request_id).await?;

    tx.commit().await?;

    info!(
        request_id = %request_id,
        investigator_id = %investigator_id,
        actor_id = %caller.user_id,
        "Request assigned"
    );

    record_async(
        deps.audit.clone(),
        AuditEvent::new(
            caller.user_id,
            "request.assign",
            "investigation_request",
            request_id.into_uuid(),
        )
        .with_metadata(json!({ "investigator_id": investigator_id })),
    );

    Ok(updated)
}

/// Cancel a request. Owners may cancel their own; anyone else needs the
/// `requests.manage` capability.
pub async fn cancel_request(
    actor_id: UserId,
    role: Role,
    request_id: RequestId,
    deps: &ServerDeps,
) -> Result<InvestigationRequest, ModerationError> {
    let mut tx = deps.db_pool.begin().await?;

    let request = load_request_for_update(&mut tx, request_id)
        .await?
        .ok_or(ModerationError::NotFound("Investigation request"))?;

    let is_owner = request.user_id == actor_id.into_uuid();
    if !is_owner {
        Actor::new(actor_id, role)
            .can(Capability::ManageRequests)
            .check()?;
    }

    let snapshot = request_snapshot(&request)?;
    let plan = machines::plan_cancel_request(&snapshot, Utc::now())?;
    apply_plan(&mut tx, &plan).await?;

    let updated = fetch_request(&mut tx, request_id).await?;

    tx.commit().await?;

    info!(request_id = %request_id, actor_id = %actor_id, "Request cancelled");

    record_async(
        deps.audit.clone(),
        AuditEvent::new(
            actor_id,
            "request.cancel",
            "investigation_request",
            request_id.into_uuid(),
        ),
    );

    Ok(updated)
}

/// Complete an assigned request.
pub async fn complete_request(
    actor_id: UserId,
    role: Role,
    request_id: RequestId,
    deps: &ServerDeps,
) -> Result<InvestigationRequest, ModerationError> {
    let caller = Actor::new(actor_id, role)
        .can(Capability::ManageRequests)
        .check()?;

    let mut tx = deps.db_pool.begin().await?;

    let request = load_request_for_update(&mut tx, request_id)
        .await?
        .ok_or(ModerationError::NotFound("Investigation request"))?;

    let snapshot = request_snapshot(&request)?;
    let plan = machines::plan_complete_request(&snapshot, Utc::now())?;
    apply_plan(&mut tx, &plan).await?;

    let updated = fetch_request(&mut tx, request_id).await?;

    tx.commit().await?;

    info!(request_id = %request_id, actor_id = %caller.user_id, "Request completed");

    record_async(
        deps.audit.clone(),
        AuditEvent::new(
            caller.user_id,
            "request.complete",
            "investigation_request",
            request_id.into_uuid(),
        ),
    );

    Ok(updated)
}

fn storage(err: anyhow::Error) -> ModerationError {
    match err.downcast::<sqlx::Error>() {
        Ok(sql) => ModerationError::Storage(sql),
        Err(other) => ModerationError::Storage(sqlx::Error::Decode(other.into())),
    }
}
