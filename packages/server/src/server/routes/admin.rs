//! Administrative moderation routes.
//!
//! Each handler maps 1:1 to an orchestrator action: parse the path id,
//! require an authenticated caller, delegate, and let `ApiError` translate
//! the outcome. Capability checks live in the actions, not here.

use axum::extract::{Extension, Path};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::{Actor, Capability, CustomerId, Id, InvestigatorId};
use crate::domains::investigators::models::InvestigatorProfile;
use crate::domains::moderation::{actions, ModerationError};
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;
use crate::server::routes::error::ApiError;

#[derive(Deserialize, Default)]
pub struct ApproveInvestigatorBody {
    pub note: Option<String>,
}

#[derive(Serialize)]
pub struct DeleteInvestigatorResponse {
    pub investigator_id: InvestigatorId,
    pub user_id: Uuid,
    pub released_request_ids: Vec<Uuid>,
}

#[derive(Serialize)]
pub struct DeleteCustomerResponse {
    pub customer_id: CustomerId,
    pub user_id: Uuid,
    pub cancelled_request_ids: Vec<Uuid>,
}

pub(crate) fn require_auth(auth: Option<Extension<AuthUser>>) -> Result<AuthUser, ApiError> {
    auth.map(|Extension(user)| user)
        .ok_or(ApiError(ModerationError::Unauthenticated))
}

pub(crate) fn parse_id<T>(raw: &str) -> Result<Id<T>, ApiError> {
    Id::parse(raw).map_err(|_| ApiError(ModerationError::InvalidId(raw.to_string())))
}

/// GET /admin/investigators/pending
///
/// The admin approval queue: every live profile still awaiting review.
pub async fn list_pending_investigators_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<InvestigatorProfile>>, ApiError> {
    let auth = require_auth(auth)?;
    Actor::new(auth.user_id, auth.role)
        .can(Capability::ModerateInvestigators)
        .check()?;

    let pending = InvestigatorProfile::find_pending(&state.db_pool).await?;

    Ok(Json(pending))
}

/// POST /admin/investigators/{id}/approve
pub async fn approve_investigator_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    body: Option<Json<ApproveInvestigatorBody>>,
) -> Result<Json<InvestigatorProfile>, ApiError> {
    let auth = require_auth(auth)?;
    let investigator_id = parse_id(&id)?;
    let note = body.and_then(|Json(b)| b.note);

    let profile = actions::approve_investigator(
        auth.user_id,
        auth.role,
        investigator_id,
        note,
        &state.deps,
    )
    .await?;

    Ok(Json(profile))
}

/// DELETE /admin/investigators/{id}
pub async fn delete_investigator_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteInvestigatorResponse>, ApiError> {
    let auth = require_auth(auth)?;
    let investigator_id = parse_id(&id)?;

    let result =
        actions::delete_investigator(auth.user_id, auth.role, investigator_id, &state.deps).await?;

    Ok(Json(DeleteInvestigatorResponse {
        investigator_id: result.investigator_id,
        user_id: result.user_id.into_uuid(),
        released_request_ids: result.released_request_ids,
    }))
}

/// DELETE /admin/customers/{id}
pub async fn delete_customer_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCustomerResponse>, ApiError> {
    let auth = require_auth(auth)?;
    let customer_id = parse_id(&id)?;

    let result =
        actions::delete_customer(auth.user_id, auth.role, customer_id, &state.deps).await?;

    Ok(Json(DeleteCustomerResponse {
        customer_id: result.customer_id,
        user_id: result.user_id.into_uuid(),
        cancelled_request_ids: result.cancelled_request_ids,
    }))
}
