//! Investigation request routes.

use axum::extract::{Extension, Path};
use axum::Json;
use serde::Deserialize;

use crate::domains::requests::actions;
use crate::domains::requests::models::InvestigationRequest;
use crate::server::app::AxumAppState;
use crate::server::middleware::AuthUser;
use crate::server::routes::admin::{parse_id, require_auth};
use crate::server::routes::error::ApiError;

#[derive(Deserialize)]
pub struct CreateRequestBody {
    pub title: String,
    pub details: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignRequestBody {
    pub investigator_id: String,
}

/// GET /requests
///
/// The caller's own requests, newest first.
pub async fn list_my_requests_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<InvestigationRequest>>, ApiError> {
    let auth = require_auth(auth)?;

    let requests = InvestigationRequest::find_by_customer(auth.user_id, &state.db_pool).await?;

    Ok(Json(requests))
}

/// POST /requests
pub async fn create_request_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Json(body): Json<CreateRequestBody>,
) -> Result<Json<InvestigationRequest>, ApiError> {
    let auth = require_auth(auth)?;

    let request = actions::create_request(
        auth.user_id,
        auth.role,
        body.title,
        body.details,
        &state.deps,
    )
    .await?;

    Ok(Json(request))
}

/// POST /requests/{id}/assign
pub async fn assign_request_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
    Json(body): Json<AssignRequestBody>,
) -> Result<Json<InvestigationRequest>, ApiError> {
    let auth = require_auth(auth)?;
    let request_id = parse_id(&id)?;
    let investigator_id = parse_id(&body.investigator_id)?;

    let request = actions::assign_request(
        auth.user_id,
        auth.role,
        request_id,
        investigator_id,
        &state.deps,
    )
    .await?;

    Ok(Json(request))
}

/// POST /requests/{id}/cancel
pub async fn cancel_request_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<InvestigationRequest>, ApiError> {
    let auth = require_auth(auth)?;
    let request_id = parse_id(&id)?;

    let request =
        actions::cancel_request(auth.user_id, auth.role, request_id, &state.deps).await?;

    Ok(Json(request))
}

/// POST /requests/{id}/complete
pub async fn complete_request_handler(
    Extension(state): Extension<AxumAppState>,
    auth: Option<Extension<AuthUser>>,
    Path(id): Path<String>,
) -> Result<Json<InvestigationRequest>, ApiError> {
    let auth = require_auth(auth)?;
    let request_id = parse_id(&id)?;

    let request =
        actions::complete_request(auth.user_id, auth.role, request_id, &state.deps).await?;

    Ok(Json(request))
}
