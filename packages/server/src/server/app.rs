//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseTokenVerifier, PostgresAuditRecorder, ServerDeps};
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    approve_investigator_handler, assign_request_handler, cancel_request_handler,
    complete_request_handler, create_request_handler, delete_customer_handler,
    delete_investigator_handler, health_handler, list_my_requests_handler,
    list_pending_investigators_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

/// Build the Axum application router
///
/// Every moderation route funnels through the jwt middleware (which
/// attaches `AuthUser` when a valid bearer token is present) and into the
/// orchestrator actions, which own authorization and transactions.
pub fn build_app(pool: PgPool, jwt_service: Arc<JwtService>) -> Router {
    let audit = Arc::new(PostgresAuditRecorder::new(pool.clone()));
    let deps = Arc::new(ServerDeps::new(
        pool.clone(),
        jwt_service.clone(),
        audit,
    ));

    let state = AxumAppState {
        db_pool: pool,
        deps,
        jwt_service: jwt_service.clone(),
    };

    let verifier: Arc<dyn BaseTokenVerifier> = jwt_service;

    Router::new()
        .route("/health", get(health_handler))
        // Admin moderation surface
        .route(
            "/admin/investigators/pending",
            get(list_pending_investigators_handler),
        )
        .route(
            "/admin/investigators/:id/approve",
            post(approve_investigator_handler),
        )
        .route("/admin/investigators/:id", delete(delete_investigator_handler))
        .route("/admin/customers/:id", delete(delete_customer_handler))
        // Request lifecycle
        .route(
            "/requests",
            get(list_my_requests_handler).post(create_request_handler),
        )
        .route("/requests/:id/assign", post(assign_request_handler))
        .route("/requests/:id/cancel", post(cancel_request_handler))
        .route("/requests/:id/complete", post(complete_request_handler))
        .layer(middleware::from_fn(
            move |request: axum::extract::Request, next: middleware::Next| {
                let verifier = verifier.clone();
                async move { jwt_auth_middleware(verifier, request, next).await }
            },
        ))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
