//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. External services use trait abstractions to enable testing.

use sqlx::PgPool;
use std::sync::Arc;

use crate::kernel::{BaseAuditRecorder, BaseTokenVerifier};

/// Server dependencies accessible to actions
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Token verification service consumed by the auth middleware
    pub token_verifier: Arc<dyn BaseTokenVerifier>,
    /// Best-effort audit sink, invoked after commit
    pub audit: Arc<dyn BaseAuditRecorder>,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        token_verifier: Arc<dyn BaseTokenVerifier>,
        audit: Arc<dyn BaseAuditRecorder>,
    ) -> Self {
        Self {
            db_pool,
            token_verifier,
            audit,
        }
    }
}
