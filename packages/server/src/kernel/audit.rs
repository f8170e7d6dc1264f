//! Best-effort audit trail for moderation actions.
//!
//! The recorder sits off the critical path: orchestrator actions call
//! [`record_async`] after their transaction commits, and a recording
//! failure is logged but never surfaces to the caller or rolls anything
//! back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::common::UserId;

/// Structured description of a committed moderation action.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub actor_id: UserId,
    pub action: String,
    pub target_type: String,
    pub target_id: Uuid,
    pub metadata: Value,
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        actor_id: UserId,
        action: impl Into<String>,
        target_type: impl Into<String>,
        target_id: Uuid,
    ) -> Self {
        Self {
            actor_id,
            action: action.into(),
            target_type: target_type.into(),
            target_id,
            metadata: Value::Null,
            timestamp: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Audit sink. Implementations must never propagate failures.
#[async_trait]
pub trait BaseAuditRecorder: Send + Sync {
    async fn record(&self, event: AuditEvent);
}

/// Writes audit events to the `audit_log` table.
pub struct PostgresAuditRecorder {
    pool: PgPool,
}

impl PostgresAuditRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseAuditRecorder for PostgresAuditRecorder {
    async fn record(&self, event: AuditEvent) {
        let result = sqlx::query(
            r#"
            INSERT INTO audit_log (actor_id, action, target_type, target_id, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(event.actor_id)
        .bind(&event.action)
        .bind(&event.target_type)
        .bind(event.target_id)
        .bind(&event.metadata)
        .bind(event.timestamp)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            tracing::warn!(
                action = %event.action,
                target_id = %event.target_id,
                error = %e,
                "Failed to record audit event"
            );
        }
    }
}

/// Discards audit events. Used in tests.
pub struct NoopAuditRecorder;

#[async_trait]
impl BaseAuditRecorder for NoopAuditRecorder {
    async fn record(&self, _event: AuditEvent) {}
}

/// Fire-and-forget recording: the spawned task owns the event, so the
/// calling request can return without waiting on the audit sink.
pub fn record_async(audit: Arc<dyn BaseAuditRecorder>, event: AuditEvent) {
    tokio::spawn(async move {
        audit.record(event).await;
    });
}
