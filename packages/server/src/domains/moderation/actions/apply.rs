//! Cascade plan executor.
//!
//! Translates each [`PlannedWrite`] into SQL against the caller's open
//! transaction. All statements commit or none do; the caller owns the
//! commit.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::common::MatchId;
use crate::domains::moderation::machines::{CascadePlan, PlannedWrite};

/// Row-level outcome of applying a plan, for result payloads and audit
/// metadata.
#[derive(Debug, Default)]
pub struct ApplySummary {
    /// Requests sent back to matching by an investigator deletion.
    pub released_request_ids: Vec<Uuid>,
    /// Requests cancelled by a customer deletion.
    pub cancelled_request_ids: Vec<Uuid>,
}

pub(crate) async fn apply_plan(
    tx: &mut Transaction<'_, Postgres>,
    plan: &CascadePlan,
) -> Result<ApplySummary, sqlx::Error> {
    let mut summary = ApplySummary::default();
    // One suffix for every archived identity in the plan, so user and
    // profile rows archived together carry the same marker.
    let archive_suffix = format!("#deleted-{}", plan.now.timestamp_millis());

    for write in &plan.writes {
        match write {
            PlannedWrite::ApproveInvestigator {
                investigator_id,
                reviewed_by,
                note,
            } => {
                sqlx::query(
                    r#"
                    UPDATE investigator_profiles
                    SET status = 'approved',
                        review_note = $2,
                        reviewed_at = $3,
                        reviewed_by_id = $4
                    WHERE id = $1
                    "#,
                )
                .bind(investigator_id)
                .bind(note)
                .bind(plan.now)
                .bind(reviewed_by)
                .execute(&mut **tx)
                .await?;
            }

            PlannedWrite::ReleaseAssignedRequests { investigator_id } => {
                let ids = sqlx::query_scalar::<_, Uuid>(
                    r#"
                    UPDATE investigation_requests
                    SET investigator_id = NULL, status = 'matching', updated_at = $2
                    WHERE investigator_id = $1 AND status = 'assigned'
                    RETURNING id
                    "#,
                )
                .bind(investigator_id)
                .bind(plan.now)
                .fetch_all(&mut **tx)
                .await?;
                summary.released_request_ids.extend(ids);
            }

            PlannedWrite::DeleteMatchesForInvestigator { investigator_id } => {
                sqlx::query("DELETE FROM investigator_matches WHERE investigator_id = $1")
                    .bind(investigator_id)
                    .execute(&mut **tx)
                    .await?;
            }

            PlannedWrite::RejectAndArchiveInvestigator { investigator_id } => {
                sqlx::query(
                    r#"
                    UPDATE investigator_profiles
                    SET status = 'rejected', deleted_at = $2
                    WHERE id = $1
                    "#,
                )
                .bind(investigator_id)
                .bind(plan.now)
                .execute(&mut **tx)
                .await?;
            }

            PlannedWrite::CancelActiveRequestsForCustomer { user_id } => {
                let ids = sqlx::query_scalar::<_, Uuid>(
                    r#"
                    UPDATE investigation_requests
                    SET status = 'cancelled', investigator_id = NULL, updated_at = $2
                    WHERE user_id = $1 AND status IN ('matching', 'assigned')
                    RETURNING id
                    "#,
                )
                .bind(user_id)
                .bind(plan.now)
                .fetch_all(&mut **tx)
                .await?;
                summary.cancelled_request_ids.extend(ids);
            }

            PlannedWrite::DeleteMatchesForCustomerRequests { user_id } => {
                sqlx::query(
                    r#"
                    DELETE FROM investigator_matches im
                    USING investigation_requests r
                    WHERE im.request_id = r.id AND r.user_id = $1
                    "#,
                )
                .bind(user_id)
                .execute(&mut **tx)
                .await?;
            }

            PlannedWrite::ArchiveCustomerProfile { customer_id } => {
                sqlx::query("UPDATE customer_profiles SET deleted_at = $2 WHERE id = $1")
                    .bind(customer_id)
                    .bind(plan.now)
                    .execute(&mut **tx)
                    .await?;
            }

            PlannedWrite::ArchiveUser { user_id } => {
                sqlx::query(
                    r#"
                    UPDATE users
                    SET deleted_at = $2,
                        email = email || $3,
                        display_name = display_name || $3,
                        updated_at = $2
                    WHERE id = $1 AND deleted_at IS NULL
                    "#,
                )
                .bind(user_id)
                .bind(plan.now)
                .bind(&archive_suffix)
                .execute(&mut **tx)
                .await?;
            }

            PlannedWrite::AssignRequest {
                request_id,
                investigator_id,
            } => {
                sqlx::query(
                    r#"
                    UPDATE investigation_requests
                    SET investigator_id = $2, status = 'assigned', updated_at = $3
                    WHERE id = $1
                    "#,
                )
                .bind(request_id)
                .bind(investigator_id)
                .bind(plan.now)
                .execute(&mut **tx)
                .await?;
            }

            PlannedWrite::RecordMatch {
                request_id,
                investigator_id,
            } => {
                sqlx::query(
                    r#"
                    INSERT INTO investigator_matches (id, request_id, investigator_id, created_at)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(MatchId::new())
                .bind(request_id)
                .bind(investigator_id)
                .bind(plan.now)
                .execute(&mut **tx)
                .await?;
            }

            PlannedWrite::CancelRequest { request_id } => {
                sqlx::query(
                    r#"
                    UPDATE investigation_requests
                    SET status = 'cancelled', investigator_id = NULL, updated_at = $2
                    WHERE id = $1
                    "#,
                )
                .bind(request_id)
                .bind(plan.now)
                .execute(&mut **tx)
                .await?;
            }

            PlannedWrite::DeleteMatchesForRequest { request_id } => {
                sqlx::query("DELETE FROM investigator_matches WHERE request_id = $1")
                    .bind(request_id)
                    .execute(&mut **tx)
                    .await?;
            }

            PlannedWrite::CompleteRequest { request_id } => {
                sqlx::query(
                    r#"
                    UPDATE investigation_requests
                    SET status = 'completed', updated_at = $2
                    WHERE id = $1
                    "#,
                )
                .bind(request_id)
                .bind(plan.now)
                .execute(&mut **tx)
                .await?;
            }
        }
    }

    Ok(summary)
}
