//! Lifecycle Engine: pure decision logic for status transitions.
//!
//! Every moderation operation is split in two. The planners here take a
//! snapshot of the entities involved and either reject the transition with
//! a [`ModerationError`] or return a [`CascadePlan`] - a declarative list
//! of the writes needed to keep every dependent record consistent with the
//! transition. No I/O happens here; the orchestrator in `actions` loads
//! the snapshots, calls a planner, and applies the plan inside one
//! transaction.
//!
//! Keeping the decision as plain data means the hardest rules in the
//! system (what a deletion must cascade to) are unit-tested without a
//! store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::common::{CustomerId, InvestigatorId, RequestId, UserId};
use crate::domains::investigators::models::InvestigatorStatus;
use crate::domains::moderation::errors::ModerationError;
use crate::domains::requests::models::RequestStatus;

// ============================================================================
// Snapshots - the minimal state a planner decides from
// ============================================================================

/// Snapshot of an investigator profile at plan time.
#[derive(Debug, Clone, Copy)]
pub struct InvestigatorSnapshot {
    pub id: InvestigatorId,
    pub user_id: UserId,
    pub status: InvestigatorStatus,
    pub deleted: bool,
}

/// Snapshot of a customer profile at plan time.
#[derive(Debug, Clone, Copy)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub user_id: UserId,
}

/// Snapshot of an investigation request at plan time.
#[derive(Debug, Clone, Copy)]
pub struct RequestSnapshot {
    pub id: RequestId,
    pub user_id: UserId,
    pub status: RequestStatus,
    pub investigator_id: Option<Uuid>,
}

// ============================================================================
// Cascade plans
// ============================================================================

/// A single write the Entity Store must apply.
///
/// Set-based variants (`...ForInvestigator`, `...ForCustomer`) deliberately
/// describe the affected rows by predicate rather than by id list: the plan
/// is computed and applied against the same locked snapshot, so the
/// predicate resolves to exactly the rows the planner reasoned about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedWrite {
    /// Mark the profile approved and stamp the review fields.
    ApproveInvestigator {
        investigator_id: InvestigatorId,
        reviewed_by: UserId,
        note: Option<String>,
    },

    /// Send every request assigned to the investigator back to matching
    /// with its back-reference cleared.
    ReleaseAssignedRequests { investigator_id: InvestigatorId },

    /// Remove every pairing record referencing the investigator.
    DeleteMatchesForInvestigator { investigator_id: InvestigatorId },

    /// Force status to rejected and archive the profile.
    RejectAndArchiveInvestigator { investigator_id: InvestigatorId },

    /// Cancel every non-terminal request owned by the customer and clear
    /// its back-reference.
    CancelActiveRequestsForCustomer { user_id: UserId },

    /// Remove every pairing record attached to the customer's requests.
    DeleteMatchesForCustomerRequests { user_id: UserId },

    /// Archive the customer profile.
    ArchiveCustomerProfile { customer_id: CustomerId },

    /// Archive the user row, rewriting email and display name to the
    /// `<original>#deleted-<epoch-ms>` form so the live-email unique
    /// constraint frees up.
    ArchiveUser { user_id: UserId },

    /// Point the request at the investigator and mark it assigned.
    AssignRequest {
        request_id: RequestId,
        investigator_id: InvestigatorId,
    },

    /// Record the confirmed pairing.
    RecordMatch {
        request_id: RequestId,
        investigator_id: InvestigatorId,
    },

    /// Cancel the request, clearing any back-reference.
    CancelRequest { request_id: RequestId },

    /// Remove the request's pairing records.
    DeleteMatchesForRequest { request_id: RequestId },

    /// Mark the request completed.
    CompleteRequest { request_id: RequestId },
}

/// The full set of writes for one validated transition, applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadePlan {
    /// Single timestamp for every write in the plan; also the epoch-ms
    /// source for archived-identity rewrites.
    pub now: DateTime<Utc>,
    pub writes: Vec<PlannedWrite>,
}

impl CascadePlan {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            writes: Vec::new(),
        }
    }

    fn push(mut self, write: PlannedWrite) -> Self {
        self.writes.push(write);
        self
    }
}

// ============================================================================
// Planners
// ============================================================================

/// Plan approving an investigator profile.
///
/// Approved profiles fail with `AlreadyApproved` so a retried approve is
/// observed, not double-applied. Rejected profiles can never become
/// approved.
pub fn plan_approve_investigator(
    profile: &InvestigatorSnapshot,
    reviewed_by: UserId,
    note: Option<String>,
    now: DateTime<Utc>,
) -> Result<CascadePlan, ModerationError> {
    if profile.deleted {
        return Err(ModerationError::NotFound("Investigator profile"));
    }

    match profile.status {
        InvestigatorStatus::Approved => Err(ModerationError::AlreadyApproved),
        InvestigatorStatus::Rejected => Err(ModerationError::InvalidTransition(
            "rejected investigator cannot be approved".to_string(),
        )),
        InvestigatorStatus::Pending => {
            Ok(CascadePlan::new(now).push(PlannedWrite::ApproveInvestigator {
                investigator_id: profile.id,
                reviewed_by,
                note,
            }))
        }
    }
}

/// Plan deleting (reject + soft-delete) an investigator profile.
///
/// Unconditional for a live profile, whatever its status: every assigned
/// request is released back to matching, every pairing record is removed,
/// the profile is rejected and archived, and the owning user is archived
/// with it. Requests already in a terminal status keep their historical
/// back-reference; a terminal case is not an active obligation.
pub fn plan_delete_investigator(
    profile: &InvestigatorSnapshot,
    now: DateTime<Utc>,
) -> Result<CascadePlan, ModerationError> {
    if profile.deleted {
        return Err(ModerationError::NotFound("Investigator profile"));
    }

    Ok(CascadePlan::new(now)
        .push(PlannedWrite::ReleaseAssignedRequests {
            investigator_id: profile.id,
        })
        .push(PlannedWrite::DeleteMatchesForInvestigator {
            investigator_id: profile.id,
        })
        .push(PlannedWrite::RejectAndArchiveInvestigator {
            investigator_id: profile.id,
        })
        .push(PlannedWrite::ArchiveUser {
            user_id: profile.user_id,
        }))
}

/// Plan deleting a customer and their account.
///
/// Every non-terminal request the customer owns is cancelled with its
/// back-reference cleared, pairing records for those requests are removed,
/// and profile and owning user are archived together.
pub fn plan_delete_customer(profile: &CustomerSnapshot, now: DateTime<Utc>) -> CascadePlan {
    CascadePlan::new(now)
        .push(PlannedWrite::CancelActiveRequestsForCustomer {
            user_id: profile.user_id,
        })
        .push(PlannedWrite::DeleteMatchesForCustomerRequests {
            user_id: profile.user_id,
        })
        .push(PlannedWrite::ArchiveCustomerProfile {
            customer_id: profile.id,
        })
        .push(PlannedWrite::ArchiveUser {
            user_id: profile.user_id,
        })
}

/// Plan assigning a request to an investigator.
///
/// The investigator must currently be approved and live; anything else is
/// `InvestigatorNotEligible`. The request itself must still be matching.
pub fn plan_assign_request(
    request: &RequestSnapshot,
    investigator: &InvestigatorSnapshot,
    now: DateTime<Utc>,
) -> Result<CascadePlan, ModerationError> {
    if investigator.deleted || investigator.status != InvestigatorStatus::Approved {
        return Err(ModerationError::InvestigatorNotEligible);
    }

    match request.status {
        RequestStatus::Matching => Ok(CascadePlan::new(now)
            .push(PlannedWrite::AssignRequest {
                request_id: request.id,
                investigator_id: investigator.id,
            })
            .push(PlannedWrite::RecordMatch {
                request_id: request.id,
                investigator_id: investigator.id,
            })),
        other => Err(ModerationError::InvalidTransition(format!(
            "cannot assign a request in status {}",
            other
        ))),
    }
}

/// Plan cancelling a request.
///
/// Reachable from matching or assigned; always clears the back-reference
/// and removes pairing records, whatever their prior state.
pub fn plan_cancel_request(
    request: &RequestSnapshot,
    now: DateTime<Utc>,
) -> Result<CascadePlan, ModerationError> {
    if request.status.is_terminal() {
        return Err(ModerationError::InvalidTransition(format!(
            "cannot cancel a request in status {}",
            request.status
        )));
    }

    Ok(CascadePlan::new(now)
        .push(PlannedWrite::CancelRequest {
            request_id: request.id,
        })
        .push(PlannedWrite::DeleteMatchesForRequest {
            request_id: request.id,
        }))
}

/// Plan completing a request. Only an assigned request can complete.
pub fn plan_complete_request(
    request: &RequestSnapshot,
    now: DateTime<Utc>,
) -> Result<CascadePlan, ModerationError> {
    match request.status {
        RequestStatus::Assigned => Ok(CascadePlan::new(now)
            .push(PlannedWrite::CompleteRequest {
                request_id: request.id,
            })
            .push(PlannedWrite::DeleteMatchesForRequest {
                request_id: request.id,
            })),
        other => Err(ModerationError::InvalidTransition(format!(
            "cannot complete a request in status {}",
            other
        ))),
    }
}
