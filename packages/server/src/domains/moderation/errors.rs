use thiserror::Error;

use crate::common::AuthError;

/// Error taxonomy for lifecycle and moderation operations.
///
/// Every variant maps to a stable machine-readable code (see [`code`])
/// relayed verbatim in HTTP error bodies. Only `Storage` is retryable;
/// everything else is a terminal outcome for the request that produced it.
///
/// [`code`]: ModerationError::code
#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Investigator profile is already approved")]
    AlreadyApproved,

    #[error("Investigator is not eligible for assignment")]
    InvestigatorNotEligible,

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Storage error")]
    Storage(#[from] sqlx::Error),
}

impl ModerationError {
    /// Stable wire code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ModerationError::Unauthenticated => "unauthenticated",
            ModerationError::Forbidden(_) => "forbidden",
            ModerationError::InvalidId(_) => "invalid_id",
            ModerationError::NotFound(_) => "not_found",
            ModerationError::AlreadyApproved => "already_approved",
            ModerationError::InvestigatorNotEligible => "investigator_not_eligible",
            ModerationError::InvalidTransition(_) => "invalid_transition",
            ModerationError::Storage(_) => "storage_error",
        }
    }

    /// Whether the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ModerationError::Storage(_))
    }
}

impl From<AuthError> for ModerationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationRequired | AuthError::InvalidToken => {
                ModerationError::Unauthenticated
            }
            AuthError::PermissionDenied(capability) => ModerationError::Forbidden(capability),
        }
    }
}
