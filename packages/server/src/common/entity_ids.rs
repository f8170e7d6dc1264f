//! Typed ID definitions for all domain entities.
//!
//! # Example
//!
//! ```rust
//! use server_core::common::{InvestigatorId, RequestId};
//!
//! // These are incompatible types - compiler prevents mixing them up
//! let investigator_id: InvestigatorId = InvestigatorId::new();
//! let request_id: RequestId = RequestId::new();
//!
//! // This would be a compile error:
//! // let wrong: RequestId = investigator_id;
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities (identity records).
pub struct User;

/// Marker type for CustomerProfile entities.
pub struct CustomerProfile;

/// Marker type for InvestigatorProfile entities.
pub struct InvestigatorProfile;

/// Marker type for InvestigationRequest entities (customer cases).
pub struct InvestigationRequest;

/// Marker type for InvestigatorMatch entities (request/investigator pairings).
pub struct InvestigatorMatch;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for User entities.
pub type UserId = Id<User>;

/// Typed ID for CustomerProfile entities.
pub type CustomerId = Id<CustomerProfile>;

/// Typed ID for InvestigatorProfile entities.
pub type InvestigatorId = Id<InvestigatorProfile>;

/// Typed ID for InvestigationRequest entities.
pub type RequestId = Id<InvestigationRequest>;

/// Typed ID for InvestigatorMatch entities.
pub type MatchId = Id<InvestigatorMatch>;
