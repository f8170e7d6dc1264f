// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "approve investigator") lives in domain actions that
// consume these traits.
//
// Naming convention: Base* for trait names (e.g., BaseTokenVerifier)

use async_trait::async_trait;

use crate::common::{Role, UserId};

// =============================================================================
// Token verification (Infrastructure - opaque bearer token -> identity)
// =============================================================================

/// Payload extracted from a verified bearer token.
#[derive(Debug, Clone, Copy)]
pub struct TokenPayload {
    pub user_id: UserId,
    pub role: Role,
}

/// External token-verification service.
///
/// `None` means the token is missing, malformed or unverifiable; the
/// capability gate treats that as unauthenticated. The concrete
/// implementation (JWT, see `domains::auth::JwtService`) is consumed only
/// through this trait so tests can substitute their own verifier.
#[async_trait]
pub trait BaseTokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Option<TokenPayload>;
}
