use super::{AuthError, Capability};
use crate::common::{Role, UserId};

/// Verified caller identity handed to orchestrator actions once a
/// capability check has passed.
#[derive(Debug, Clone, Copy)]
pub struct CallerContext {
    pub user_id: UserId,
    pub role: Role,
}

/// Entry point for authorization checks
///
/// Usage:
/// ```
/// use server_core::common::{Actor, Capability, Role, UserId};
///
/// # fn authorize(actor_id: UserId, role: Role) -> Result<(), server_core::common::AuthError> {
/// let caller = Actor::new(actor_id, role)
///     .can(Capability::ModerateInvestigators)
///     .check()?;
/// # Ok(())
/// # }
/// ```
pub struct Actor {
    actor_id: UserId,
    role: Role,
}

impl Actor {
    /// Create a new actor for authorization checks
    ///
    /// # Arguments
    /// * `actor_id` - The user ID of the actor
    /// * `role` - Role from the verified token payload (already validated
    ///   during authentication)
    pub fn new(actor_id: UserId, role: Role) -> Self {
        Self { actor_id, role }
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityCheck {
        CapabilityCheck {
            actor_id: self.actor_id,
            role: self.role,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityCheck {
    actor_id: UserId,
    role: Role,
    capability: Capability,
}

impl CapabilityCheck {
    /// Perform the authorization check.
    ///
    /// The role comes from the token payload, which was verified
    /// cryptographically during authentication; no store access is needed
    /// to resolve capabilities, so this check is pure.
    pub fn check(self) -> Result<CallerContext, AuthError> {
        if !self.capability.granted_to(self.role) {
            return Err(AuthError::PermissionDenied(
                self.capability.as_str().to_string(),
            ));
        }

        Ok(CallerContext {
            user_id: self.actor_id,
            role: self.role,
        })
    }
}
