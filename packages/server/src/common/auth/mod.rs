/// Authorization module for Caseline
///
/// Provides a fluent API for capability checks in action code:
///
/// ```rust,ignore
/// use crate::common::{Actor, Capability};
///
/// // In an action:
/// let caller = Actor::new(actor_id, role)
///     .can(Capability::ModerateInvestigators)
///     .check()?;
/// ```
///
/// This pattern keeps authorization logic next to the orchestrator actions
/// where it belongs, not scattered across route handlers.
mod capability;
mod errors;
mod gate;

pub use capability::Capability;
pub use errors::AuthError;
pub use gate::{Actor, CallerContext, CapabilityCheck};
