// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod id;
pub mod types;

pub use auth::{Actor, AuthError, CallerContext, Capability};
pub use entity_ids::*;
pub use id::Id;
pub use types::*;
