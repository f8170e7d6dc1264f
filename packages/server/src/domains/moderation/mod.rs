// Lifecycle & moderation core: pure transition planning (machines),
// transactional orchestration (actions), and the shared error taxonomy.

pub mod actions;
pub mod errors;
pub mod machines;

pub use errors::ModerationError;
