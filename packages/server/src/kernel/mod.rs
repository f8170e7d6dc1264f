// Infrastructure layer: dependency container, trait definitions, audit sink

pub mod audit;
pub mod deps;
pub mod traits;

pub use audit::{record_async, AuditEvent, BaseAuditRecorder, NoopAuditRecorder, PostgresAuditRecorder};
pub use deps::ServerDeps;
pub use traits::{BaseTokenVerifier, TokenPayload};
