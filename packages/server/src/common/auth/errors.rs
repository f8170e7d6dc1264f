use thiserror::Error;

/// Authorization errors for the Caseline platform
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid or expired token")]
    InvalidToken,
}
