use axum::{middleware::Next, response::Response};
use std::sync::Arc;
use tracing::debug;

use crate::common::{Role, UserId};
use crate::kernel::BaseTokenVerifier;

/// Authenticated user information from a verified bearer token
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
    pub user_id: UserId,
    pub role: Role,
}

/// Bearer-token authentication middleware
///
/// Extracts the token from the Authorization header, verifies it, and adds
/// AuthUser to request extensions. If no token or invalid token, the
/// request continues without AuthUser (public access); handlers that need
/// an identity reject the request themselves.
pub async fn jwt_auth_middleware(
    verifier: Arc<dyn BaseTokenVerifier>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    // Pull the token out to an owned value before awaiting so no borrow of
    // the (non-Sync) request is held across the await point - the resulting
    // future must be Send to run behind `middleware::from_fn`.
    let payload = match bearer_token(&request) {
        Some(token) => verifier.verify(&token).await,
        None => None,
    };

    if let Some(payload) = payload {
        let user = AuthUser {
            user_id: payload.user_id,
            role: payload.role,
        };
        debug!("Authenticated user: {} ({})", user.user_id, user.role);
        request.extensions_mut().insert(user);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract the bearer token from the Authorization header, if present.
///
/// Handles both `Bearer <token>` and a raw token value. Returns an owned
/// string so callers can drop the request borrow before awaiting.
fn bearer_token(request: &axum::http::Request<axum::body::Body>) -> Option<String> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    Some(auth_str.strip_prefix("Bearer ").unwrap_or(auth_str).to_owned())
}

/// Extract and verify the bearer token from a request.
#[cfg(test)]
async fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    verifier: &dyn BaseTokenVerifier,
) -> Option<AuthUser> {
    let token = bearer_token(request)?;

    let payload = verifier.verify(&token).await?;

    Some(AuthUser {
        user_id: payload.user_id,
        role: payload.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::JwtService;

    fn service() -> JwtService {
        JwtService::new("test_secret", "test_issuer".to_string())
    }

    #[tokio::test]
    async fn test_extract_token_with_bearer() {
        let jwt = service();
        let user_id = UserId::new();
        let token = jwt.create_token(user_id, Role::Admin).unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {}", token))
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &jwt).await;
        assert_eq!(auth_user.unwrap().user_id, user_id);
    }

    #[tokio::test]
    async fn test_extract_token_without_bearer() {
        let jwt = service();
        let user_id = UserId::new();
        let token = jwt.create_token(user_id, Role::Customer).unwrap();

        let request = axum::http::Request::builder()
            .header("authorization", token)
            .body(axum::body::Body::empty())
            .unwrap();

        let auth_user = extract_auth_user(&request, &jwt).await;
        assert_eq!(auth_user.unwrap().user_id, user_id);
    }

    #[tokio::test]
    async fn test_no_auth_header() {
        let jwt = service();
        let request = axum::http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &jwt).await.is_none());
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let jwt = service();
        let request = axum::http::Request::builder()
            .header("authorization", "Bearer invalid_token")
            .body(axum::body::Body::empty())
            .unwrap();

        assert!(extract_auth_user(&request, &jwt).await.is_none());
    }
}
