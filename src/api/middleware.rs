//! Authentication Middleware
//!
//! Validates bearer session tokens on protected endpoints and exposes the
//! verified identity to handlers via request extensions.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::service::{SessionIdentity, TokenService};
use crate::utils::error::AppError;

/// Extension type carrying the authenticated identity
#[derive(Debug, Clone)]
pub struct AuthUser(pub SessionIdentity);

/// Bearer-token middleware for protected routes
///
/// A missing or non-Bearer Authorization header is treated as an absent
/// credential (401 "Access Denied"); a present but unverifiable token is
/// rejected with 403 "Invalid token".
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Authentication("Access Denied".into()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Authentication("Access Denied".into()))?;

    let identity = tokens
        .verify(token)
        .map_err(|_| AppError::Forbidden("Invalid token".into()))?;

    request.extensions_mut().insert(AuthUser(identity));

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use tower::util::ServiceExt;

    fn test_tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new("test_secret_key".to_string()))
    }

    async fn test_handler(Extension(user): Extension<AuthUser>) -> String {
        user.0.email
    }

    fn test_app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route("/test", get(test_handler))
            .layer(from_fn_with_state(tokens, auth_middleware))
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let app = test_app(test_tokens());

        let request = HttpRequest::builder()
            .method(Method::GET)
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_header_is_unauthorized() {
        let app = test_app(test_tokens());

        let request = HttpRequest::builder()
            .method(Method::GET)
            .uri("/test")
            .header(AUTHORIZATION, "Basic abc123")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_forbidden() {
        let app = test_app(test_tokens());

        let request = HttpRequest::builder()
            .method(Method::GET)
            .uri("/test")
            .header(AUTHORIZATION, "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_token_passes_identity_through() {
        let tokens = test_tokens();
        let token = tokens.issue("alice@example.com").unwrap();
        let app = test_app(tokens);

        let request = HttpRequest::builder()
            .method(Method::GET)
            .uri("/test")
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
