use crate::core::error::AppError;
use crate::features::auth::JwtValidator;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::now_v7().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Returns true when the `Authorization: Basic ...` header carries exactly `expected`
fn basic_credentials_match(auth_header: Option<&str>, expected: &str) -> bool {
    auth_header
        .and_then(|h| h.strip_prefix("Basic "))
        .and_then(|encoded| BASE64_STANDARD.decode(encoded).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .is_some_and(|creds| creds == expected)
}

/// HTTP basic auth in front of the Swagger UI
pub async fn basic_auth_middleware(
    State(credentials): State<Arc<String>>,
    req: Request,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if basic_credentials_match(auth_header, &credentials) {
        return next.run(req).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
        Body::from("Unauthorized"),
    )
        .into_response()
}

pub async fn auth_middleware(
    State(validator): State<Arc<JwtValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let user = validator.validate_token(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::auth::model::{AuthenticatedUser, Claims};
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::Duration;

    fn protected_server() -> TestServer {
        let validator = Arc::new(JwtValidator::new(&AuthConfig {
            jwt_secret: "middleware-secret".to_string(),
            issuer: None,
            jwt_leeway: Duration::from_secs(0),
        }));
        let router = Router::new()
            .route("/me", get(|user: AuthenticatedUser| async move { user.user_id }))
            .route_layer(from_fn_with_state(validator, auth_middleware));
        TestServer::new(router).unwrap()
    }

    fn bearer(sub: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + 600) as u64,
            iat: None,
            iss: None,
            roles: Vec::new(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"middleware-secret"),
        )
        .unwrap();
        format!("Bearer {}", token)
    }

    #[tokio::test]
    async fn test_auth_middleware_injects_user() {
        let server = protected_server();
        let response = server
            .get("/me")
            .add_header(header::AUTHORIZATION, bearer("user-42"))
            .await;
        response.assert_status_ok();
        response.assert_text("user-42");
    }

    #[tokio::test]
    async fn test_auth_middleware_rejects_missing_or_malformed_header() {
        let server = protected_server();
        server.get("/me").await.assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/me")
            .add_header(header::AUTHORIZATION, "Token abc")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        server
            .get("/me")
            .add_header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_basic_credentials_match() {
        let encoded = BASE64_STANDARD.encode("admin:secret");
        let header = format!("Basic {}", encoded);

        assert!(basic_credentials_match(Some(&header), "admin:secret"));
        assert!(!basic_credentials_match(Some(&header), "admin:other"));
        assert!(!basic_credentials_match(Some("Bearer abc"), "admin:secret"));
        assert!(!basic_credentials_match(None, "admin:secret"));
    }

    #[test]
    fn test_make_request_id_is_uuid() {
        let request = axum::http::Request::new(());
        let id = MakeRequestUuid
            .make_request_id(&request)
            .expect("request id should be generated");
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }
}
