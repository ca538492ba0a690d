use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// The static shared secret guarding the retrain endpoint.
///
/// A single token, not a key set. Comparison is constant-time.
#[derive(Debug, Clone)]
pub struct RetrainAuth {
    token: Option<Arc<str>>,
}

impl RetrainAuth {
    /// Builds the auth state from the configured token.
    ///
    /// A missing token disables the check in development; the config
    /// loader already refuses to start without one outside development.
    #[must_use]
    pub fn new(token: Option<&str>) -> Self {
        if token.is_none() {
            tracing::warn!("GRAMPULSE_RETRAIN_TOKEN not set; retrain endpoint is unauthenticated");
        }
        Self {
            token: token.map(Arc::from),
        }
    }

    fn allows(&self, presented: Option<&str>) -> bool {
        match (&self.token, presented) {
            (None, _) => true,
            (Some(expected), Some(presented)) => {
                // Constant-time compare; differing lengths short-circuit
                // inside ct_eq itself, not here.
                expected.as_bytes().ct_eq(presented.as_bytes()).into()
            }
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is
/// used; otherwise a new UUIDv4 is generated. The ID is inserted into
/// request extensions as [`RequestId`] and echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the retrain shared secret as a bearer token.
pub async fn require_retrain_secret(
    State(auth): State<RetrainAuth>,
    req: Request,
    next: Next,
) -> Response {
    let token = extract_bearer_token(req.headers().get(AUTHORIZATION));

    if auth.allows(token) {
        next.run(req).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(MiddlewareErrorBody {
                error: MiddlewareError {
                    code: "unauthorized",
                    message: "missing or invalid retrain token",
                },
            }),
        )
            .into_response()
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
