use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Executor credentials checked by the Basic-auth middleware.
#[derive(Clone)]
pub struct AuthState {
    executor_id: String,
    executor_password: String,
}

impl AuthState {
    #[must_use]
    pub fn new(executor_id: String, executor_password: String) -> Self {
        Self {
            executor_id,
            executor_password,
        }
    }

    #[must_use]
    pub fn from_config(config: &stocksync_core::AppConfig) -> Self {
        Self::new(config.executor_id.clone(), config.executor_password.clone())
    }

    /// Constant-time comparison of both credential halves.
    fn allows(&self, id: &str, password: &str) -> bool {
        let id_ok: bool = id.as_bytes().ct_eq(self.executor_id.as_bytes()).into();
        let password_ok: bool = password
            .as_bytes()
            .ct_eq(self.executor_password.as_bytes())
            .into();
        id_ok && password_ok
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("executor_id", &self.executor_id)
            .field("executor_password", &"[redacted]")
            .finish()
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

impl IntoResponse for MiddlewareErrorBody {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
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

/// Middleware enforcing HTTP Basic auth against the executor credentials.
pub async fn require_basic_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    match decode_basic_credentials(req.headers().get(AUTHORIZATION)) {
        Some((id, password)) if auth.allows(&id, &password) => next.run(req).await,
        _ => MiddlewareErrorBody {
            error: MiddlewareError {
                code: "unauthorized",
                message: "missing or invalid credentials",
            },
        }
        .into_response(),
    }
}

/// Parses `Authorization: Basic base64(id:password)` into its two halves.
///
/// Rejects headers with a different scheme, undecodable payloads, and
/// payloads with anything other than exactly one `:` separator.
fn decode_basic_credentials(value: Option<&HeaderValue>) -> Option<(String, String)> {
    let raw = value?.to_str().ok()?;
    let encoded = raw.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    let mut parts = decoded.split(':');
    let id = parts.next()?;
    let password = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    Some((id.to_owned(), password.to_owned()))
}
