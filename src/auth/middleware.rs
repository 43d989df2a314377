use crate::types::{AppError, AuthError, Identity, LoginRequest, Result, TokenResponse};
use crate::AppState;
use axum::{
    body::to_bytes,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{debug, error, info, warn};

/// Scheme prefix of the `Authorization` header, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Largest login body the login interceptor will read.
pub const MAX_LOGIN_BODY_BYTES: usize = 16 * 1024;

/// Identity bound to a single request by the token interceptor.
///
/// Lives in the request extensions and is dropped with the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestIdentity {
    #[default]
    Anonymous,
    Authenticated(Identity),
}

impl RequestIdentity {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            RequestIdentity::Anonymous => None,
            RequestIdentity::Authenticated(identity) => Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, RequestIdentity::Authenticated(_))
    }
}

/// Extracts the bearer token from the `Authorization` header, if any.
///
/// Headers using another scheme count as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
}

/// Login interceptor.
///
/// Active only on the configured login path. Without a bearer header the
/// body is read as a [`LoginRequest`], exchanged for a token and answered
/// directly; failures are answered with 401 and never escalated. With a
/// bearer header already present the request falls through to the route.
pub async fn login_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    if req.uri().path() != state.config.auth.login_path || bearer_token(req.headers()).is_some() {
        return next.run(req).await;
    }

    match exchange_credentials(&state, req).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn exchange_credentials(state: &AppState, req: Request) -> Result<Response> {
    let body = to_bytes(req.into_body(), MAX_LOGIN_BODY_BYTES)
        .await
        .map_err(|e| {
            warn!("Unreadable login body: {}", e);
            AuthError::BadCredentials
        })?;

    let credentials: LoginRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Malformed login body: {}", e);
        AuthError::BadCredentials
    })?;

    let identity = state
        .credentials
        .authenticate(&credentials.username, &credentials.password)
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Auth(_)) {
                warn!(principal = %credentials.username, "Login rejected");
            }
        })?;

    let token = state.tokens.issue(&identity, Utc::now())?;
    let header = HeaderValue::from_str(&format!("{}{}", BEARER_PREFIX, token))
        .map_err(|e| AppError::Internal(format!("Token is not a valid header value: {}", e)))?;

    info!(principal = %identity.principal, "Issued token");

    let body = TokenResponse {
        access_token: token,
        token_type: BEARER_PREFIX.trim_end().to_string(),
        expires_in: state.tokens.ttl_secs(),
    };

    Ok(([(AUTHORIZATION, header)], Json(body)).into_response())
}

/// Token interceptor.
///
/// Active on every path except the login path. Binds a [`RequestIdentity`]
/// and always forwards the request; rejecting anonymous callers is the
/// authorization guard's job. When a presented token fails validation the
/// identity stays anonymous and the final response is replaced with the
/// "not acceptable" rejection, keeping "bad token" distinct from "no token".
pub async fn token_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if req.uri().path() == state.config.auth.login_path {
        return next.run(req).await;
    }

    let Some(token) = bearer_token(req.headers()).map(str::to_owned) else {
        req.extensions_mut().insert(RequestIdentity::Anonymous);
        return next.run(req).await;
    };

    match state.tokens.verify(&token, Utc::now()).await {
        Ok(claims) => {
            debug!(principal = %claims.username, "Bound request identity");
            req.extensions_mut()
                .insert(RequestIdentity::Authenticated(claims.into()));
            next.run(req).await
        }
        Err(e) => {
            match &e {
                AppError::Auth(reason) if reason.is_token_failure() => {
                    warn!(%reason, "Rejected bearer token")
                }
                other => error!("Token validation failed: {}", other),
            }
            req.extensions_mut().insert(RequestIdentity::Anonymous);
            // forwarded as anonymous; its response is replaced by the rejection
            let _discarded = next.run(req).await;
            e.into_response()
        }
    }
}

/// Extractor for the authenticated caller.
///
/// Rejects with `NotAuthenticated` when no identity is bound.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestIdentity>()
            .and_then(RequestIdentity::identity)
            .cloned()
            .map(CurrentIdentity)
            .ok_or(AppError::Auth(AuthError::NotAuthenticated))
    }
}
