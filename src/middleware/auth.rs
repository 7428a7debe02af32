use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated admin context extracted from the bearer token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthAdmin {
    pub admin_id: Uuid,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Bearer Token not provided")]
    MissingToken,

    #[error("Bearer not provided")]
    MalformedHeader,

    #[error("Token not provided")]
    EmptyToken,
}

impl From<BearerError> for ApiError {
    fn from(err: BearerError) -> Self {
        ApiError::unauthorized(err.to_string())
    }
}

/// JWT authentication middleware that validates tokens and injects `AuthAdmin`
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(|e| {
        tracing::warn!("Rejected request to {}: {}", request.uri().path(), e);
        ApiError::from(e)
    })?;

    let admin_id = state.tokens.verify(token)?;

    request.extensions_mut().insert(AuthAdmin { admin_id });
    Ok(next.run(request).await)
}

/// Extract the token segment from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(BearerError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| BearerError::MalformedHeader)?;
    if auth_str.trim().is_empty() {
        return Err(BearerError::MissingToken);
    }

    let (scheme, token) = auth_str.trim().split_once(' ').unwrap_or((auth_str.trim(), ""));
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(BearerError::MalformedHeader);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(BearerError::EmptyToken);
    }
    Ok(token)
}
