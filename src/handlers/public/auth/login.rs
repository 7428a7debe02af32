// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handlers::utils::{json_body, require};
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "adminID")]
    pub admin_id: Uuid,
    pub token: String,
}

/// POST /api/auth/login - authenticate an admin and receive a JWT
///
/// Input: `{ "email", "password" }`
/// Output (200): `{ "adminID": "...", "token": "eyJhbGciOiJIUzI1NiI..." }`
///
/// The token is valid for 30 minutes; there is no refresh.
pub async fn login_post(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let request = json_body(body)?;
    require("email", &request.email)?;
    require("password", &request.password)?;

    let result = AuthService::new(state.pool.clone(), state.tokens.clone())
        .login(&request.email, &request.password)
        .await?;

    Ok(ApiResponse::success(LoginResponse {
        admin_id: result.admin_id,
        token: result.token,
    }))
}
