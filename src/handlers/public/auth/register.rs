// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::utils::{json_body, require};
use crate::middleware::response::{ApiResponse, ApiResult, Message};
use crate::services::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_check: String,
}

impl RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("password", &self.password)?;
        require("passwordCheck", &self.password_check)?;

        if !self.email.contains('@') {
            return Err(ApiError::bad_request("Invalid email"));
        }
        if self.password != self.password_check {
            return Err(ApiError::bad_request("Password not match"));
        }
        Ok(())
    }
}

/// POST /api/auth/register - create an admin account
///
/// Input: `{ "name", "email", "password", "passwordCheck" }`
/// Output (201): `{ "message": "Admin created successfully" }`
pub async fn register_post(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let request = json_body(body)?;
    request.validate()?;

    AuthService::new(state.pool.clone(), state.tokens.clone())
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok(ApiResponse::created_message("Admin created successfully"))
}
