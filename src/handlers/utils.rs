use axum::extract::rejection::JsonRejection;
use axum::Json;
use uuid::Uuid;

use crate::error::ApiError;

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Unwrap a JSON body, turning any extractor rejection into a 400
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from)
}

/// Reject blank required string fields
pub fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} is required", field)));
    }
    Ok(())
}

/// Parse a path identifier, e.g. `parse_id("Product", raw)`
pub fn parse_id(entity: &str, raw: &str) -> Result<Uuid, ApiError> {
    if raw.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} ID not provided", entity)));
    }
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::bad_request(format!("Invalid {} ID", entity)))
}
