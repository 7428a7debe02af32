use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Variant;
use crate::database::{ListQuery, Pagination};
use crate::error::ApiError;
use crate::handlers::utils::{json_body, parse_id, require};
use crate::middleware::response::{ApiResponse, ApiResult, Message};
use crate::middleware::AuthAdmin;
use crate::services::CatalogService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateVariantRequest {
    #[serde(rename = "variantName")]
    pub variant_name: String,
    pub quantity: i32,
    #[serde(rename = "productID")]
    pub product_id: Uuid,
}

/// Full replacement of name and quantity
#[derive(Debug, Deserialize)]
pub struct UpdateVariantRequest {
    #[serde(rename = "variantName")]
    pub variant_name: String,
    pub quantity: i32,
}

fn validate_fields(variant_name: &str, quantity: i32) -> Result<(), ApiError> {
    require("variantName", variant_name)?;
    if quantity < 0 {
        return Err(ApiError::bad_request("quantity must not be negative"));
    }
    Ok(())
}

/// POST /api/products/variants - requires ownership of the parent product
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthAdmin>,
    body: Result<Json<CreateVariantRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let request = json_body(body)?;
    validate_fields(&request.variant_name, request.quantity)?;

    CatalogService::from_state(&state)
        .create_variant(&admin, request.product_id, &request.variant_name, request.quantity)
        .await?;

    Ok(ApiResponse::created_message("Variant created successfully"))
}

/// GET /api/products/variants?page&pageSize&search&productID
///
/// `pageSize` is clamped to `PAGINATION_MAX_PAGE_SIZE` (1000 unless configured).
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Variant>> {
    let pagination = Pagination::from_query(&query, state.config.database.max_page_size);
    let product_id = match query.product_id.as_deref() {
        Some(raw) if !raw.is_empty() => Some(parse_id("Product", raw)?),
        _ => None,
    };

    let variants = CatalogService::from_state(&state)
        .list_variants(pagination, query.search.as_deref(), product_id)
        .await?;

    Ok(ApiResponse::success(variants))
}

/// GET /api/products/variants/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Variant> {
    let id = parse_id("Variant", &id)?;
    let variant = CatalogService::from_state(&state).get_variant(id).await?;
    Ok(ApiResponse::success(variant))
}

/// PUT /api/products/variants/:id
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthAdmin>,
    Path(id): Path<String>,
    body: Result<Json<UpdateVariantRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let request = json_body(body)?;
    validate_fields(&request.variant_name, request.quantity)?;
    let id = parse_id("Variant", &id)?;

    CatalogService::from_state(&state)
        .update_variant(&admin, id, &request.variant_name, request.quantity)
        .await?;

    Ok(ApiResponse::message("Variant updated successfully"))
}

/// DELETE /api/products/variants/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthAdmin>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let id = parse_id("Variant", &id)?;

    CatalogService::from_state(&state).delete_variant(&admin, id).await?;

    Ok(ApiResponse::message("Variant deleted successfully"))
}
