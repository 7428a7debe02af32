use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::database::models::{Product, ProductWithVariants};
use crate::database::{ListQuery, Pagination};
use crate::handlers::utils::{json_body, parse_id, require};
use crate::middleware::response::{ApiResponse, ApiResult, Message};
use crate::middleware::AuthAdmin;
use crate::services::CatalogService;
use crate::state::AppState;

/// Body for both create and update. Update replaces both fields.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

impl ProductRequest {
    fn validate(&self) -> Result<(), crate::error::ApiError> {
        require("name", &self.name)?;
        require("imageUrl", &self.image_url)
    }
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthAdmin>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let request = json_body(body)?;
    request.validate()?;

    CatalogService::from_state(&state)
        .create_product(&admin, &request.name, &request.image_url)
        .await?;

    Ok(ApiResponse::created_message("Product created successfully"))
}

/// GET /api/products?page&pageSize&search
///
/// `pageSize` is clamped to `PAGINATION_MAX_PAGE_SIZE` (1000 unless configured).
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Product>> {
    let pagination = Pagination::from_query(&query, state.config.database.max_page_size);

    let products = CatalogService::from_state(&state)
        .list_products(pagination, query.search.as_deref())
        .await?;

    Ok(ApiResponse::success(products))
}

/// GET /api/products/:id - product with its variants
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ProductWithVariants> {
    let id = parse_id("Product", &id)?;
    let product = CatalogService::from_state(&state).get_product(id).await?;
    Ok(ApiResponse::success(product))
}

/// PUT /api/products/:id - owner only
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthAdmin>,
    Path(id): Path<String>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let request = json_body(body)?;
    request.validate()?;
    let id = parse_id("Product", &id)?;

    CatalogService::from_state(&state)
        .update_product(&admin, id, &request.name, &request.image_url)
        .await?;

    Ok(ApiResponse::message("Product updated successfully"))
}

/// DELETE /api/products/:id - owner only; cascades to variants and the hosted image
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthAdmin>,
    Path(id): Path<String>,
) -> ApiResult<Message> {
    let id = parse_id("Product", &id)?;

    CatalogService::from_state(&state).delete_product(&admin, id).await?;

    Ok(ApiResponse::message("Product deleted successfully"))
}
