use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Product, ProductWithVariants, Variant};
use crate::database::products::{self, NewProduct, ProductChanges};
use crate::database::variants::{self, NewVariant, VariantChanges};
use crate::database::{DatabaseError, Pagination};
use crate::error::ApiError;
use crate::images::SharedImageStore;
use crate::middleware::{authorize, AuthAdmin};
use crate::state::AppState;

/// Product and variant operations. Every write runs in a single transaction
/// that is rolled back on drop unless it reaches `commit`.
pub struct CatalogService {
    pool: PgPool,
    images: Option<SharedImageStore>,
}

impl CatalogService {
    pub fn new(pool: PgPool, images: Option<SharedImageStore>) -> Self {
        Self { pool, images }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.pool.clone(), state.images.clone())
    }

    /// Canonical URL to persist for a submitted image reference
    async fn host_image(&self, source: &str) -> Result<String, ApiError> {
        match &self.images {
            Some(store) => Ok(store.upload(source).await?),
            None => Ok(source.to_string()),
        }
    }

    // ----- products -------------------------------------------------------

    pub async fn create_product(
        &self,
        admin: &AuthAdmin,
        name: &str,
        image_url: &str,
    ) -> Result<Product, ApiError> {
        let hosted_url = self.host_image(image_url).await?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let product = products::insert(
            &mut *tx,
            &NewProduct {
                name,
                image_url: &hosted_url,
                admin_id: admin.admin_id,
            },
        )
        .await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        tracing::info!("Admin {} created product {}", admin.admin_id, product.id);
        Ok(product)
    }

    pub async fn list_products(
        &self,
        pagination: Pagination,
        search: Option<&str>,
    ) -> Result<Vec<Product>, ApiError> {
        Ok(products::list(&self.pool, pagination, search).await?)
    }

    pub async fn get_product(&self, id: Uuid) -> Result<ProductWithVariants, ApiError> {
        let product = products::find_by_id(&self.pool, id).await?;
        let variants = variants::list_by_product(&self.pool, id).await?;
        Ok(ProductWithVariants { product, variants })
    }

    /// Replace name and image. The image is re-hosted only when the submitted
    /// URL differs from the stored one.
    pub async fn update_product(
        &self,
        admin: &AuthAdmin,
        id: Uuid,
        name: &str,
        image_url: &str,
    ) -> Result<Product, ApiError> {
        let existing = products::find_by_id(&self.pool, id).await?;
        authorize(admin, &existing)?;

        let image_url = if existing.image_url != image_url {
            self.host_image(image_url).await?
        } else {
            existing.image_url.clone()
        };

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let product = products::update(
            &mut *tx,
            id,
            &ProductChanges {
                name,
                image_url: &image_url,
            },
        )
        .await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(product)
    }

    /// Delete variants, then the product, then the hosted image, all before
    /// a single commit. An image host failure rolls the rows back.
    pub async fn delete_product(&self, admin: &AuthAdmin, id: Uuid) -> Result<(), ApiError> {
        let product = products::find_by_id(&self.pool, id).await?;
        authorize(admin, &product)?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let existing_variants = variants::list_by_product(&mut *tx, id).await?;
        if !existing_variants.is_empty() {
            let removed = variants::delete_by_product(&mut *tx, id).await?;
            tracing::debug!("Removed {} variants of product {}", removed, id);
        }

        products::delete(&mut *tx, id).await?;

        if let Some(store) = &self.images {
            store.delete(&product.image_url).await?;
        }

        tx.commit().await.map_err(DatabaseError::from)?;

        tracing::info!("Admin {} deleted product {}", admin.admin_id, id);
        Ok(())
    }

    // ----- variants -------------------------------------------------------

    pub async fn create_variant(
        &self,
        admin: &AuthAdmin,
        product_id: Uuid,
        variant_name: &str,
        quantity: i32,
    ) -> Result<Variant, ApiError> {
        let product = products::find_by_id(&self.pool, product_id).await?;
        authorize(admin, &product)?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let variant = variants::insert(
            &mut *tx,
            &NewVariant {
                variant_name,
                quantity,
                product_id,
            },
        )
        .await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(variant)
    }

    pub async fn list_variants(
        &self,
        pagination: Pagination,
        search: Option<&str>,
        product_id: Option<Uuid>,
    ) -> Result<Vec<Variant>, ApiError> {
        Ok(variants::list(&self.pool, pagination, search, product_id).await?)
    }

    pub async fn get_variant(&self, id: Uuid) -> Result<Variant, ApiError> {
        Ok(variants::find_by_id(&self.pool, id).await?)
    }

    pub async fn update_variant(
        &self,
        admin: &AuthAdmin,
        id: Uuid,
        variant_name: &str,
        quantity: i32,
    ) -> Result<Variant, ApiError> {
        self.authorize_variant(admin, id).await?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let variant = variants::update(&mut *tx, id, &VariantChanges { variant_name, quantity }).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(variant)
    }

    pub async fn delete_variant(&self, admin: &AuthAdmin, id: Uuid) -> Result<(), ApiError> {
        self.authorize_variant(admin, id).await?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        variants::delete(&mut *tx, id).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        Ok(())
    }

    /// Variants carry no admin; ownership goes through the parent product.
    async fn authorize_variant(&self, admin: &AuthAdmin, id: Uuid) -> Result<Variant, ApiError> {
        let variant = variants::find_by_id(&self.pool, id).await?;
        let product = products::find_by_id(&self.pool, variant.product_id).await?;
        authorize(admin, &product)?;
        Ok(variant)
    }
}
