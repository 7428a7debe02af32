use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::images::{CloudinaryImageStore, ImageStoreError, SharedImageStore};

/// Shared application state. Everything in here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: TokenService,
    pub images: Option<SharedImageStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, ImageStoreError> {
        let images = match &config.images {
            Some(image_config) => {
                Some(Arc::new(CloudinaryImageStore::new(image_config)?) as SharedImageStore)
            }
            None => None,
        };

        Ok(Self::with_image_store(config, pool, images))
    }

    /// Build state around an explicit image store (or none).
    pub fn with_image_store(config: AppConfig, pool: PgPool, images: Option<SharedImageStore>) -> Self {
        let tokens = TokenService::new(
            &config.security.jwt_secret,
            Duration::minutes(config.security.jwt_expiry_minutes),
        );

        Self {
            pool,
            tokens,
            images,
            config: Arc::new(config),
        }
    }
}
