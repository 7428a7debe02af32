//! External image hosting.
//!
//! Product images are handed to an [`ImageStore`] which re-hosts the source
//! URL and returns a canonical URL to persist. The store is optional: with no
//! backend configured the submitted URL is stored unchanged and nothing is
//! deleted remotely.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod cloudinary;

pub use cloudinary::CloudinaryImageStore;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("upload failed: {0}")]
    Upload(String),

    #[error("delete failed: {0}")]
    Delete(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Re-host `source` and return the canonical URL to store.
    async fn upload(&self, source: &str) -> Result<String, ImageStoreError>;

    /// Remove a previously uploaded image, identified by its stored URL.
    async fn delete(&self, image_url: &str) -> Result<(), ImageStoreError>;
}

pub type SharedImageStore = Arc<dyn ImageStore>;
