use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ImageStore, ImageStoreError};
use crate::config::ImageHostConfig;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary upload API client (signed requests, SHA-256 signatures)
pub struct CloudinaryImageStore {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryImageStore {
    pub fn new(config: &ImageHostConfig) -> Result<Self, ImageStoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", API_BASE, self.cloud_name, action)
    }

    /// Form body for a signed call: the given params plus timestamp,
    /// api_key, signature and signature_algorithm.
    fn signed_form(&self, params: &[(&str, String)]) -> Vec<(String, String)> {
        let mut signed: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        signed.push(("timestamp".to_string(), Utc::now().timestamp().to_string()));

        let signature = sign(&signed, &self.api_secret);
        signed.push(("api_key".to_string(), self.api_key.clone()));
        signed.push(("signature".to_string(), signature));
        signed.push(("signature_algorithm".to_string(), "sha256".to_string()));
        signed
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorResponse>().await {
            Ok(body) => format!("{}: {}", status, body.error.message),
            Err(_) => status.to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for CloudinaryImageStore {
    async fn upload(&self, source: &str) -> Result<String, ImageStoreError> {
        let mut form = self.signed_form(&[]);
        form.push(("file".to_string(), source.to_string()));

        let response = self.client.post(self.endpoint("upload")).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(ImageStoreError::Upload(Self::error_message(response).await));
        }

        let body: UploadResponse = response.json().await?;
        info!("Uploaded image to {}", body.secure_url);
        Ok(body.secure_url)
    }

    async fn delete(&self, image_url: &str) -> Result<(), ImageStoreError> {
        let Some(public_id) = public_id_from_url(image_url) else {
            warn!("Skipping remote delete of non-hosted image {}", image_url);
            return Ok(());
        };
        let form = self.signed_form(&[("public_id", public_id.clone())]);

        let response = self.client.post(self.endpoint("destroy")).form(&form).send().await?;
        if !response.status().is_success() {
            return Err(ImageStoreError::Delete(Self::error_message(response).await));
        }

        let body: DestroyResponse = response.json().await?;
        destroy_outcome(&public_id, &body.result)
    }
}

/// An image that is already gone counts as deleted.
fn destroy_outcome(public_id: &str, result: &str) -> Result<(), ImageStoreError> {
    match result {
        "ok" => {
            debug!("Deleted hosted image {}", public_id);
            Ok(())
        }
        "not found" => {
            warn!("Hosted image {} was already removed", public_id);
            Ok(())
        }
        other => Err(ImageStoreError::Delete(format!("{}: {}", public_id, other))),
    }
}

/// Signature over the alphabetically sorted `key=value` pairs joined with
/// `&`, followed directly by the API secret.
fn sign(params: &[(String, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Public id of a hosted image, e.g.
/// `https://res.cloudinary.com/demo/image/upload/v1712/shop/shoe.jpg` → `shop/shoe`.
pub fn public_id_from_url(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("/upload/")?;
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);

    let rest = match rest.split_once('/') {
        Some((version, tail))
            if version.len() > 1
                && version.starts_with('v')
                && version[1..].chars().all(|c| c.is_ascii_digit()) =>
        {
            tail
        }
        _ => rest,
    };

    let public_id = match rest.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => rest,
    };

    if public_id.is_empty() {
        None
    } else {
        Some(public_id.to_string())
    }
}
