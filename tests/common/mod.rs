#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use uuid::Uuid;

use catalog_api_rust::config::{
    AppConfig, DatabaseConfig, Environment, SecurityConfig, ServerConfig,
};
use catalog_api_rust::database::DatabaseManager;
use catalog_api_rust::images::{ImageStore, ImageStoreError, SharedImageStore};
use catalog_api_rust::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";

static SCHEMA: OnceCell<()> = OnceCell::const_new();

/// In-process server bound to a free port, plus a direct pool for assertions
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub pool: PgPool,
}

/// Admin credentials and the token issued at login
pub struct TestAdmin {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// Image store double that records calls and can be told to fail deletes
#[derive(Default)]
pub struct RecordingImageStore {
    pub fail_deletes: bool,
    pub uploaded: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl RecordingImageStore {
    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::default()
        }
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().map(|u| u.clone()).unwrap_or_default()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn upload(&self, source: &str) -> Result<String, ImageStoreError> {
        if let Ok(mut uploaded) = self.uploaded.lock() {
            uploaded.push(source.to_string());
        }
        Ok(format!("https://images.test/hosted/{}", source.rsplit('/').next().unwrap_or(source)))
    }

    async fn delete(&self, image_url: &str) -> Result<(), ImageStoreError> {
        if self.fail_deletes {
            return Err(ImageStoreError::Delete(format!("refusing to delete {}", image_url)));
        }
        if let Ok(mut deleted) = self.deleted.lock() {
            deleted.push(image_url.to_string());
        }
        Ok(())
    }
}

pub fn test_config(database_url: String) -> AppConfig {
    AppConfig {
        environment: Environment::Development,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: Some(database_url),
            max_connections: 5,
            connection_timeout: 5,
            max_page_size: 1000,
            ..DatabaseConfig::default()
        },
        security: SecurityConfig {
            jwt_secret: JWT_SECRET.to_string(),
            jwt_expiry_minutes: 30,
            enable_cors: false,
        },
        images: None,
    }
}

/// Start the API against `DATABASE_URL`. Returns `None` when it is unset so
/// database-backed tests skip instead of failing.
pub async fn spawn_app() -> Result<Option<TestApp>> {
    spawn_app_with_images(None).await
}

pub async fn spawn_app_with_images(images: Option<SharedImageStore>) -> Result<Option<TestApp>> {
    let _ = dotenvy::dotenv();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set; skipping database test");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    SCHEMA
        .get_or_try_init(|| async { DatabaseManager::ensure_schema(&pool).await })
        .await
        .context("failed to prepare schema")?;

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;

    let state = AppState::with_image_store(test_config(database_url), pool.clone(), images);
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app(state)).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    Ok(Some(TestApp {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        pool,
    }))
}

pub fn shared(store: RecordingImageStore) -> (Arc<RecordingImageStore>, SharedImageStore) {
    let store = Arc::new(store);
    let shared: SharedImageStore = store.clone();
    (store, shared)
}

/// Email that no other test run will have registered
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

/// Name prefix for rows a single test can search for in isolation
pub fn unique_tag(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..12])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, email: &str, password: &str, password_check: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "name": "Test Admin",
                "email": email,
                "password": password,
                "passwordCheck": password_check,
            }))
            .send()
            .await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }

    /// Register a fresh admin and log in
    pub async fn admin(&self) -> Result<TestAdmin> {
        let email = unique_email("admin");
        let password = "correct horse battery";

        let resp = self.register(&email, password, password).await?;
        if resp.status() != StatusCode::CREATED {
            bail!("register failed: {} {}", resp.status(), resp.text().await?);
        }

        let resp = self.login(&email, password).await?;
        if resp.status() != StatusCode::OK {
            bail!("login failed: {} {}", resp.status(), resp.text().await?);
        }
        let body: Value = resp.json().await?;
        let id = body["adminID"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .context("login response missing adminID")?;
        let token = body["token"].as_str().context("login response missing token")?.to_string();

        Ok(TestAdmin { id, email, token })
    }

    pub fn get(&self, admin: &TestAdmin, path: &str) -> reqwest::RequestBuilder {
        self.client.get(self.url(path)).bearer_auth(&admin.token)
    }

    pub fn post(&self, admin: &TestAdmin, path: &str) -> reqwest::RequestBuilder {
        self.client.post(self.url(path)).bearer_auth(&admin.token)
    }

    pub fn put(&self, admin: &TestAdmin, path: &str) -> reqwest::RequestBuilder {
        self.client.put(self.url(path)).bearer_auth(&admin.token)
    }

    pub fn delete(&self, admin: &TestAdmin, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(self.url(path)).bearer_auth(&admin.token)
    }

    /// Create a product and return its row as listed back by name
    pub async fn create_product(&self, admin: &TestAdmin, name: &str, image_url: &str) -> Result<Value> {
        let resp = self
            .post(admin, "/api/products")
            .json(&json!({ "name": name, "imageUrl": image_url }))
            .send()
            .await?;
        if resp.status() != StatusCode::CREATED {
            bail!("create product failed: {} {}", resp.status(), resp.text().await?);
        }

        let listed: Vec<Value> = self
            .get(admin, "/api/products")
            .query(&[("search", name), ("pageSize", "100")])
            .send()
            .await?
            .json()
            .await?;
        listed
            .into_iter()
            .find(|p| p["name"] == name)
            .context("created product not listed")
    }

    /// Create a variant under `product_id` and return its row
    pub async fn create_variant(
        &self,
        admin: &TestAdmin,
        product_id: &str,
        variant_name: &str,
        quantity: i32,
    ) -> Result<Value> {
        let resp = self
            .post(admin, "/api/products/variants")
            .json(&json!({
                "variantName": variant_name,
                "quantity": quantity,
                "productID": product_id,
            }))
            .send()
            .await?;
        if resp.status() != StatusCode::CREATED {
            bail!("create variant failed: {} {}", resp.status(), resp.text().await?);
        }

        let listed: Vec<Value> = self
            .get(admin, "/api/products/variants")
            .query(&[("productID", product_id), ("search", variant_name)])
            .send()
            .await?
            .json()
            .await?;
        listed
            .into_iter()
            .find(|v| v["variantName"] == variant_name)
            .context("created variant not listed")
    }
}

/// Bail out of a test early when no database is configured
#[macro_export]
macro_rules! require_app {
    ($spawn:expr) => {
        match $spawn.await? {
            Some(app) => app,
            None => return Ok(()),
        }
    };
}
