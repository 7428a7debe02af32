pub mod auth_service;
pub mod catalog_service;

pub use auth_service::{AuthService, LoginResult};
pub use catalog_service::CatalogService;
