pub mod auth;
pub mod ownership;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthAdmin};
pub use ownership::{authorize, owns, Owned};
pub use response::{ApiResponse, ApiResult};
