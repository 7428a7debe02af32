pub mod admins;
pub mod manager;
pub mod models;
pub mod pagination;
pub mod products;
pub mod variants;

pub use manager::{DatabaseError, DatabaseManager};
pub use pagination::{ListQuery, Pagination};
