pub mod admin;
pub mod product;
pub mod variant;

pub use admin::Admin;
pub use product::{Product, ProductWithVariants};
pub use variant::Variant;
