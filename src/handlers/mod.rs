// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer JWT, checked by middleware::auth)

pub mod health;
pub mod protected;
pub mod public;
pub mod utils;
