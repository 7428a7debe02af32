// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition lives here; everything else sits behind the JWT guard.

pub mod auth;
