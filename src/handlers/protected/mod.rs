// handlers/protected/mod.rs - Protected handlers (bearer JWT required)
//
// Every route here runs behind middleware::jwt_auth_middleware, which puts an
// AuthAdmin into the request extensions. Mutations additionally pass the
// ownership check in middleware::ownership.

pub mod products;
pub mod variants;
