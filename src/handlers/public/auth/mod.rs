// handlers/public/auth/mod.rs - Admin registration and login

pub mod login;    // POST /api/auth/login - verify credentials, issue JWT
pub mod register; // POST /api/auth/register - create admin account

pub use login::login_post;
pub use register::register_post;
