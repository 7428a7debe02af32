use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, AuthError, TokenService};
use crate::database::admins::{self, NewAdmin};
use crate::database::models::Admin;
use crate::database::DatabaseError;
use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub admin_id: Uuid,
    pub token: String,
}

/// Admin registration and login
pub struct AuthService {
    pool: PgPool,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(pool: PgPool, tokens: TokenService) -> Self {
        Self { pool, tokens }
    }

    /// Create an admin with a hashed password. The caller has already
    /// checked the password confirmation.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Admin, ApiError> {
        let password_hash = hash_password(password)?;

        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;
        let admin = admins::insert(
            &mut *tx,
            &NewAdmin {
                name,
                email,
                password_hash: &password_hash,
            },
        )
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(_) => {
                ApiError::conflict(format!("Email {} is already registered", email))
            }
            other => other.into(),
        })?;
        tx.commit().await.map_err(DatabaseError::from)?;

        tracing::info!("Registered admin {}", admin.id);
        Ok(admin)
    }

    /// Check credentials and issue a token. Unknown email and wrong password
    /// are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, ApiError> {
        let admin = admins::find_by_email(&self.pool, email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &admin.password)?;
        let token = self.tokens.issue(admin.id)?;

        tracing::info!("Admin {} logged in", admin.id);
        Ok(LoginResult {
            admin_id: admin.id,
            token,
        })
    }
}
