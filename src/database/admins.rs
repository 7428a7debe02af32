use sqlx::PgExecutor;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::Admin;

/// Fields needed to register an admin. The password is already hashed.
#[derive(Debug)]
pub struct NewAdmin<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
}

pub async fn insert<'e, E>(executor: E, admin: &NewAdmin<'_>) -> Result<Admin, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let admin = sqlx::query_as::<_, Admin>(
        "INSERT INTO admins (id, name, email, password)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, email, password, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(admin.name)
    .bind(admin.email)
    .bind(admin.password_hash)
    .fetch_one(executor)
    .await?;

    Ok(admin)
}

pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Admin>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let admin = sqlx::query_as::<_, Admin>(
        "SELECT id, name, email, password, created_at, updated_at
         FROM admins
         WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(executor)
    .await?;

    Ok(admin)
}

pub async fn count_by_email<'e, E>(executor: E, email: &str) -> Result<i64, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admins WHERE email = $1")
        .bind(email)
        .fetch_one(executor)
        .await?;
    Ok(count.0)
}
