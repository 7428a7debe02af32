use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::Product;
use super::pagination::{like_pattern, Pagination};

const COLUMNS: &str = "id, name, image_url, admin_id, created_at, updated_at";

#[derive(Debug)]
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub image_url: &'a str,
    pub admin_id: Uuid,
}

/// Full replacement of the mutable product fields.
#[derive(Debug)]
pub struct ProductChanges<'a> {
    pub name: &'a str,
    pub image_url: &'a str,
}

pub async fn insert<'e, E>(executor: E, product: &NewProduct<'_>) -> Result<Product, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO products (id, name, image_url, admin_id) VALUES ($1, $2, $3, $4) RETURNING {}",
        COLUMNS
    );
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(Uuid::new_v4())
        .bind(product.name)
        .bind(product.image_url)
        .bind(product.admin_id)
        .fetch_one(executor)
        .await?;

    Ok(product)
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Product, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {} FROM products WHERE id = $1", COLUMNS);
    sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| DatabaseError::or_not_found(e, "Product"))
}

/// One page of products in insertion order, optionally filtered by a name
/// substring.
pub async fn list<'e, E>(
    executor: E,
    pagination: Pagination,
    search: Option<&str>,
) -> Result<Vec<Product>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {} FROM products", COLUMNS));
    if let Some(pattern) = like_pattern(search) {
        qb.push(" WHERE name LIKE ").push_bind(pattern).push(" ESCAPE '\\'");
    }
    qb.push(" ORDER BY created_at, id LIMIT ")
        .push_bind(pagination.limit())
        .push(" OFFSET ")
        .push_bind(pagination.offset());

    let products = qb.build_query_as::<Product>().fetch_all(executor).await?;
    Ok(products)
}

pub async fn update<'e, E>(
    executor: E,
    id: Uuid,
    changes: &ProductChanges<'_>,
) -> Result<Product, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "UPDATE products SET name = $2, image_url = $3, updated_at = clock_timestamp()
         WHERE id = $1
         RETURNING {}",
        COLUMNS
    );
    sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .bind(changes.name)
        .bind(changes.image_url)
        .fetch_one(executor)
        .await
        .map_err(|e| DatabaseError::or_not_found(e, "Product"))
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<(), DatabaseError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Product not found".to_string()));
    }
    Ok(())
}
