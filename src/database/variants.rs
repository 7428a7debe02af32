use sqlx::{PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::Variant;
use super::pagination::{like_pattern, Pagination};

const COLUMNS: &str = "id, variant_name, quantity, product_id, created_at, updated_at";

#[derive(Debug)]
pub struct NewVariant<'a> {
    pub variant_name: &'a str,
    pub quantity: i32,
    pub product_id: Uuid,
}

/// Full replacement of the mutable variant fields.
#[derive(Debug)]
pub struct VariantChanges<'a> {
    pub variant_name: &'a str,
    pub quantity: i32,
}

pub async fn insert<'e, E>(executor: E, variant: &NewVariant<'_>) -> Result<Variant, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "INSERT INTO variants (id, variant_name, quantity, product_id) VALUES ($1, $2, $3, $4) RETURNING {}",
        COLUMNS
    );
    let variant = sqlx::query_as::<_, Variant>(&sql)
        .bind(Uuid::new_v4())
        .bind(variant.variant_name)
        .bind(variant.quantity)
        .bind(variant.product_id)
        .fetch_one(executor)
        .await?;

    Ok(variant)
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Variant, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {} FROM variants WHERE id = $1", COLUMNS);
    sqlx::query_as::<_, Variant>(&sql)
        .bind(id)
        .fetch_one(executor)
        .await
        .map_err(|e| DatabaseError::or_not_found(e, "Variant"))
}

pub async fn list_by_product<'e, E>(executor: E, product_id: Uuid) -> Result<Vec<Variant>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "SELECT {} FROM variants WHERE product_id = $1 ORDER BY created_at, id",
        COLUMNS
    );
    let variants = sqlx::query_as::<_, Variant>(&sql)
        .bind(product_id)
        .fetch_all(executor)
        .await?;
    Ok(variants)
}

/// One page of variants in insertion order. `search` matches on the variant
/// name; `product_id` narrows to a single product.
pub async fn list<'e, E>(
    executor: E,
    pagination: Pagination,
    search: Option<&str>,
    product_id: Option<Uuid>,
) -> Result<Vec<Variant>, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {} FROM variants WHERE TRUE", COLUMNS));
    if let Some(pattern) = like_pattern(search) {
        qb.push(" AND variant_name LIKE ").push_bind(pattern).push(" ESCAPE '\\'");
    }
    if let Some(product_id) = product_id {
        qb.push(" AND product_id = ").push_bind(product_id);
    }
    qb.push(" ORDER BY created_at, id LIMIT ")
        .push_bind(pagination.limit())
        .push(" OFFSET ")
        .push_bind(pagination.offset());

    let variants = qb.build_query_as::<Variant>().fetch_all(executor).await?;
    Ok(variants)
}

pub async fn update<'e, E>(
    executor: E,
    id: Uuid,
    changes: &VariantChanges<'_>,
) -> Result<Variant, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "UPDATE variants SET variant_name = $2, quantity = $3, updated_at = clock_timestamp()
         WHERE id = $1
         RETURNING {}",
        COLUMNS
    );
    sqlx::query_as::<_, Variant>(&sql)
        .bind(id)
        .bind(changes.variant_name)
        .bind(changes.quantity)
        .fetch_one(executor)
        .await
        .map_err(|e| DatabaseError::or_not_found(e, "Variant"))
}

pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<(), DatabaseError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM variants WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound("Variant not found".to_string()));
    }
    Ok(())
}

/// Removes every variant of a product. Returns how many rows went.
pub async fn delete_by_product<'e, E>(executor: E, product_id: Uuid) -> Result<u64, DatabaseError>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM variants WHERE product_id = $1")
        .bind(product_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}
