use sqlx::PgPool;

use super::products::ensure_product_exists;
use crate::error::{AppError, AppResult};
use crate::models::*;

pub async fn fetch_all_inventory(pool: &PgPool) -> AppResult<Vec<Inventory>> {
    let rows = sqlx::query_as::<_, Inventory>(
        "SELECT id, product_id, stock, reorder_level FROM inventories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fetch_inventory_by_id(pool: &PgPool, id: i64) -> AppResult<Inventory> {
    sqlx::query_as::<_, Inventory>(
        "SELECT id, product_id, stock, reorder_level FROM inventories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

pub async fn insert_inventory(pool: &PgPool, payload: &CreateInventory) -> AppResult<Inventory> {
    ensure_product_exists(pool, payload.product_id).await?;

    let item = sqlx::query_as::<_, Inventory>(
        r#"
        INSERT INTO inventories (product_id, stock, reorder_level)
        VALUES ($1, $2, $3)
        RETURNING id, product_id, stock, reorder_level
        "#,
    )
    .bind(payload.product_id)
    .bind(payload.stock)
    .bind(payload.reorder_level)
    .fetch_one(pool)
    .await?;

    Ok(item)
}

pub async fn update_inventory(pool: &PgPool, id: i64, payload: &UpdateInventory) -> AppResult<Inventory> {
    let mut merged = fetch_inventory_by_id(pool, id).await?;
    payload.apply_to(&mut merged);

    if payload.product_id.is_some() {
        ensure_product_exists(pool, merged.product_id).await?;
    }

    sqlx::query_as::<_, Inventory>(
        r#"
        UPDATE inventories
        SET product_id    = $1,
            stock         = $2,
            reorder_level = $3
        WHERE id = $4
        RETURNING id, product_id, stock, reorder_level
        "#,
    )
    .bind(merged.product_id)
    .bind(merged.stock)
    .bind(merged.reorder_level)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

pub async fn delete_inventory(pool: &PgPool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM inventories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub async fn fetch_low_stock_inventory(pool: &PgPool) -> AppResult<Vec<Inventory>> {
    let rows = sqlx::query_as::<_, Inventory>(
        r#"
        SELECT id, product_id, stock, reorder_level
        FROM inventories
        WHERE stock < reorder_level
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Inventory item {} not found", id))
}
