use sqlx::PgPool;

use super::orders::ensure_order_exists;
use super::products::ensure_product_exists;
use crate::error::{AppError, AppResult};
use crate::models::*;

pub async fn fetch_all_order_details(pool: &PgPool) -> AppResult<Vec<OrderDetail>> {
    let rows = sqlx::query_as::<_, OrderDetail>(
        "SELECT id, order_id, product_id, quantity, price_per_unit FROM order_details ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn fetch_order_detail_by_id(pool: &PgPool, id: i64) -> AppResult<OrderDetail> {
    sqlx::query_as::<_, OrderDetail>(
        "SELECT id, order_id, product_id, quantity, price_per_unit FROM order_details WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

pub async fn insert_order_detail(pool: &PgPool, payload: &CreateOrderDetail) -> AppResult<OrderDetail> {
    ensure_order_exists(pool, payload.order_id).await?;
    ensure_product_exists(pool, payload.product_id).await?;

    let detail = sqlx::query_as::<_, OrderDetail>(
        r#"
        INSERT INTO order_details (order_id, product_id, quantity, price_per_unit)
        VALUES ($1, $2, $3, $4)
        RETURNING id, order_id, product_id, quantity, price_per_unit
        "#,
    )
    .bind(payload.order_id)
    .bind(payload.product_id)
    .bind(payload.quantity)
    .bind(payload.price_per_unit)
    .fetch_one(pool)
    .await?;

    Ok(detail)
}

pub async fn update_order_detail(
    pool: &PgPool,
    id: i64,
    payload: &UpdateOrderDetail,
) -> AppResult<OrderDetail> {
    let mut merged = fetch_order_detail_by_id(pool, id).await?;
    payload.apply_to(&mut merged);

    if payload.order_id.is_some() {
        ensure_order_exists(pool, merged.order_id).await?;
    }
    if payload.product_id.is_some() {
        ensure_product_exists(pool, merged.product_id).await?;
    }

    sqlx::query_as::<_, OrderDetail>(
        r#"
        UPDATE order_details
        SET order_id       = $1,
            product_id     = $2,
            quantity       = $3,
            price_per_unit = $4
        WHERE id = $5
        RETURNING id, order_id, product_id, quantity, price_per_unit
        "#,
    )
    .bind(merged.order_id)
    .bind(merged.product_id)
    .bind(merged.quantity)
    .bind(merged.price_per_unit)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

pub async fn delete_order_detail(pool: &PgPool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM order_details WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub async fn fetch_order_details_for_product(pool: &PgPool, product_id: i64) -> AppResult<Vec<OrderDetail>> {
    let rows = sqlx::query_as::<_, OrderDetail>(
        r#"
        SELECT id, order_id, product_id, quantity, price_per_unit
        FROM order_details
        WHERE product_id = $1
        ORDER BY id
        "#,
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Order detail {} not found", id))
}
