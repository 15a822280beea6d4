use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgExecutor, PgPool};

use super::customers::ensure_customer_exists;
use super::products::ensure_product_exists;
use crate::error::{AppError, AppResult};
use crate::models::*;

// ── Reads ─────────────────────────────────────────────────────────────────────

pub async fn fetch_all_orders(pool: &PgPool) -> AppResult<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, customer_id, order_date, total_amount, order_status
        FROM orders
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    attach_customers(pool, &mut orders).await?;
    attach_details(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn fetch_order_by_id(pool: &PgPool, id: i64) -> AppResult<Order> {
    let mut order = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, customer_id, order_date, total_amount, order_status
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))?;

    attach_details(pool, std::slice::from_mut(&mut order)).await?;
    Ok(order)
}

pub async fn fetch_orders_for_customer(pool: &PgPool, customer_id: i64) -> AppResult<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, customer_id, order_date, total_amount, order_status
        FROM orders
        WHERE customer_id = $1
        ORDER BY id
        "#,
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    attach_details(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn fetch_recent_orders(pool: &PgPool, limit: i64) -> AppResult<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, customer_id, order_date, total_amount, order_status
        FROM orders
        ORDER BY order_date DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    attach_customers(pool, &mut orders).await?;
    attach_details(pool, &mut orders).await?;
    Ok(orders)
}

// ── Aggregates ────────────────────────────────────────────────────────────────

pub async fn sum_order_totals(pool: &PgPool) -> AppResult<f64> {
    let total: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0)::DOUBLE PRECISION FROM orders",
    )
    .fetch_one(pool)
    .await?;
    Ok(total)
}

pub async fn count_orders_between(
    pool: &PgPool,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM orders WHERE order_date >= $1 AND order_date < $2",
    )
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

// ── Writes ────────────────────────────────────────────────────────────────────

/// Inserts the order header and its inline lines as one unit.
pub async fn insert_order(pool: &PgPool, payload: &CreateOrder) -> AppResult<Order> {
    let mut tx = pool.begin().await?;

    ensure_customer_exists(&mut *tx, payload.customer_id).await?;

    let mut order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (customer_id, order_date, total_amount, order_status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, customer_id, order_date, total_amount, order_status
        "#,
    )
    .bind(payload.customer_id)
    .bind(payload.order_date.unwrap_or_else(Utc::now))
    .bind(payload.total_amount)
    .bind(&payload.order_status)
    .fetch_one(&mut *tx)
    .await?;

    order.details = insert_lines(&mut *tx, order.id, &payload.details).await?;

    tx.commit().await?;
    Ok(order)
}

pub async fn update_order(pool: &PgPool, id: i64, payload: &UpdateOrder) -> AppResult<Order> {
    let mut tx = pool.begin().await?;

    let mut merged = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, customer_id, order_date, total_amount, order_status
        FROM orders
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| not_found(id))?;

    payload.apply_to(&mut merged);
    if payload.customer_id.is_some() {
        ensure_customer_exists(&mut *tx, merged.customer_id).await?;
    }

    let mut order = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders
        SET customer_id  = $1,
            order_date   = $2,
            total_amount = $3,
            order_status = $4
        WHERE id = $5
        RETURNING id, customer_id, order_date, total_amount, order_status
        "#,
    )
    .bind(merged.customer_id)
    .bind(merged.order_date)
    .bind(merged.total_amount)
    .bind(&merged.order_status)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(lines) = &payload.details {
        sqlx::query("DELETE FROM order_details WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut *tx, id, lines).await?;
    }

    tx.commit().await?;

    attach_details(pool, std::slice::from_mut(&mut order)).await?;
    Ok(order)
}

pub async fn delete_order(pool: &PgPool, id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    // Lines reference the order, so they go first.
    sqlx::query("DELETE FROM order_details WHERE order_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        // Dropping `tx` rolls back the line deletion.
        return Err(not_found(id));
    }

    tx.commit().await?;
    Ok(())
}

pub(super) async fn ensure_order_exists<'e, E>(executor: E, id: i64) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;

    if !exists {
        return Err(not_found(id));
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

async fn insert_lines(
    conn: &mut PgConnection,
    order_id: i64,
    lines: &[NewOrderLine],
) -> AppResult<Vec<OrderDetail>> {
    let mut details = Vec::with_capacity(lines.len());

    for line in lines {
        let row = line.for_order(order_id);
        ensure_product_exists(&mut *conn, row.product_id).await?;

        let detail = sqlx::query_as::<_, OrderDetail>(
            r#"
            INSERT INTO order_details (order_id, product_id, quantity, price_per_unit)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, product_id, quantity, price_per_unit
            "#,
        )
        .bind(row.order_id)
        .bind(row.product_id)
        .bind(row.quantity)
        .bind(row.price_per_unit)
        .fetch_one(&mut *conn)
        .await?;

        details.push(detail);
    }

    Ok(details)
}

async fn attach_details(pool: &PgPool, orders: &mut [Order]) -> AppResult<()> {
    if orders.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let rows = sqlx::query_as::<_, OrderDetail>(
        r#"
        SELECT id, order_id, product_id, quantity, price_per_unit
        FROM order_details
        WHERE order_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_order: HashMap<i64, Vec<OrderDetail>> = HashMap::new();
    for row in rows {
        by_order.entry(row.order_id).or_default().push(row);
    }
    for order in orders.iter_mut() {
        order.details = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(())
}

async fn attach_customers(pool: &PgPool, orders: &mut [Order]) -> AppResult<()> {
    if orders.is_empty() {
        return Ok(());
    }

    let mut ids: Vec<i64> = orders.iter().map(|o| o.customer_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let customers: HashMap<i64, Customer> = sqlx::query_as::<_, Customer>(
        "SELECT id, name, email, phone FROM customers WHERE id = ANY($1)",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(|c| (c.id, c))
    .collect();

    for order in orders.iter_mut() {
        order.customer = customers.get(&order.customer_id).cloned();
    }
    Ok(())
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Order {} not found", id))
}
