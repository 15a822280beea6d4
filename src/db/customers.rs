use sqlx::{PgExecutor, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::*;

pub async fn fetch_all_customers(pool: &PgPool) -> AppResult<Vec<Customer>> {
    let customers = sqlx::query_as::<_, Customer>(
        "SELECT id, name, email, phone FROM customers ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(customers)
}

pub async fn fetch_customer_by_id(pool: &PgPool, id: i64) -> AppResult<Customer> {
    sqlx::query_as::<_, Customer>("SELECT id, name, email, phone FROM customers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

pub async fn insert_customer(pool: &PgPool, payload: &CreateCustomer) -> AppResult<Customer> {
    let customer = sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (name, email, phone)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, phone
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .fetch_one(pool)
    .await?;

    Ok(customer)
}

pub async fn update_customer(pool: &PgPool, id: i64, payload: &UpdateCustomer) -> AppResult<Customer> {
    let mut merged = fetch_customer_by_id(pool, id).await?;
    payload.apply_to(&mut merged);

    sqlx::query_as::<_, Customer>(
        r#"
        UPDATE customers
        SET name  = $1,
            email = $2,
            phone = $3
        WHERE id = $4
        RETURNING id, name, email, phone
        "#,
    )
    .bind(&merged.name)
    .bind(&merged.email)
    .bind(&merged.phone)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))
}

/// Orders are not cascaded; a customer with orders is rejected by the foreign key.
pub async fn delete_customer(pool: &PgPool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => still_has_orders(id),
            other => AppError::Database(other),
        })?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

pub async fn count_customers(pool: &PgPool) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub(super) async fn ensure_customer_exists<'e, E>(executor: E, id: i64) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;

    if !exists {
        return Err(not_found(id));
    }
    Ok(())
}

/// Refusal for deleting a customer that orders still reference.
pub(super) fn still_has_orders(id: i64) -> AppError {
    AppError::Storage(format!("Customer {} still has orders", id))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Customer {} not found", id))
}
