use std::collections::HashMap;

use sqlx::{PgExecutor, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::*;

pub async fn fetch_all_products(pool: &PgPool) -> AppResult<Vec<Product>> {
    let mut products = sqlx::query_as::<_, Product>(
        "SELECT id, name, category, price FROM products ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    attach_inventory(pool, &mut products).await?;
    Ok(products)
}

pub async fn fetch_product_by_id(pool: &PgPool, id: i64) -> AppResult<Product> {
    let mut product = fetch_product_row(pool, id).await?;
    attach_inventory(pool, std::slice::from_mut(&mut product)).await?;
    Ok(product)
}

/// Inserts the product and its inline stock rows as one unit.
pub async fn insert_product(pool: &PgPool, payload: &CreateProduct) -> AppResult<Product> {
    let mut tx = pool.begin().await?;

    let mut product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, category, price)
        VALUES ($1, $2, $3)
        RETURNING id, name, category, price
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.category)
    .bind(payload.price)
    .fetch_one(&mut *tx)
    .await?;

    for line in &payload.inventory {
        let row = line.for_product(product.id);
        let item = sqlx::query_as::<_, Inventory>(
            r#"
            INSERT INTO inventories (product_id, stock, reorder_level)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, stock, reorder_level
            "#,
        )
        .bind(row.product_id)
        .bind(row.stock)
        .bind(row.reorder_level)
        .fetch_one(&mut *tx)
        .await?;
        product.inventory.push(item);
    }

    tx.commit().await?;
    Ok(product)
}

pub async fn update_product(pool: &PgPool, id: i64, payload: &UpdateProduct) -> AppResult<Product> {
    // Fetch existing to merge optional fields
    let mut merged = fetch_product_row(pool, id).await?;
    payload.apply_to(&mut merged);

    let mut product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name     = $1,
            category = $2,
            price    = $3
        WHERE id = $4
        RETURNING id, name, category, price
        "#,
    )
    .bind(&merged.name)
    .bind(&merged.category)
    .bind(merged.price)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(id))?;

    attach_inventory(pool, std::slice::from_mut(&mut product)).await?;
    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i64) -> AppResult<()> {
    let mut tx = pool.begin().await?;

    ensure_product_exists(&mut *tx, id).await?;

    // Children first: order lines and stock rows reference the product.
    sqlx::query("DELETE FROM order_details WHERE product_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM inventories WHERE product_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn count_products(pool: &PgPool) -> AppResult<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub(super) async fn ensure_product_exists<'e, E>(executor: E, id: i64) -> AppResult<()>
where
    E: PgExecutor<'e>,
{
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
        .bind(id)
        .fetch_one(executor)
        .await?;

    if !exists {
        return Err(not_found(id));
    }
    Ok(())
}

async fn fetch_product_row(pool: &PgPool, id: i64) -> AppResult<Product> {
    sqlx::query_as::<_, Product>("SELECT id, name, category, price FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Loads inventory rows for every product in one query.
async fn attach_inventory(pool: &PgPool, products: &mut [Product]) -> AppResult<()> {
    if products.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
    let rows = sqlx::query_as::<_, Inventory>(
        r#"
        SELECT id, product_id, stock, reorder_level
        FROM inventories
        WHERE product_id = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_product: HashMap<i64, Vec<Inventory>> = HashMap::new();
    for row in rows {
        by_product.entry(row.product_id).or_default().push(row);
    }
    for product in products.iter_mut() {
        product.inventory = by_product.remove(&product.id).unwrap_or_default();
    }
    Ok(())
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Product {} not found", id))
}
