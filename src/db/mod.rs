//! Persistence layer.
//!
//! Handlers only see the [`Store`] trait. [`PgStore`] is the production
//! implementation; each entity's SQL lives in its own submodule as free
//! functions over a `PgPool`.

mod customers;
mod inventory;
mod order_details;
mod orders;
mod products;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::models::*;

#[async_trait]
pub trait Store: Send + Sync {
    // ── Products ─────────────────────────────────────────────────────────────
    async fn fetch_all_products(&self) -> AppResult<Vec<Product>>;
    async fn fetch_product_by_id(&self, id: i64) -> AppResult<Product>;
    async fn insert_product(&self, payload: &CreateProduct) -> AppResult<Product>;
    async fn update_product(&self, id: i64, payload: &UpdateProduct) -> AppResult<Product>;
    /// Removes the product together with its order lines and inventory rows.
    async fn delete_product(&self, id: i64) -> AppResult<()>;
    async fn count_products(&self) -> AppResult<i64>;

    // ── Inventory ────────────────────────────────────────────────────────────
    async fn fetch_all_inventory(&self) -> AppResult<Vec<Inventory>>;
    async fn fetch_inventory_by_id(&self, id: i64) -> AppResult<Inventory>;
    async fn insert_inventory(&self, payload: &CreateInventory) -> AppResult<Inventory>;
    async fn update_inventory(&self, id: i64, payload: &UpdateInventory) -> AppResult<Inventory>;
    async fn delete_inventory(&self, id: i64) -> AppResult<()>;
    /// Rows where `stock < reorder_level`.
    async fn fetch_low_stock_inventory(&self) -> AppResult<Vec<Inventory>>;

    // ── Customers ────────────────────────────────────────────────────────────
    async fn fetch_all_customers(&self) -> AppResult<Vec<Customer>>;
    async fn fetch_customer_by_id(&self, id: i64) -> AppResult<Customer>;
    async fn insert_customer(&self, payload: &CreateCustomer) -> AppResult<Customer>;
    async fn update_customer(&self, id: i64, payload: &UpdateCustomer) -> AppResult<Customer>;
    async fn delete_customer(&self, id: i64) -> AppResult<()>;
    async fn count_customers(&self) -> AppResult<i64>;
    async fn fetch_orders_for_customer(&self, customer_id: i64) -> AppResult<Vec<Order>>;

    // ── Orders ───────────────────────────────────────────────────────────────
    /// All orders with customer and lines attached.
    async fn fetch_all_orders(&self) -> AppResult<Vec<Order>>;
    /// One order with its lines attached.
    async fn fetch_order_by_id(&self, id: i64) -> AppResult<Order>;
    async fn insert_order(&self, payload: &CreateOrder) -> AppResult<Order>;
    async fn update_order(&self, id: i64, payload: &UpdateOrder) -> AppResult<Order>;
    /// Removes the order together with its lines.
    async fn delete_order(&self, id: i64) -> AppResult<()>;
    /// Newest first by order date, with customer and lines attached.
    async fn fetch_recent_orders(&self, limit: i64) -> AppResult<Vec<Order>>;
    async fn sum_order_totals(&self) -> AppResult<f64>;
    /// Orders dated within `[from, to)`.
    async fn count_orders_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<i64>;

    // ── Order details ────────────────────────────────────────────────────────
    async fn fetch_all_order_details(&self) -> AppResult<Vec<OrderDetail>>;
    async fn fetch_order_detail_by_id(&self, id: i64) -> AppResult<OrderDetail>;
    async fn insert_order_detail(&self, payload: &CreateOrderDetail) -> AppResult<OrderDetail>;
    async fn update_order_detail(&self, id: i64, payload: &UpdateOrderDetail) -> AppResult<OrderDetail>;
    async fn delete_order_detail(&self, id: i64) -> AppResult<()>;
    async fn fetch_order_details_for_product(&self, product_id: i64) -> AppResult<Vec<OrderDetail>>;
}

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        info!("Database connection pool established.");
        Ok(Self { pool })
    }

    /// Creates any missing tables.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Migrations complete.");
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn fetch_all_products(&self) -> AppResult<Vec<Product>> {
        products::fetch_all_products(&self.pool).await
    }

    async fn fetch_product_by_id(&self, id: i64) -> AppResult<Product> {
        products::fetch_product_by_id(&self.pool, id).await
    }

    async fn insert_product(&self, payload: &CreateProduct) -> AppResult<Product> {
        products::insert_product(&self.pool, payload).await
    }

    async fn update_product(&self, id: i64, payload: &UpdateProduct) -> AppResult<Product> {
        products::update_product(&self.pool, id, payload).await
    }

    async fn delete_product(&self, id: i64) -> AppResult<()> {
        products::delete_product(&self.pool, id).await
    }

    async fn count_products(&self) -> AppResult<i64> {
        products::count_products(&self.pool).await
    }

    async fn fetch_all_inventory(&self) -> AppResult<Vec<Inventory>> {
        inventory::fetch_all_inventory(&self.pool).await
    }

    async fn fetch_inventory_by_id(&self, id: i64) -> AppResult<Inventory> {
        inventory::fetch_inventory_by_id(&self.pool, id).await
    }

    async fn insert_inventory(&self, payload: &CreateInventory) -> AppResult<Inventory> {
        inventory::insert_inventory(&self.pool, payload).await
    }

    async fn update_inventory(&self, id: i64, payload: &UpdateInventory) -> AppResult<Inventory> {
        inventory::update_inventory(&self.pool, id, payload).await
    }

    async fn delete_inventory(&self, id: i64) -> AppResult<()> {
        inventory::delete_inventory(&self.pool, id).await
    }

    async fn fetch_low_stock_inventory(&self) -> AppResult<Vec<Inventory>> {
        inventory::fetch_low_stock_inventory(&self.pool).await
    }

    async fn fetch_all_customers(&self) -> AppResult<Vec<Customer>> {
        customers::fetch_all_customers(&self.pool).await
    }

    async fn fetch_customer_by_id(&self, id: i64) -> AppResult<Customer> {
        customers::fetch_customer_by_id(&self.pool, id).await
    }

    async fn insert_customer(&self, payload: &CreateCustomer) -> AppResult<Customer> {
        customers::insert_customer(&self.pool, payload).await
    }

    async fn update_customer(&self, id: i64, payload: &UpdateCustomer) -> AppResult<Customer> {
        customers::update_customer(&self.pool, id, payload).await
    }

    async fn delete_customer(&self, id: i64) -> AppResult<()> {
        customers::delete_customer(&self.pool, id).await
    }

    async fn count_customers(&self) -> AppResult<i64> {
        customers::count_customers(&self.pool).await
    }

    async fn fetch_orders_for_customer(&self, customer_id: i64) -> AppResult<Vec<Order>> {
        orders::fetch_orders_for_customer(&self.pool, customer_id).await
    }

    async fn fetch_all_orders(&self) -> AppResult<Vec<Order>> {
        orders::fetch_all_orders(&self.pool).await
    }

    async fn fetch_order_by_id(&self, id: i64) -> AppResult<Order> {
        orders::fetch_order_by_id(&self.pool, id).await
    }

    async fn insert_order(&self, payload: &CreateOrder) -> AppResult<Order> {
        orders::insert_order(&self.pool, payload).await
    }

    async fn update_order(&self, id: i64, payload: &UpdateOrder) -> AppResult<Order> {
        orders::update_order(&self.pool, id, payload).await
    }

    async fn delete_order(&self, id: i64) -> AppResult<()> {
        orders::delete_order(&self.pool, id).await
    }

    async fn fetch_recent_orders(&self, limit: i64) -> AppResult<Vec<Order>> {
        orders::fetch_recent_orders(&self.pool, limit).await
    }

    async fn sum_order_totals(&self) -> AppResult<f64> {
        orders::sum_order_totals(&self.pool).await
    }

    async fn count_orders_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<i64> {
        orders::count_orders_between(&self.pool, from, to).await
    }

    async fn fetch_all_order_details(&self) -> AppResult<Vec<OrderDetail>> {
        order_details::fetch_all_order_details(&self.pool).await
    }

    async fn fetch_order_detail_by_id(&self, id: i64) -> AppResult<OrderDetail> {
        order_details::fetch_order_detail_by_id(&self.pool, id).await
    }

    async fn insert_order_detail(&self, payload: &CreateOrderDetail) -> AppResult<OrderDetail> {
        order_details::insert_order_detail(&self.pool, payload).await
    }

    async fn update_order_detail(&self, id: i64, payload: &UpdateOrderDetail) -> AppResult<OrderDetail> {
        order_details::update_order_detail(&self.pool, id, payload).await
    }

    async fn delete_order_detail(&self, id: i64) -> AppResult<()> {
        order_details::delete_order_detail(&self.pool, id).await
    }

    async fn fetch_order_details_for_product(&self, product_id: i64) -> AppResult<Vec<OrderDetail>> {
        order_details::fetch_order_details_for_product(&self.pool, product_id).await
    }
}
