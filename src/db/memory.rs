//! In-process [`Store`] used by the HTTP tests.
//!
//! Every operation runs under one write (or read) lock, so multi-step writes
//! are all-or-nothing just like the transactional PostgreSQL versions. The
//! same foreign keys are enforced.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::Store;
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Debug, Default)]
struct Tables {
    /// Shared id sequence; ids are never reused.
    last_id: i64,
    products: BTreeMap<i64, Product>,
    inventory: BTreeMap<i64, Inventory>,
    customers: BTreeMap<i64, Customer>,
    orders: BTreeMap<i64, Order>,
    order_details: BTreeMap<i64, OrderDetail>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn product(&self, id: i64) -> AppResult<&Product> {
        self.products
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))
    }

    fn customer(&self, id: i64) -> AppResult<&Customer> {
        self.customers
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    fn order(&self, id: i64) -> AppResult<&Order> {
        self.orders
            .get(&id)
            .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))
    }

    fn with_inventory(&self, product: &Product) -> Product {
        let mut product = product.clone();
        product.inventory = self
            .inventory
            .values()
            .filter(|i| i.product_id == product.id)
            .cloned()
            .collect();
        product
    }

    fn with_details(&self, order: &Order) -> Order {
        let mut order = order.clone();
        order.details = self
            .order_details
            .values()
            .filter(|d| d.order_id == order.id)
            .cloned()
            .collect();
        order
    }

    fn with_customer_and_details(&self, order: &Order) -> Order {
        let mut order = self.with_details(order);
        order.customer = self.customers.get(&order.customer_id).cloned();
        order
    }

    fn insert_line(&mut self, payload: &CreateOrderDetail) -> AppResult<OrderDetail> {
        self.order(payload.order_id)?;
        self.product(payload.product_id)?;

        let detail = OrderDetail {
            id: self.next_id(),
            order_id: payload.order_id,
            product_id: payload.product_id,
            quantity: payload.quantity,
            price_per_unit: payload.price_per_unit,
        };
        self.order_details.insert(detail.id, detail.clone());
        Ok(detail)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ── Products ─────────────────────────────────────────────────────────────

    async fn fetch_all_products(&self) -> AppResult<Vec<Product>> {
        let t = self.tables.read().await;
        Ok(t.products.values().map(|p| t.with_inventory(p)).collect())
    }

    async fn fetch_product_by_id(&self, id: i64) -> AppResult<Product> {
        let t = self.tables.read().await;
        Ok(t.with_inventory(t.product(id)?))
    }

    async fn insert_product(&self, payload: &CreateProduct) -> AppResult<Product> {
        let mut t = self.tables.write().await;
        let product = Product {
            id: t.next_id(),
            name: payload.name.clone(),
            category: payload.category.clone(),
            price: payload.price,
            inventory: Vec::new(),
        };
        t.products.insert(product.id, product.clone());

        for line in &payload.inventory {
            let row = line.for_product(product.id);
            let item = Inventory {
                id: t.next_id(),
                product_id: row.product_id,
                stock: row.stock,
                reorder_level: row.reorder_level,
            };
            t.inventory.insert(item.id, item);
        }
        Ok(t.with_inventory(&product))
    }

    async fn update_product(&self, id: i64, payload: &UpdateProduct) -> AppResult<Product> {
        let mut t = self.tables.write().await;
        let mut product = t.product(id)?.clone();
        payload.apply_to(&mut product);
        t.products.insert(id, product.clone());
        Ok(t.with_inventory(&product))
    }

    async fn delete_product(&self, id: i64) -> AppResult<()> {
        let mut t = self.tables.write().await;
        t.product(id)?;
        t.order_details.retain(|_, d| d.product_id != id);
        t.inventory.retain(|_, i| i.product_id != id);
        t.products.remove(&id);
        Ok(())
    }

    async fn count_products(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.products.len() as i64)
    }

    // ── Inventory ────────────────────────────────────────────────────────────

    async fn fetch_all_inventory(&self) -> AppResult<Vec<Inventory>> {
        Ok(self.tables.read().await.inventory.values().cloned().collect())
    }

    async fn fetch_inventory_by_id(&self, id: i64) -> AppResult<Inventory> {
        self.tables
            .read()
            .await
            .inventory
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))
    }

    async fn insert_inventory(&self, payload: &CreateInventory) -> AppResult<Inventory> {
        let mut t = self.tables.write().await;
        t.product(payload.product_id)?;
        let item = Inventory {
            id: t.next_id(),
            product_id: payload.product_id,
            stock: payload.stock,
            reorder_level: payload.reorder_level,
        };
        t.inventory.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_inventory(&self, id: i64, payload: &UpdateInventory) -> AppResult<Inventory> {
        let mut t = self.tables.write().await;
        let mut item = t
            .inventory
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))?;
        payload.apply_to(&mut item);
        t.product(item.product_id)?;
        t.inventory.insert(id, item.clone());
        Ok(item)
    }

    async fn delete_inventory(&self, id: i64) -> AppResult<()> {
        self.tables
            .write()
            .await
            .inventory
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))
    }

    async fn fetch_low_stock_inventory(&self) -> AppResult<Vec<Inventory>> {
        let t = self.tables.read().await;
        Ok(t.inventory.values().filter(|i| i.is_low_stock()).cloned().collect())
    }

    // ── Customers ────────────────────────────────────────────────────────────

    async fn fetch_all_customers(&self) -> AppResult<Vec<Customer>> {
        Ok(self.tables.read().await.customers.values().cloned().collect())
    }

    async fn fetch_customer_by_id(&self, id: i64) -> AppResult<Customer> {
        self.tables.read().await.customer(id).cloned()
    }

    async fn insert_customer(&self, payload: &CreateCustomer) -> AppResult<Customer> {
        let mut t = self.tables.write().await;
        let customer = Customer {
            id: t.next_id(),
            name: payload.name.clone(),
            email: payload.email.clone(),
            phone: payload.phone.clone(),
        };
        t.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, id: i64, payload: &UpdateCustomer) -> AppResult<Customer> {
        let mut t = self.tables.write().await;
        let mut customer = t.customer(id)?.clone();
        payload.apply_to(&mut customer);
        t.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn delete_customer(&self, id: i64) -> AppResult<()> {
        let mut t = self.tables.write().await;
        t.customer(id)?;
        if t.orders.values().any(|o| o.customer_id == id) {
            return Err(super::customers::still_has_orders(id));
        }
        t.customers.remove(&id);
        Ok(())
    }

    async fn count_customers(&self) -> AppResult<i64> {
        Ok(self.tables.read().await.customers.len() as i64)
    }

    async fn fetch_orders_for_customer(&self, customer_id: i64) -> AppResult<Vec<Order>> {
        let t = self.tables.read().await;
        Ok(t.orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .map(|o| t.with_details(o))
            .collect())
    }

    // ── Orders ───────────────────────────────────────────────────────────────

    async fn fetch_all_orders(&self) -> AppResult<Vec<Order>> {
        let t = self.tables.read().await;
        Ok(t.orders.values().map(|o| t.with_customer_and_details(o)).collect())
    }

    async fn fetch_order_by_id(&self, id: i64) -> AppResult<Order> {
        let t = self.tables.read().await;
        Ok(t.with_details(t.order(id)?))
    }

    async fn insert_order(&self, payload: &CreateOrder) -> AppResult<Order> {
        let mut t = self.tables.write().await;
        t.customer(payload.customer_id)?;
        for line in &payload.details {
            t.product(line.product_id)?;
        }

        let order = Order {
            id: t.next_id(),
            customer_id: payload.customer_id,
            customer: None,
            order_date: payload.order_date.unwrap_or_else(Utc::now),
            total_amount: payload.total_amount,
            order_status: payload.order_status.clone(),
            details: Vec::new(),
        };
        t.orders.insert(order.id, order.clone());

        for line in &payload.details {
            t.insert_line(&line.for_order(order.id))?;
        }
        Ok(t.with_details(&order))
    }

    async fn update_order(&self, id: i64, payload: &UpdateOrder) -> AppResult<Order> {
        let mut t = self.tables.write().await;
        let mut order = t.order(id)?.clone();
        payload.apply_to(&mut order);
        t.customer(order.customer_id)?;
        if let Some(lines) = &payload.details {
            for line in lines {
                t.product(line.product_id)?;
            }
        }

        t.orders.insert(id, order.clone());
        if let Some(lines) = &payload.details {
            t.order_details.retain(|_, d| d.order_id != id);
            for line in lines {
                t.insert_line(&line.for_order(id))?;
            }
        }
        Ok(t.with_details(&order))
    }

    async fn delete_order(&self, id: i64) -> AppResult<()> {
        let mut t = self.tables.write().await;
        t.order(id)?;
        t.order_details.retain(|_, d| d.order_id != id);
        t.orders.remove(&id);
        Ok(())
    }

    async fn fetch_recent_orders(&self, limit: i64) -> AppResult<Vec<Order>> {
        let t = self.tables.read().await;
        let mut orders: Vec<&Order> = t.orders.values().collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
        Ok(orders
            .into_iter()
            .take(limit.max(0) as usize)
            .map(|o| t.with_customer_and_details(o))
            .collect())
    }

    async fn sum_order_totals(&self) -> AppResult<f64> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .values()
            .fold(0.0, |acc, o| acc + o.total_amount))
    }

    async fn count_orders_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> AppResult<i64> {
        let t = self.tables.read().await;
        Ok(t.orders
            .values()
            .filter(|o| o.order_date >= from && o.order_date < to)
            .count() as i64)
    }

    // ── Order details ────────────────────────────────────────────────────────

    async fn fetch_all_order_details(&self) -> AppResult<Vec<OrderDetail>> {
        Ok(self.tables.read().await.order_details.values().cloned().collect())
    }

    async fn fetch_order_detail_by_id(&self, id: i64) -> AppResult<OrderDetail> {
        self.tables
            .read()
            .await
            .order_details
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Order detail {} not found", id)))
    }

    async fn insert_order_detail(&self, payload: &CreateOrderDetail) -> AppResult<OrderDetail> {
        self.tables.write().await.insert_line(payload)
    }

    async fn update_order_detail(&self, id: i64, payload: &UpdateOrderDetail) -> AppResult<OrderDetail> {
        let mut t = self.tables.write().await;
        let mut detail = t
            .order_details
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Order detail {} not found", id)))?;
        payload.apply_to(&mut detail);
        t.order(detail.order_id)?;
        t.product(detail.product_id)?;
        t.order_details.insert(id, detail.clone());
        Ok(detail)
    }

    async fn delete_order_detail(&self, id: i64) -> AppResult<()> {
        self.tables
            .write()
            .await
            .order_details
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Order detail {} not found", id)))
    }

    async fn fetch_order_details_for_product(&self, product_id: i64) -> AppResult<Vec<OrderDetail>> {
        let t = self.tables.read().await;
        Ok(t.order_details
            .values()
            .filter(|d| d.product_id == product_id)
            .cloned()
            .collect())
    }
}
