use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Customer;

/// Order header. `details` and `customer` are attached by the store
/// depending on the route; `customer` stays `None` where it is not loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "CustomerID")]
    pub customer_id: i64,
    #[serde(rename = "Customer", default, skip_serializing_if = "Option::is_none")]
    #[sqlx(skip)]
    pub customer: Option<Customer>,
    #[serde(rename = "OrderDate")]
    pub order_date: DateTime<Utc>,
    #[serde(rename = "TotalAmount")]
    pub total_amount: f64,
    #[serde(rename = "OrderStatus")]
    pub order_status: String,
    #[serde(rename = "Details", default)]
    #[sqlx(skip)]
    pub details: Vec<OrderDetail>,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderDetail {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "OrderID")]
    pub order_id: i64,
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    #[serde(rename = "Quantity")]
    pub quantity: i32,
    #[serde(rename = "PricePerUnit")]
    pub price_per_unit: f64,
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// A line submitted inline with an order; the order id comes from the parent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderLine {
    #[serde(rename = "ProductID", alias = "productID", alias = "product_id")]
    pub product_id: i64,
    #[serde(rename = "Quantity", alias = "quantity")]
    pub quantity: i32,
    #[serde(rename = "PricePerUnit", alias = "pricePerUnit", alias = "price_per_unit")]
    pub price_per_unit: f64,
}

impl NewOrderLine {
    pub fn line_total(&self) -> f64 {
        self.quantity as f64 * self.price_per_unit
    }

    pub fn for_order(&self, order_id: i64) -> CreateOrderDetail {
        CreateOrderDetail {
            order_id,
            product_id: self.product_id,
            quantity: self.quantity,
            price_per_unit: self.price_per_unit,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    #[serde(rename = "CustomerID", alias = "customerID", alias = "customer_id")]
    pub customer_id: i64,
    /// Defaults to the time the request is handled.
    #[serde(rename = "OrderDate", alias = "orderDate", alias = "order_date", default)]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(rename = "TotalAmount", alias = "totalAmount", alias = "total_amount")]
    pub total_amount: f64,
    #[serde(
        rename = "OrderStatus",
        alias = "orderStatus",
        alias = "order_status",
        alias = "status"
    )]
    pub order_status: String,
    #[serde(rename = "Details", alias = "details", default)]
    pub details: Vec<NewOrderLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrder {
    #[serde(rename = "CustomerID", alias = "customerID", alias = "customer_id")]
    pub customer_id: Option<i64>,
    #[serde(rename = "OrderDate", alias = "orderDate", alias = "order_date")]
    pub order_date: Option<DateTime<Utc>>,
    #[serde(rename = "TotalAmount", alias = "totalAmount", alias = "total_amount")]
    pub total_amount: Option<f64>,
    #[serde(
        rename = "OrderStatus",
        alias = "orderStatus",
        alias = "order_status",
        alias = "status"
    )]
    pub order_status: Option<String>,
    /// When present, replaces every line of the order.
    #[serde(rename = "Details", alias = "details")]
    pub details: Option<Vec<NewOrderLine>>,
}

impl UpdateOrder {
    /// Merges the header fields; `details` is handled by the store.
    pub fn apply_to(&self, order: &mut Order) {
        if let Some(customer_id) = self.customer_id {
            order.customer_id = customer_id;
        }
        if let Some(order_date) = self.order_date {
            order.order_date = order_date;
        }
        if let Some(total_amount) = self.total_amount {
            order.total_amount = total_amount;
        }
        if let Some(status) = &self.order_status {
            order.order_status = status.clone();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderDetail {
    #[serde(rename = "OrderID", alias = "orderID", alias = "order_id")]
    pub order_id: i64,
    #[serde(rename = "ProductID", alias = "productID", alias = "product_id")]
    pub product_id: i64,
    #[serde(rename = "Quantity", alias = "quantity")]
    pub quantity: i32,
    #[serde(rename = "PricePerUnit", alias = "pricePerUnit", alias = "price_per_unit")]
    pub price_per_unit: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderDetail {
    #[serde(rename = "OrderID", alias = "orderID", alias = "order_id")]
    pub order_id: Option<i64>,
    #[serde(rename = "ProductID", alias = "productID", alias = "product_id")]
    pub product_id: Option<i64>,
    #[serde(rename = "Quantity", alias = "quantity")]
    pub quantity: Option<i32>,
    #[serde(rename = "PricePerUnit", alias = "pricePerUnit", alias = "price_per_unit")]
    pub price_per_unit: Option<f64>,
}

impl UpdateOrderDetail {
    pub fn apply_to(&self, detail: &mut OrderDetail) {
        if let Some(order_id) = self.order_id {
            detail.order_id = order_id;
        }
        if let Some(product_id) = self.product_id {
            detail.product_id = product_id;
        }
        if let Some(quantity) = self.quantity {
            detail.quantity = quantity;
        }
        if let Some(price) = self.price_per_unit {
            detail.price_per_unit = price;
        }
    }
}
