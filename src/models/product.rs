use serde::{Deserialize, Serialize};

use super::{Inventory, NewInventoryLine};

/// Catalog entry. `inventory` is filled by the store, never by the row mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Inventory", default)]
    #[sqlx(skip)]
    pub inventory: Vec<Inventory>,
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Category", alias = "category")]
    pub category: String,
    #[serde(rename = "Price", alias = "price")]
    pub price: f64,
    /// Stock rows created together with the product.
    #[serde(rename = "Inventory", alias = "inventory", default)]
    pub inventory: Vec<NewInventoryLine>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    #[serde(rename = "Name", alias = "name")]
    pub name: Option<String>,
    #[serde(rename = "Category", alias = "category")]
    pub category: Option<String>,
    #[serde(rename = "Price", alias = "price")]
    pub price: Option<f64>,
}

impl UpdateProduct {
    /// Overwrites only the fields present in the payload.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(category) = &self.category {
            product.category = category.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
    }
}
