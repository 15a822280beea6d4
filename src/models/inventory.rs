use serde::{Deserialize, Serialize};

/// Stock level of one product at the pharmacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Inventory {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    #[serde(rename = "Stock")]
    pub stock: i32,
    #[serde(rename = "ReorderLevel")]
    pub reorder_level: i32,
}

impl Inventory {
    pub fn is_low_stock(&self) -> bool {
        self.stock < self.reorder_level
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInventory {
    #[serde(rename = "ProductID", alias = "productID", alias = "product_id")]
    pub product_id: i64,
    #[serde(rename = "Stock", alias = "stock")]
    pub stock: i32,
    #[serde(rename = "ReorderLevel", alias = "reorderLevel", alias = "reorder_level")]
    pub reorder_level: i32,
}

/// A stock row submitted inline with a new product; the product id comes from the parent.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInventoryLine {
    #[serde(rename = "Stock", alias = "stock")]
    pub stock: i32,
    #[serde(rename = "ReorderLevel", alias = "reorderLevel", alias = "reorder_level")]
    pub reorder_level: i32,
}

impl NewInventoryLine {
    pub fn for_product(&self, product_id: i64) -> CreateInventory {
        CreateInventory {
            product_id,
            stock: self.stock,
            reorder_level: self.reorder_level,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInventory {
    #[serde(rename = "ProductID", alias = "productID", alias = "product_id")]
    pub product_id: Option<i64>,
    #[serde(rename = "Stock", alias = "stock")]
    pub stock: Option<i32>,
    #[serde(rename = "ReorderLevel", alias = "reorderLevel", alias = "reorder_level")]
    pub reorder_level: Option<i32>,
}

impl UpdateInventory {
    pub fn apply_to(&self, item: &mut Inventory) {
        if let Some(product_id) = self.product_id {
            item.product_id = product_id;
        }
        if let Some(stock) = self.stock {
            item.stock = stock;
        }
        if let Some(reorder_level) = self.reorder_level {
            item.reorder_level = reorder_level;
        }
    }
}
