use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog identifier of a product
pub type ProductId = u64;

/// Product reference data as served by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: Decimal,
}

/// Live available quantity for a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "id", alias = "productId", default)]
    pub product_id: ProductId,
    pub amount: u32,
}

impl StockRecord {
    pub fn new(product_id: ProductId, amount: u32) -> Self {
        Self { product_id, amount }
    }

    pub fn is_exhausted(&self) -> bool {
        self.amount == 0
    }

    /// Whether `amount` units of this product can sit in a cart
    pub fn allows(&self, amount: i64) -> bool {
        amount >= 1 && amount <= i64::from(self.amount)
    }
}
