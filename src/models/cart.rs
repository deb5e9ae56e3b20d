use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Product, ProductId};

/// Shopping cart: line items unique by product id, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

/// A product with its requested quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: Decimal,
    pub amount: u32,
}

/// Target absolute quantity for a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Request model for adding a product to the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub product_id: ProductId,
}

/// Request model for setting a line item's amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAmountRequest {
    pub amount: i64,
}

/// Response model for cart reads and mutations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total_items: u64,
    pub total_price: Decimal,
}

/// Line item with its computed subtotal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: Decimal,
    pub amount: u32,
    pub subtotal: Decimal,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from already-validated line items
    pub(crate) fn from_items(items: Vec<CartLineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn find(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Copy of this cart with the product's amount increased by one
    pub fn with_incremented(&self, product_id: ProductId) -> Cart {
        self.map_item(product_id, |item| CartLineItem {
            amount: item.amount.saturating_add(1),
            ..item.clone()
        })
    }

    /// Copy of this cart with a new line item at the end
    pub fn with_appended(&self, item: CartLineItem) -> Cart {
        let mut items = self.items.clone();
        items.push(item);
        Cart { items }
    }

    /// Copy of this cart with the product's amount set to `amount`
    pub fn with_amount(&self, product_id: ProductId, amount: u32) -> Cart {
        self.map_item(product_id, |item| CartLineItem {
            amount,
            ..item.clone()
        })
    }

    /// Copy of this cart without the product; other items keep their order
    pub fn without(&self, product_id: ProductId) -> Cart {
        Cart {
            items: self
                .items
                .iter()
                .filter(|item| item.id != product_id)
                .cloned()
                .collect(),
        }
    }

    /// Total number of units across all line items
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Total price of all line items
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }

    /// Units in cart per product, for badges on the product listing
    pub fn amounts_by_product(&self) -> BTreeMap<ProductId, u32> {
        self.items
            .iter()
            .map(|item| (item.id, item.amount))
            .collect()
    }

    pub fn to_response(&self) -> CartResponse {
        CartResponse {
            items: self.items.iter().map(CartLineItem::to_response).collect(),
            total_items: self.total_items(),
            total_price: self.total_price(),
        }
    }

    fn map_item<F>(&self, product_id: ProductId, f: F) -> Cart
    where
        F: Fn(&CartLineItem) -> CartLineItem,
    {
        Cart {
            items: self
                .items
                .iter()
                .map(|item| if item.id == product_id { f(item) } else { item.clone() })
                .collect(),
        }
    }
}

impl CartLineItem {
    pub fn from_product(product: Product, amount: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image: product.image,
            price: product.price,
            amount,
        }
    }

    /// Price of this line (price * amount)
    pub fn subtotal(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }

    pub fn to_response(&self) -> CartItemResponse {
        CartItemResponse {
            id: self.id,
            title: self.title.clone(),
            image: self.image.clone(),
            price: self.price,
            amount: self.amount,
            subtotal: self.subtotal(),
        }
    }
}
