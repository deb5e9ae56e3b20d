use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Cart, CartLineItem, SnapshotError};

/// Schema tag written into every persisted cart
pub const CART_SCHEMA: &str = "rocketshoes.cart";

/// Current snapshot format version
pub const CART_SCHEMA_VERSION: u32 = 1;

/// Version assigned to the untagged JSON array written by the legacy front-end
pub const LEGACY_SCHEMA_VERSION: u32 = 0;

/// Persisted form of a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub schema: String,
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub items: Vec<CartLineItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCart {
    Tagged(TaggedHeader),
    Legacy(Vec<CartLineItem>),
}

#[derive(Deserialize)]
struct TaggedHeader {
    schema: String,
    version: u32,
    #[serde(default)]
    items: serde_json::Value,
}

impl CartSnapshot {
    pub fn capture(cart: &Cart) -> Self {
        Self {
            schema: CART_SCHEMA.to_string(),
            version: CART_SCHEMA_VERSION,
            saved_at: Utc::now(),
            items: cart.items().to_vec(),
        }
    }

    pub fn encode(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a stored cart, migrating older formats to the current one
    pub fn decode(raw: &str) -> Result<Cart, SnapshotError> {
        let items = match serde_json::from_str::<StoredCart>(raw)? {
            StoredCart::Legacy(items) => items,
            StoredCart::Tagged(header) => {
                if header.schema != CART_SCHEMA {
                    return Err(SnapshotError::UnknownSchema {
                        schema: header.schema,
                    });
                }
                match header.version {
                    // version 0 only ever differed by lacking the header
                    LEGACY_SCHEMA_VERSION | CART_SCHEMA_VERSION => {
                        serde_json::from_value(header.items)?
                    }
                    version => {
                        return Err(SnapshotError::UnsupportedVersion {
                            version,
                            supported: CART_SCHEMA_VERSION,
                        })
                    }
                }
            }
        };

        validate_items(&items)?;
        Ok(Cart::from_items(items))
    }
}

fn validate_items(items: &[CartLineItem]) -> Result<(), SnapshotError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if item.amount == 0 {
            return Err(SnapshotError::InvalidItems {
                message: format!("product {} has amount 0", item.id),
            });
        }
        if !seen.insert(item.id) {
            return Err(SnapshotError::InvalidItems {
                message: format!("product {} appears more than once", item.id),
            });
        }
    }
    Ok(())
}
