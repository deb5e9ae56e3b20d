use async_trait::async_trait;

use crate::models::{LookupResult, Product, ProductId};

/// Product reference data
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Fetch product metadata by id
    async fn get_product(&self, product_id: ProductId) -> LookupResult<Product>;
}
