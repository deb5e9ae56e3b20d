use async_trait::async_trait;

use crate::models::{LookupResult, ProductId, StockRecord};

/// Authoritative inventory counts, queried live on every mutation
#[async_trait]
pub trait StockService: Send + Sync {
    /// Fetch the currently available quantity for a product
    async fn get_stock(&self, product_id: ProductId) -> LookupResult<StockRecord>;
}
