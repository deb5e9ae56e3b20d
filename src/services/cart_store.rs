use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use crate::models::{
    Cart, CartError, CartLineItem, CartResponse, CartResult, CartSnapshot, LookupResult, Product,
    ProductId, StockRecord, StorageResult, UpdateProductAmount,
};
use crate::observability::Metrics;
use crate::repositories::{PersistentStore, ProductCatalog, StockService};
use crate::services::{Notification, Notifier};

/// Default storage key holding the serialized cart
pub const DEFAULT_CART_KEY: &str = "cart";

/// Owns the shopper's cart and applies stock-checked mutations to it
///
/// Every mutation reads the current cart, consults the store API, builds the
/// next cart and swaps it in as a whole. Mutations are serialised by an
/// internal lock, so two overlapping calls can never both act on the same
/// stale amount. Reads never wait on the network.
pub struct CartStore {
    stock: Arc<dyn StockService>,
    catalog: Arc<dyn ProductCatalog>,
    storage: Arc<dyn PersistentStore>,
    notifier: Arc<dyn Notifier>,
    metrics: Option<Arc<Metrics>>,
    cart_key: String,
    cart: RwLock<Cart>,
    mutation: Mutex<()>,
}

impl CartStore {
    /// Restore the cart persisted under `cart_key`, or start empty
    ///
    /// A stored value that cannot be decoded is discarded with a warning; a
    /// failure to read the store at all is returned.
    pub fn load(
        stock: Arc<dyn StockService>,
        catalog: Arc<dyn ProductCatalog>,
        storage: Arc<dyn PersistentStore>,
        notifier: Arc<dyn Notifier>,
        cart_key: impl Into<String>,
    ) -> StorageResult<Self> {
        let cart_key = cart_key.into();

        let cart = match storage.get(&cart_key)? {
            Some(raw) => match CartSnapshot::decode(&raw) {
                Ok(cart) => {
                    info!(key = %cart_key, items = cart.len(), "Restored persisted cart");
                    cart
                }
                Err(e) => {
                    warn!(key = %cart_key, error = %e, "Discarding unreadable persisted cart");
                    Cart::new()
                }
            },
            None => {
                info!(key = %cart_key, "No persisted cart, starting empty");
                Cart::new()
            }
        };

        Ok(Self {
            stock,
            catalog,
            storage,
            notifier,
            metrics: None,
            cart_key,
            cart: RwLock::new(cart),
            mutation: Mutex::new(()),
        })
    }

    /// Record operation and lookup outcomes in `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn cart_key(&self) -> &str {
        &self.cart_key
    }

    /// Snapshot of the current cart
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    /// Current cart with subtotals and totals
    pub async fn summary(&self) -> CartResponse {
        self.cart.read().await.to_response()
    }

    /// Add one unit of a product, appending a new line item if it is not in the cart yet
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> CartResult<Cart> {
        let _guard = self.mutation.lock().await;
        let current = self.cart().await;

        let result = self.plan_add(&current, product_id).await.map(Some);
        self.commit("add_product", current, result).await
    }

    /// Remove a product's line item
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> CartResult<Cart> {
        let _guard = self.mutation.lock().await;
        let current = self.cart().await;

        let result = if current.contains(product_id) {
            Ok(Some(current.without(product_id)))
        } else {
            Err(CartError::RemoveFailed { product_id })
        };
        self.commit("remove_product", current, result).await
    }

    /// Set a line item's amount to an absolute value within available stock
    ///
    /// A product that is not in the cart is left alone without error.
    #[instrument(skip(self), fields(product_id = update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) -> CartResult<Cart> {
        let _guard = self.mutation.lock().await;
        let current = self.cart().await;

        let result = self.plan_update(&current, update).await;
        self.commit("update_product_amount", current, result).await
    }

    async fn plan_add(&self, current: &Cart, product_id: ProductId) -> CartResult<Cart> {
        let stock = self
            .lookup_stock(product_id)
            .await
            .map_err(|source| CartError::AddFailed { product_id, source })?;

        let in_cart = current.find(product_id).map(|item| item.amount);
        let exhausted = match in_cart {
            Some(amount) => amount >= stock.amount,
            None => stock.is_exhausted(),
        };
        if exhausted {
            return Err(CartError::OutOfStock {
                product_id,
                requested: i64::from(in_cart.unwrap_or(0)) + 1,
                available: stock.amount,
            });
        }

        if in_cart.is_some() {
            return Ok(current.with_incremented(product_id));
        }

        let product = self
            .lookup_product(product_id)
            .await
            .map_err(|source| CartError::AddFailed { product_id, source })?;

        Ok(current.with_appended(CartLineItem::from_product(product, 1)))
    }

    async fn plan_update(
        &self,
        current: &Cart,
        update: UpdateProductAmount,
    ) -> CartResult<Option<Cart>> {
        let product_id = update.product_id;
        if !current.contains(product_id) {
            info!("Product not in cart, nothing to update");
            return Ok(None);
        }

        let stock = self
            .lookup_stock(product_id)
            .await
            .map_err(|source| CartError::UpdateFailed { product_id, source })?;

        match u32::try_from(update.amount) {
            Ok(amount) if stock.allows(update.amount) => {
                Ok(Some(current.with_amount(product_id, amount)))
            }
            _ => Err(CartError::OutOfStock {
                product_id,
                requested: update.amount,
                available: stock.amount,
            }),
        }
    }

    /// Persist and publish a planned cart, or surface the failure
    async fn commit(
        &self,
        operation: &str,
        current: Cart,
        result: CartResult<Option<Cart>>,
    ) -> CartResult<Cart> {
        match result {
            Ok(Some(next)) => {
                self.persist(&next);
                *self.cart.write().await = next.clone();
                self.record_operation(operation, "success");
                info!(operation, items = next.len(), "Cart updated");
                Ok(next)
            }
            Ok(None) => {
                self.record_operation(operation, "noop");
                Ok(current)
            }
            Err(err) => {
                warn!(operation, error = %err, "Cart operation rejected");
                self.record_operation(operation, err.kind());
                self.notifier.notify(Notification::from(&err));
                Err(err)
            }
        }
    }

    fn persist(&self, cart: &Cart) {
        let written = CartSnapshot::capture(cart)
            .encode()
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                self.storage
                    .set(&self.cart_key, &raw)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = written {
            warn!(key = %self.cart_key, error = %e, "Failed to persist cart");
        }
    }

    async fn lookup_stock(&self, product_id: ProductId) -> LookupResult<StockRecord> {
        let started = Instant::now();
        let result = self.stock.get_stock(product_id).await;
        self.record_lookup("stock", result.is_ok(), started);
        result
    }

    async fn lookup_product(&self, product_id: ProductId) -> LookupResult<Product> {
        let started = Instant::now();
        let result = self.catalog.get_product(product_id).await;
        self.record_lookup("catalog", result.is_ok(), started);
        result
    }

    fn record_operation(&self, operation: &str, status: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_cart_operation(operation, status);
        }
    }

    fn record_lookup(&self, lookup: &str, success: bool, started: Instant) {
        if let Some(metrics) = &self.metrics {
            metrics.record_lookup(lookup, success, started.elapsed().as_secs_f64());
        }
    }
}
