use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{error, info, instrument, Instrument};

use crate::models::{LookupError, LookupResult, Product, ProductId, StockRecord};
use crate::repositories::{ProductCatalog, StockService};

/// REST client for the store API (`/stock/:id` and `/products/:id`)
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

impl HttpApiClient {
    /// Create a client with its own connection pool and request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> LookupResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client on top of an existing reqwest client
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn create_http_span(&self, operation: &str, url: &str) -> tracing::Span {
        tracing::info_span!(
            "StoreApi",
            "api.operation" = operation,
            "http.method" = "GET",
            "http.url" = %url,
            "http.status_code" = tracing::field::Empty,
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> LookupResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let span = self.create_http_span(operation, &url);

        async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                error!("Request to store API failed: {}", e);
                LookupError::from(e)
            })?;

            let status = response.status();
            tracing::Span::current().record("http.status_code", status.as_u16());
            if !status.is_success() {
                error!("Store API returned status {}", status);
                return Err(LookupError::Status {
                    status: status.as_u16(),
                    url: url.clone(),
                });
            }

            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|e| {
                error!("Store API returned a malformed body: {}", e);
                LookupError::from(e)
            })
        }
        .instrument(span)
        .await
    }
}

#[async_trait]
impl StockService for HttpApiClient {
    #[instrument(skip(self))]
    async fn get_stock(&self, product_id: ProductId) -> LookupResult<StockRecord> {
        let mut stock: StockRecord = self
            .get_json("GetStock", &format!("/stock/{}", product_id))
            .await?;
        // the stock body is keyed by the path, not by its own id field
        stock.product_id = product_id;

        info!(amount = stock.amount, "Stock retrieved");
        Ok(stock)
    }
}

#[async_trait]
impl ProductCatalog for HttpApiClient {
    #[instrument(skip(self))]
    async fn get_product(&self, product_id: ProductId) -> LookupResult<Product> {
        let product: Product = self
            .get_json("GetProduct", &format!("/products/{}", product_id))
            .await?;

        if product.id != product_id {
            return Err(LookupError::UnexpectedProduct {
                expected: product_id,
                actual: product.id,
            });
        }

        info!(title = %product.title, "Product retrieved");
        Ok(product)
    }
}
