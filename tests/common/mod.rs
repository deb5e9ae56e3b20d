#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tempfile::TempDir;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rocketshoes_cart::{
    create_app,
    models::{CartLineItem, CartSnapshot, ProductId},
    repositories::{FileStore, HttpApiClient, PersistentStore},
    services::{BufferedNotifier, CartStore, DEFAULT_CART_KEY},
    Metrics,
};

/// A running cart service wired to a fake store API and a temporary storage dir
pub struct TestEnvironment {
    pub client: Client,
    pub base_url: String,
    pub store_api: MockServer,
    pub storage_dir: TempDir,
    pub cart_store: Arc<CartStore>,
    pub notifier: Arc<BufferedNotifier>,
    pub metrics: Arc<Metrics>,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self::with_persisted(None).await
    }

    /// Start the service with `raw` already stored under the cart key
    pub async fn with_persisted(raw: Option<&str>) -> Self {
        let store_api = MockServer::start().await;
        let storage_dir = tempfile::tempdir().expect("Failed to create temp dir");

        let storage = Arc::new(FileStore::open(storage_dir.path()).expect("Failed to open store"));
        if let Some(raw) = raw {
            storage
                .set(DEFAULT_CART_KEY, raw)
                .expect("Failed to seed store");
        }

        let api_client = Arc::new(
            HttpApiClient::new(store_api.uri(), Duration::from_secs(2))
                .expect("Failed to build API client"),
        );
        let notifier = Arc::new(BufferedNotifier::new(32));
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));

        let cart_store = Arc::new(
            CartStore::load(
                api_client.clone(),
                api_client,
                storage,
                notifier.clone(),
                DEFAULT_CART_KEY,
            )
            .expect("Failed to load cart store")
            .with_metrics(metrics.clone()),
        );

        let app = create_app(cart_store.clone(), metrics.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server failed");
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{}", addr),
            store_api,
            storage_dir,
            cart_store,
            notifier,
            metrics,
        }
    }

    /// Serve `amount` units of stock for `product_id`
    pub async fn mock_stock(&self, product_id: ProductId, amount: u32) {
        Mock::given(method("GET"))
            .and(path(format!("/stock/{}", product_id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "id": product_id, "amount": amount })),
            )
            .mount(&self.store_api)
            .await;
    }

    /// Serve a catalog entry for `product_id`
    pub async fn mock_product(&self, product_id: ProductId, title: &str, price: f64) {
        Mock::given(method("GET"))
            .and(path(format!("/products/{}", product_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": product_id,
                "title": title,
                "price": price,
                "image": format!("https://cdn.test/{}.jpg", product_id),
            })))
            .mount(&self.store_api)
            .await;
    }

    /// Fail every request for `path`
    pub async fn mock_failure(&self, route: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.store_api)
            .await;
    }

    /// Decode what is currently persisted under the cart key
    pub fn persisted_items(&self) -> Option<Vec<CartLineItem>> {
        let raw = std::fs::read_to_string(self.storage_dir.path().join("cart.json")).ok()?;
        CartSnapshot::decode(&raw).ok().map(|cart| cart.into_items())
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

pub fn legacy_cart_json(items: &[(ProductId, u32)]) -> String {
    let items: Vec<_> = items
        .iter()
        .map(|(id, amount)| {
            json!({
                "id": id,
                "title": format!("Shoe {}", id),
                "image": format!("https://cdn.test/{}.jpg", id),
                "price": 100,
                "amount": amount,
            })
        })
        .collect();
    serde_json::Value::Array(items).to_string()
}
