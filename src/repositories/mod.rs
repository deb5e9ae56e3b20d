// Repositories module - access to the remote API and local storage

pub mod api_client;
pub mod catalog;
pub mod stock;
pub mod storage;

pub use api_client::HttpApiClient;
pub use catalog::ProductCatalog;
pub use stock::StockService;
pub use storage::{FileStore, InMemoryStore, PersistentStore};
