use thiserror::Error;

use super::ProductId;

/// Errors surfaced by cart mutations
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Out of stock: product_id={product_id}, requested={requested}, available={available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    #[error("Failed to add product {product_id}: {source}")]
    AddFailed {
        product_id: ProductId,
        #[source]
        source: LookupError,
    },

    #[error("Failed to remove product {product_id}: not in cart")]
    RemoveFailed { product_id: ProductId },

    #[error("Failed to update amount of product {product_id}: {source}")]
    UpdateFailed {
        product_id: ProductId,
        #[source]
        source: LookupError,
    },
}

impl CartError {
    /// Short message shown to the shopper as a transient notification
    pub fn user_message(&self) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => "Requested quantity is out of stock",
            CartError::AddFailed { .. } => "Error adding product",
            CartError::RemoveFailed { .. } => "Error removing product",
            CartError::UpdateFailed { .. } => "Error changing product amount",
        }
    }

    /// Stable label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => "out_of_stock",
            CartError::AddFailed { .. } => "add_failed",
            CartError::RemoveFailed { .. } => "remove_failed",
            CartError::UpdateFailed { .. } => "update_failed",
        }
    }

    pub fn product_id(&self) -> ProductId {
        match self {
            CartError::OutOfStock { product_id, .. }
            | CartError::AddFailed { product_id, .. }
            | CartError::RemoveFailed { product_id }
            | CartError::UpdateFailed { product_id, .. } => *product_id,
        }
    }
}

/// Errors from the remote stock and catalog lookups
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Request failed: {message}")]
    Transport { message: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response body: {source}")]
    Malformed {
        #[from]
        source: serde_json::Error,
    },

    #[error("Catalog returned product {actual} when {expected} was requested")]
    UnexpectedProduct {
        expected: ProductId,
        actual: ProductId,
    },
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport {
            message: err.to_string(),
        }
    }
}

/// Errors from the key-value store backing the cart
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Errors decoding a persisted cart snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot JSON: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("Unknown snapshot schema: {schema}")]
    UnknownSchema { schema: String },

    #[error("Unsupported snapshot version: {version} (max supported {supported})")]
    UnsupportedVersion { version: u32, supported: u32 },

    #[error("Invalid snapshot contents: {message}")]
    InvalidItems { message: String },
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;

/// Result type alias for remote lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
