use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::models::{
    AddProductRequest, CartError, CartResponse, ProductId, UpdateAmountRequest,
    UpdateProductAmount,
};
use crate::services::CartStore;

/// Shared application state
#[derive(Clone)]
pub struct ApiState {
    pub cart_store: Arc<CartStore>,
}

/// Create API router with all cart endpoints
pub fn create_api_router(cart_store: Arc<CartStore>) -> Router {
    let state = ApiState { cart_store };

    Router::new()
        .route("/api/cart", get(get_cart))
        .route("/api/cart/items", post(add_product))
        .route(
            "/api/cart/items/:product_id",
            put(update_product_amount).delete(remove_product),
        )
        .with_state(state)
}

/// Get the current cart with totals
#[instrument(name = "get_cart", skip(state))]
pub async fn get_cart(State(state): State<ApiState>) -> Json<CartResponse> {
    let cart = state.cart_store.summary().await;
    info!(items = cart.items.len(), "Retrieved cart");
    Json(cart)
}

/// Add one unit of a product
#[instrument(name = "add_product", skip(state, request), fields(product_id = request.product_id))]
pub async fn add_product(
    State(state): State<ApiState>,
    Json(request): Json<AddProductRequest>,
) -> Result<(StatusCode, Json<CartResponse>), (StatusCode, Json<Value>)> {
    match state.cart_store.add_product(request.product_id).await {
        Ok(cart) => {
            info!(items = cart.len(), "Added product to cart");
            Ok((StatusCode::CREATED, Json(cart.to_response())))
        }
        Err(err) => {
            error!("Failed to add product to cart: {}", err);
            Err(cart_error_to_response(err))
        }
    }
}

/// Set the amount of a product already in the cart
#[instrument(name = "update_product_amount", skip(state, request), fields(
    product_id = product_id,
    amount = request.amount,
))]
pub async fn update_product_amount(
    State(state): State<ApiState>,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateAmountRequest>,
) -> Result<Json<CartResponse>, (StatusCode, Json<Value>)> {
    let update = UpdateProductAmount {
        product_id,
        amount: request.amount,
    };

    match state.cart_store.update_product_amount(update).await {
        Ok(cart) => Ok(Json(cart.to_response())),
        Err(err) => {
            error!("Failed to update product amount: {}", err);
            Err(cart_error_to_response(err))
        }
    }
}

/// Remove a product from the cart
#[instrument(name = "remove_product", skip(state))]
pub async fn remove_product(
    State(state): State<ApiState>,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    match state.cart_store.remove_product(product_id).await {
        Ok(_) => {
            info!("Removed product from cart");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            error!("Failed to remove product from cart: {}", err);
            Err(cart_error_to_response(err))
        }
    }
}

/// Convert CartError to HTTP response
pub fn cart_error_to_response(err: CartError) -> (StatusCode, Json<Value>) {
    let status = match err {
        CartError::OutOfStock { .. } => StatusCode::CONFLICT,
        CartError::RemoveFailed { .. } => StatusCode::NOT_FOUND,
        CartError::AddFailed { .. } | CartError::UpdateFailed { .. } => StatusCode::BAD_GATEWAY,
    };

    (
        status,
        Json(json!({
            "error": err.user_message(),
            "detail": err.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
