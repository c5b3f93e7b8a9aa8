use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{AddCartItemRequest, CartItemResponse, CartView, UpdateCartItemRequest},
    error::AppResult,
    middleware::auth::CartOwner,
    models::CartItem,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_cart))
        .route("/items", post(add_item))
        .route("/items/{id}", patch(update_item).delete(remove_item))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    params(
        ("x-cart-session" = Option<String>, Header, description = "Anonymous cart key")
    ),
    responses(
        (status = 200, description = "Current cart with line totals", body = ApiResponse<CartView>)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    owner: CartOwner,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::get_cart(&state, &owner).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    params(
        ("x-cart-session" = Option<String>, Header, description = "Anonymous cart key")
    ),
    request_body = AddCartItemRequest,
    responses(
        (status = 201, description = "Item added or quantity increased", body = ApiResponse<CartItemResponse>),
        (status = 400, description = "Invalid quantity or measurements"),
        (status = 404, description = "Product not found")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_item(
    State(state): State<AppState>,
    owner: CartOwner,
    Json(payload): Json<AddCartItemRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CartItemResponse>>)> {
    let resp = cart_service::add_item(&state, &owner, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/cart/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item ID"),
        ("x-cart-session" = Option<String>, Header, description = "Anonymous cart key")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Updated cart item", body = ApiResponse<CartItem>),
        (status = 400, description = "Invalid quantity or measurements"),
        (status = 403, description = "Item belongs to another cart"),
        (status = 404, description = "Not Found")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_item(
    State(state): State<AppState>,
    owner: CartOwner,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCartItemRequest>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::update_item(&state, &owner, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{id}",
    params(
        ("id" = Uuid, Path, description = "Cart item ID"),
        ("x-cart-session" = Option<String>, Header, description = "Anonymous cart key")
    ),
    responses(
        (status = 200, description = "Removed from cart", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Item belongs to another cart"),
        (status = 404, description = "Not Found")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_item(
    State(state): State<AppState>,
    owner: CartOwner,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_item(&state, &owner, id).await?;
    Ok(Json(resp))
}
