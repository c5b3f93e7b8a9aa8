use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{ConfirmOrderResponse, OrderList, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::tailor_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/confirm-order/{token}", post(confirm_order))
        .route("/orders", get(list_orders))
        .route("/orders/{id}/status", patch(update_order_status))
}

#[utoipa::path(
    post,
    path = "/api/tailor/confirm-order/{token}",
    params(
        ("token" = String, Path, description = "Confirmation token from the assignment email")
    ),
    responses(
        (status = 200, description = "Order moved to production", body = ApiResponse<ConfirmOrderResponse>),
        (status = 400, description = "Invalid token or order not awaiting confirmation")
    ),
    tag = "Tailor"
)]
pub async fn confirm_order(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<ApiResponse<ConfirmOrderResponse>>> {
    let resp = tailor_service::confirm_order(&state, &token).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tailor/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders for the schools the tailor serves", body = ApiResponse<OrderList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Tailor"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = tailor_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/tailor/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Not a tailor for this order's school"),
        (status = 404, description = "Order not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Tailor"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = tailor_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
