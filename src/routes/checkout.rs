use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::checkout::{CheckoutRequest, CheckoutResponse},
    error::AppResult,
    middleware::auth::CartOwner,
    response::ApiResponse,
    services::checkout_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(checkout))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    params(
        ("x-cart-session" = Option<String>, Header, description = "Anonymous cart key")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Order created, redirect the buyer to approval_url", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Cart missing or empty, invalid customer details"),
        (status = 404, description = "School not found"),
        (status = 502, description = "Payment gateway unavailable")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    owner: CartOwner,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CheckoutResponse>>)> {
    let resp = checkout_service::checkout(&state, &owner, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
