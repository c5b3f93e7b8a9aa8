use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
};

use crate::{
    dto::payments::{
        CancelPaymentRequest, ExecutePaymentRequest, InitiatePaymentRequest, PaymentConfirmation,
        WebhookAck, WebhookEvent,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Order, Payment},
    response::ApiResponse,
    routes::params::PaymentStatusQuery,
    services::payment_service,
    state::AppState,
};

pub const WEBHOOK_TOKEN_HEADER: &str = "x-webhook-token";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/execute", post(execute_payment))
        .route("/cancel", post(cancel_payment))
        .route("/initiate", post(initiate_payment))
        .route("/status", get(payment_status))
        .route("/webhook", post(webhook))
}

#[utoipa::path(
    post,
    path = "/api/payments/execute",
    request_body = ExecutePaymentRequest,
    responses(
        (status = 200, description = "Payment captured, order confirmed", body = ApiResponse<PaymentConfirmation>),
        (status = 400, description = "Already paid or execution failed"),
        (status = 404, description = "Order not found")
    ),
    tag = "Payments"
)]
pub async fn execute_payment(
    State(state): State<AppState>,
    Json(payload): Json<ExecutePaymentRequest>,
) -> AppResult<Json<ApiResponse<PaymentConfirmation>>> {
    let resp = payment_service::execute_payment(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/cancel",
    request_body = CancelPaymentRequest,
    responses(
        (status = 200, description = "Order and payment cancelled", body = ApiResponse<Order>),
        (status = 400, description = "Order is not pending"),
        (status = 404, description = "Order not found")
    ),
    tag = "Payments"
)]
pub async fn cancel_payment(
    State(state): State<AppState>,
    Json(payload): Json<CancelPaymentRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = payment_service::cancel_payment(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/initiate",
    request_body = InitiatePaymentRequest,
    responses(
        (status = 200, description = "Offline payment recorded, order confirmed", body = ApiResponse<PaymentConfirmation>),
        (status = 400, description = "Order already paid"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order id and code do not match")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn initiate_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<InitiatePaymentRequest>,
) -> AppResult<Json<ApiResponse<PaymentConfirmation>>> {
    let resp = payment_service::initiate_payment(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/payments/status",
    params(PaymentStatusQuery),
    responses(
        (status = 200, description = "Payment of the order", body = ApiResponse<Payment>),
        (status = 404, description = "Order or payment not found")
    ),
    tag = "Payments"
)]
pub async fn payment_status(
    State(state): State<AppState>,
    Query(query): Query<PaymentStatusQuery>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let resp = payment_service::payment_status(&state, &query.order_code).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/payments/webhook",
    params(
        ("x-webhook-token" = Option<String>, Header, description = "Shared secret, required when configured")
    ),
    request_body = WebhookEvent,
    responses(
        (status = 200, description = "Event acknowledged", body = WebhookAck),
        (status = 403, description = "Webhook token mismatch")
    ),
    tag = "Payments"
)]
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<WebhookEvent>,
) -> AppResult<Json<WebhookAck>> {
    let token = headers
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    let ack = payment_service::handle_webhook(&state, token, event).await?;
    Ok(Json(ack))
}
