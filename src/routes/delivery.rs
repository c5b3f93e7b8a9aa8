use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::orders::{ShipmentList, UpdateShipmentStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Shipment,
    response::ApiResponse,
    routes::params::PageQuery,
    services::delivery_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shipments", get(list_shipments))
        .route("/shipments/{id}/status", patch(update_shipment_status))
}

#[utoipa::path(
    get,
    path = "/api/delivery/shipments",
    params(PageQuery),
    responses(
        (status = 200, description = "Shipments assigned to the caller", body = ApiResponse<ShipmentList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn list_shipments(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<ShipmentList>>> {
    let resp = delivery_service::list_shipments(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/delivery/shipments/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    request_body = UpdateShipmentStatusRequest,
    responses(
        (status = 200, description = "Shipment advanced", body = ApiResponse<Shipment>),
        (status = 400, description = "Transition not allowed"),
        (status = 403, description = "Not the assigned delivery partner"),
        (status = 404, description = "Shipment not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Delivery"
)]
pub async fn update_shipment_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShipmentStatusRequest>,
) -> AppResult<Json<ApiResponse<Shipment>>> {
    let resp = delivery_service::update_shipment_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
