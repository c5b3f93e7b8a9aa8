use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{ApprovalRequest, DeliveryPartnerList, TailorList, UserList},
        orders::{AssignShipmentRequest, OrderList, OrderWithLines, UpdateOrderStatusRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{DeliveryPartnerProfile, Order, Shipment, TailorProfile},
    response::ApiResponse,
    routes::{
        params::{OrderListQuery, ProfileListQuery, UserListQuery},
        products, schools,
    },
    services::admin_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/schools", schools::admin_router())
        .nest("/products", products::admin_router())
        .route("/users", get(list_users))
        .route("/tailors", get(list_tailors))
        .route("/tailors/{id}/approval", patch(set_tailor_approval))
        .route("/delivery-partners", get(list_delivery_partners))
        .route("/delivery-partners/{id}/approval", patch(set_delivery_approval))
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/shipments/{id}/assign", post(assign_shipment))
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "List users", body = ApiResponse<UserList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UserListQuery>,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = admin_service::list_users(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/tailors",
    params(ProfileListQuery),
    responses(
        (status = 200, description = "List tailor profiles", body = ApiResponse<TailorList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_tailors(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProfileListQuery>,
) -> AppResult<Json<ApiResponse<TailorList>>> {
    let resp = admin_service::list_tailors(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/tailors/{id}/approval",
    params(
        ("id" = Uuid, Path, description = "Tailor profile ID")
    ),
    request_body = ApprovalRequest,
    responses(
        (status = 200, description = "Approval updated", body = ApiResponse<TailorProfile>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_tailor_approval(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApprovalRequest>,
) -> AppResult<Json<ApiResponse<TailorProfile>>> {
    let resp = admin_service::set_tailor_approval(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/delivery-partners",
    params(ProfileListQuery),
    responses(
        (status = 200, description = "List delivery partner profiles", body = ApiResponse<DeliveryPartnerList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_delivery_partners(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProfileListQuery>,
) -> AppResult<Json<ApiResponse<DeliveryPartnerList>>> {
    let resp = admin_service::list_delivery_partners(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/delivery-partners/{id}/approval",
    params(
        ("id" = Uuid, Path, description = "Delivery partner profile ID")
    ),
    request_body = ApprovalRequest,
    responses(
        (status = 200, description = "Approval updated", body = ApiResponse<DeliveryPartnerProfile>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn set_delivery_approval(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApprovalRequest>,
) -> AppResult<Json<ApiResponse<DeliveryPartnerProfile>>> {
    let resp = admin_service::set_delivery_approval(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderListQuery),
    responses(
    (status = 200, description = "Get all orders (admin only)", body = ApiResponse<OrderList>),
    (status = 403, description = "Forbidden"),
    (status = 500, description = "Internal Server Error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
    (
        "id" = Uuid, Path, description = "Order ID")
    ),
    responses(
    (status = 200, description = "Get any order with lines (admin only)", body = ApiResponse<OrderWithLines>),
    (status = 404, description = "Not Found", ),
    (status = 403, description = "Forbidden", ),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"

)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithLines>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
    (
        "id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/shipments/{id}/assign",
    params(
        ("id" = Uuid, Path, description = "Shipment ID")
    ),
    request_body = AssignShipmentRequest,
    responses(
        (status = 200, description = "Shipment assigned", body = ApiResponse<Shipment>),
        (status = 400, description = "Shipment not pending or partner not approved"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn assign_shipment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignShipmentRequest>,
) -> AppResult<Json<ApiResponse<Shipment>>> {
    let resp = admin_service::assign_shipment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
