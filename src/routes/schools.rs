use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        products::ProductList,
        schools::{CreateSchoolRequest, SchoolList, UpdateSchoolRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::School,
    response::ApiResponse,
    routes::params::{ProductQuery, SchoolQuery},
    services::{product_service, school_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schools))
        .route("/{id}", get(get_school))
        .route("/{id}/products", get(list_school_products))
}

/// Mounted under `/admin/schools`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_school))
        .route("/{id}", get(get_school_admin).patch(update_school))
}

#[utoipa::path(
    get,
    path = "/api/schools",
    params(SchoolQuery),
    responses(
        (status = 200, description = "Active schools", body = ApiResponse<SchoolList>)
    ),
    tag = "Schools"
)]
pub async fn list_schools(
    State(state): State<AppState>,
    Query(query): Query<SchoolQuery>,
) -> AppResult<Json<ApiResponse<SchoolList>>> {
    let resp = school_service::list_schools(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/schools/{id}",
    params(
        ("id" = Uuid, Path, description = "School ID")
    ),
    responses(
        (status = 200, description = "Get school", body = ApiResponse<School>),
        (status = 404, description = "School not found or inactive")
    ),
    tag = "Schools"
)]
pub async fn get_school(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<School>>> {
    let resp = school_service::get_active_school(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/schools/{id}/products",
    params(
        ("id" = Uuid, Path, description = "School ID"),
        ProductQuery
    ),
    responses(
        (status = 200, description = "Products of a school", body = ApiResponse<ProductList>),
        (status = 404, description = "School not found")
    ),
    tag = "Products"
)]
pub async fn list_school_products(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_school_products(&state, id, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/schools",
    request_body = CreateSchoolRequest,
    responses(
        (status = 201, description = "Create school", body = ApiResponse<School>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_school(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSchoolRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<School>>)> {
    let resp = school_service::create_school(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/admin/schools/{id}",
    params(
        ("id" = Uuid, Path, description = "School ID")
    ),
    responses(
        (status = 200, description = "Get any school", body = ApiResponse<School>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_school_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<School>>> {
    let resp = school_service::get_school_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/schools/{id}",
    params(
        ("id" = Uuid, Path, description = "School ID")
    ),
    request_body = UpdateSchoolRequest,
    responses(
        (status = 200, description = "Updated school", body = ApiResponse<School>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_school(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSchoolRequest>,
) -> AppResult<Json<ApiResponse<School>>> {
    let resp = school_service::update_school(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
