use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::auth::{
        DeliveryRegisterRequest, DeliveryRegistration, LoginRequest, LoginResponse,
        MessageResponse, RegisterRequest, ResendVerificationRequest, TailorRegisterRequest,
        TailorRegistration, VerifyEmailRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/tailor/register", post(register_tailor))
        .route("/delivery/register", post(register_delivery))
        .route("/verify-email", post(verify_email))
        .route("/resend-verification", post(resend_verification))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register customer", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid payload or email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<LoginResponse>>)> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
        (status = 400, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = auth_service::profile(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/tailor/register",
    request_body = TailorRegisterRequest,
    responses(
        (status = 201, description = "Tailor registered, verification code emailed", body = ApiResponse<TailorRegistration>),
        (status = 400, description = "Invalid payload, duplicate email or id number, too few schools")
    ),
    tag = "Auth"
)]
pub async fn register_tailor(
    State(state): State<AppState>,
    Json(payload): Json<TailorRegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TailorRegistration>>)> {
    let resp = auth_service::register_tailor(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/delivery/register",
    request_body = DeliveryRegisterRequest,
    responses(
        (status = 201, description = "Delivery partner registered, verification code emailed", body = ApiResponse<DeliveryRegistration>),
        (status = 400, description = "Invalid payload, duplicate email or id number")
    ),
    tag = "Auth"
)]
pub async fn register_delivery(
    State(state): State<AppState>,
    Json(payload): Json<DeliveryRegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<DeliveryRegistration>>)> {
    let resp = auth_service::register_delivery_partner(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Wrong code or already verified"),
        (status = 404, description = "Unknown email or missing profile")
    ),
    tag = "Auth"
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let resp = auth_service::verify_email(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "New verification code emailed", body = ApiResponse<MessageResponse>),
        (status = 400, description = "Already verified"),
        (status = 404, description = "Unknown email or missing profile")
    ),
    tag = "Auth"
)]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<ResendVerificationRequest>,
) -> AppResult<Json<ApiResponse<MessageResponse>>> {
    let resp = auth_service::resend_verification(&state, payload).await?;
    Ok(Json(resp))
}
