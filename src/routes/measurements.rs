use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    error::AppResult,
    measurements::MeasurementTemplate,
    response::ApiResponse,
    routes::params::TemplateQuery,
    services::measurement_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/template", get(template))
}

#[utoipa::path(
    get,
    path = "/api/measurements/template",
    params(TemplateQuery),
    responses(
        (status = 200, description = "Measurement fields for the product's garment type", body = ApiResponse<MeasurementTemplate>),
        (status = 400, description = "product_id missing"),
        (status = 404, description = "Product not found")
    ),
    tag = "Measurements"
)]
pub async fn template(
    State(state): State<AppState>,
    Query(query): Query<TemplateQuery>,
) -> AppResult<Json<ApiResponse<MeasurementTemplate>>> {
    let resp = measurement_service::template(&state, query).await?;
    Ok(Json(resp))
}
