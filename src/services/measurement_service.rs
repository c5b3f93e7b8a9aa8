use crate::{
    error::{AppError, AppResult},
    measurements::{self, MeasurementTemplate},
    response::ApiResponse,
    routes::params::TemplateQuery,
    services::product_service,
    state::AppState,
};

pub async fn template(
    state: &AppState,
    query: TemplateQuery,
) -> AppResult<ApiResponse<MeasurementTemplate>> {
    let product_id = query
        .product_id
        .ok_or_else(|| AppError::bad_request("product_id parameter is required"))?;
    let product = product_service::find_product(state, product_id).await?;
    Ok(ApiResponse::success(
        "Measurement template",
        measurements::template_for(product.garment_type),
        None,
    ))
}
