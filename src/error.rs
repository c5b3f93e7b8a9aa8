use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    mail::MailError,
    payments::PaymentError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Forbidden {0}")]
    Forbidden(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Payment gateway error")]
    Gateway(#[from] PaymentError),

    #[error("Notification error")]
    Mail(#[from] MailError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::DbError(_)
            | AppError::OrmError(_)
            | AppError::Mail(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let error = match &self {
            AppError::BadRequest(detail) | AppError::Forbidden(detail) => detail.clone(),
            _ => self.to_string(),
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData { error }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(AppError::NotFound("Order").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::bad_request("Cart is empty").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::forbidden("not your cart").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Gateway(PaymentError::Rejected("declined".into())).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(AppError::NotFound("Order").to_string(), "Order not found");
    }
}
