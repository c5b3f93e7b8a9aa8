use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::StudentInfo;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub school_id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    #[serde(flatten)]
    pub student: StudentInfo,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order_id: Uuid,
    pub order_code: String,
    pub total_amount: i64,
    pub payment_id: String,
    pub approval_url: String,
    pub message: String,
}
