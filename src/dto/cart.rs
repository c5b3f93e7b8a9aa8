use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CartItem, StudentGender, StudentInfo};

fn default_quantity() -> i32 {
    1
}

fn empty_measurements() -> Value {
    Value::Object(Default::default())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default = "empty_measurements")]
    #[schema(value_type = Object)]
    pub measurements: Value,
    #[serde(flatten)]
    pub student: StudentInfo,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: Option<i32>,
    #[schema(value_type = Option<Object>)]
    pub measurements: Option<Value>,
    pub student_name: Option<String>,
    pub student_age: Option<i32>,
    pub student_grade: Option<String>,
    pub student_gender: Option<StudentGender>,
    pub student_height: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product_name: String,
    pub unit_price: i64,
    pub line_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub cart_id: Uuid,
    /// Present for anonymous carts; send it back in `x-cart-session`.
    pub session_key: Option<String>,
    pub items: Vec<CartLine>,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub session_key: Option<String>,
    pub item: CartItem,
}
