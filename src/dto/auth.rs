use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{DeliveryPartnerProfile, TailorProfile, User};

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// Identity and contact fields shared by tailor and delivery partner sign-up.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PartnerAccountFields {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
    pub nationality: Option<String>,
    pub physical_address: Option<String>,
    pub town: Option<String>,
    pub province: Option<String>,
    pub payment_details: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TailorRegisterRequest {
    #[serde(flatten)]
    pub account: PartnerAccountFields,
    pub business_name: Option<String>,
    /// At least three schools the tailor will serve.
    pub schools: Vec<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeliveryRegisterRequest {
    #[serde(flatten)]
    pub account: PartnerAccountFields,
    pub vehicle_type: Option<String>,
    pub license_plate: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TailorRegistration {
    pub message: String,
    pub user: User,
    pub profile: TailorProfile,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryRegistration {
    pub message: String,
    pub user: User,
    pub profile: DeliveryPartnerProfile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    #[default]
    Tailor,
    Delivery,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub verification_code: String,
    #[serde(default)]
    pub user_type: UserType,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResendVerificationRequest {
    pub email: String,
    #[serde(default)]
    pub user_type: UserType,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
