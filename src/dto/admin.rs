use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{DeliveryPartnerProfile, TailorProfile, User};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TailorList {
    pub items: Vec<TailorProfile>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryPartnerList {
    pub items: Vec<DeliveryPartnerProfile>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApprovalRequest {
    pub is_approved: bool,
}
