use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::School;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSchoolRequest {
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub town: Option<String>,
    pub province: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub town: Option<String>,
    pub province: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SchoolList {
    #[schema(value_type = Vec<School>)]
    pub items: Vec<School>,
}
