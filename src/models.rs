use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    cart_items, delivery_partner_profiles, order_lines, orders, payments, products, schools,
    shipments, tailor_profiles, users,
};

pub use crate::entity::enums::{
    GarmentType, OrderStatus, PaymentStatus, ShipmentStatus, StudentGender,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub town: Option<String>,
    pub province: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub school_id: Uuid,
    pub school_name: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Unit price in minor units.
    pub price: i64,
    pub garment_type: Option<GarmentType>,
    pub garment_type_display: Option<String>,
    pub available_sizes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-student details carried on cart items, order lines and orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StudentInfo {
    pub student_name: Option<String>,
    pub student_age: Option<i32>,
    pub student_grade: Option<String>,
    pub student_gender: Option<StudentGender>,
    /// Height in centimetres.
    pub student_height: Option<f64>,
}

pub const MAX_STUDENT_GRADE_LEN: usize = 50;
pub const MAX_STUDENT_NAME_LEN: usize = 200;
pub const MAX_STUDENT_AGE: i32 = 120;
pub const MAX_STUDENT_HEIGHT_CM: f64 = 300.0;

impl StudentInfo {
    /// Check the fields against the column limits before they reach the database.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.student_name {
            if name.chars().count() > MAX_STUDENT_NAME_LEN {
                return Err(format!(
                    "student_name must be at most {MAX_STUDENT_NAME_LEN} characters"
                ));
            }
        }
        if let Some(age) = self.student_age {
            if !(0..=MAX_STUDENT_AGE).contains(&age) {
                return Err(format!("student_age must be between 0 and {MAX_STUDENT_AGE}"));
            }
        }
        if let Some(grade) = &self.student_grade {
            if grade.chars().count() > MAX_STUDENT_GRADE_LEN {
                return Err(format!(
                    "student_grade must be at most {MAX_STUDENT_GRADE_LEN} characters"
                ));
            }
        }
        if let Some(height) = self.student_height {
            if !height.is_finite() || !(0.0..=MAX_STUDENT_HEIGHT_CM).contains(&height) {
                return Err(format!(
                    "student_height must be between 0 and {MAX_STUDENT_HEIGHT_CM} cm"
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    #[schema(value_type = Object)]
    pub measurements: Value,
    #[serde(flatten)]
    pub student: StudentInfo,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub order_code: String,
    pub school_id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    #[serde(flatten)]
    pub student: StudentInfo,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub tailor_id: Option<Uuid>,
    pub delivery_partner_id: Option<Uuid>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    #[schema(value_type = Object)]
    pub measurements: Value,
    #[serde(flatten)]
    pub student: StudentInfo,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TailorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_approved: bool,
    pub is_email_verified: bool,
    pub id_number: String,
    pub nationality: Option<String>,
    pub physical_address: Option<String>,
    pub town: Option<String>,
    pub province: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub school_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryPartnerProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub is_approved: bool,
    pub is_email_verified: bool,
    pub id_number: String,
    pub nationality: Option<String>,
    pub physical_address: Option<String>,
    pub town: Option<String>,
    pub province: Option<String>,
    pub phone: Option<String>,
    pub vehicle_type: Option<String>,
    pub license_plate: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Shipment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub delivery_partner_id: Option<Uuid>,
    pub status: ShipmentStatus,
    pub tracking_code: Option<String>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub amount: i64,
    pub method: String,
    pub transaction_id: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<schools::Model> for School {
    fn from(model: schools::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            town: model.town,
            province: model.province,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl Product {
    pub fn from_entity(model: products::Model, school_name: Option<String>) -> Self {
        let available_sizes = model
            .available_sizes
            .and_then(|sizes| serde_json::from_value::<Vec<String>>(sizes).ok())
            .unwrap_or_default();
        Self {
            id: model.id,
            school_id: model.school_id,
            school_name,
            name: model.name,
            description: model.description,
            image_url: model.image_url,
            price: model.price,
            garment_type: model.garment_type,
            garment_type_display: model.garment_type.map(|g| g.display_name().to_string()),
            available_sizes,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<cart_items::Model> for CartItem {
    fn from(model: cart_items::Model) -> Self {
        Self {
            id: model.id,
            cart_id: model.cart_id,
            product_id: model.product_id,
            quantity: model.quantity,
            measurements: model.measurements,
            student: StudentInfo {
                student_name: model.student_name,
                student_age: model.student_age,
                student_grade: model.student_grade,
                student_gender: model.student_gender,
                student_height: model.student_height,
            },
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Self {
            id: model.id,
            order_code: model.order_code,
            school_id: model.school_id,
            user_id: model.user_id,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            customer_email: model.customer_email,
            student: StudentInfo {
                student_name: model.student_name,
                student_age: model.student_age,
                student_grade: model.student_grade,
                student_gender: model.student_gender,
                student_height: model.student_height,
            },
            total_amount: model.total_amount,
            status: model.status,
            tailor_id: model.tailor_id,
            delivery_partner_id: model.delivery_partner_id,
            assigned_at: model.assigned_at.map(|dt| dt.with_timezone(&Utc)),
            deadline: model.deadline.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<order_lines::Model> for OrderLine {
    fn from(model: order_lines::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
            price: model.price,
            measurements: model.measurements,
            student: StudentInfo {
                student_name: model.student_name,
                student_age: model.student_age,
                student_grade: model.student_grade,
                student_gender: model.student_gender,
                student_height: model.student_height,
            },
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl TailorProfile {
    pub fn from_entity(model: tailor_profiles::Model, school_ids: Vec<Uuid>) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            is_approved: model.is_approved,
            is_email_verified: model.is_email_verified,
            id_number: model.id_number,
            nationality: model.nationality,
            physical_address: model.physical_address,
            town: model.town,
            province: model.province,
            phone: model.phone,
            business_name: model.business_name,
            school_ids,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<delivery_partner_profiles::Model> for DeliveryPartnerProfile {
    fn from(model: delivery_partner_profiles::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            is_approved: model.is_approved,
            is_email_verified: model.is_email_verified,
            id_number: model.id_number,
            nationality: model.nationality,
            physical_address: model.physical_address,
            town: model.town,
            province: model.province,
            phone: model.phone,
            vehicle_type: model.vehicle_type,
            license_plate: model.license_plate,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<shipments::Model> for Shipment {
    fn from(model: shipments::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            delivery_partner_id: model.delivery_partner_id,
            status: model.status,
            tracking_code: model.tracking_code,
            picked_up_at: model.picked_up_at.map(|dt| dt.with_timezone(&Utc)),
            delivered_at: model.delivered_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<payments::Model> for Payment {
    fn from(model: payments::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            amount: model.amount,
            method: model.method,
            transaction_id: model.transaction_id,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_info_within_limits_passes() {
        let student = StudentInfo {
            student_name: Some("Thandi".into()),
            student_age: Some(9),
            student_grade: Some("Grade 4".into()),
            student_gender: Some(StudentGender::Female),
            student_height: Some(132.5),
        };
        assert!(student.validate().is_ok());
        assert!(StudentInfo::default().validate().is_ok());
    }

    #[test]
    fn negative_age_is_rejected() {
        let student = StudentInfo {
            student_age: Some(-3),
            ..StudentInfo::default()
        };
        let err = student.validate().unwrap_err();
        assert!(err.contains("student_age"));
    }

    #[test]
    fn overlong_grade_is_rejected() {
        let student = StudentInfo {
            student_grade: Some("g".repeat(MAX_STUDENT_GRADE_LEN + 1)),
            ..StudentInfo::default()
        };
        assert!(student.validate().unwrap_err().contains("student_grade"));

        let at_limit = StudentInfo {
            student_grade: Some("g".repeat(MAX_STUDENT_GRADE_LEN)),
            ..StudentInfo::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn impossible_height_is_rejected() {
        for height in [-1.0, MAX_STUDENT_HEIGHT_CM + 1.0, f64::INFINITY] {
            let student = StudentInfo {
                student_height: Some(height),
                ..StudentInfo::default()
            };
            assert!(student.validate().is_err(), "height {height} accepted");
        }
    }
}
