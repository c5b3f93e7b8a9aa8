use sea_orm::entity::prelude::*;

use super::enums::{OrderStatus, StudentGender};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_code: String,
    pub school_id: Uuid,
    pub user_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub student_name: Option<String>,
    pub student_age: Option<i32>,
    pub student_grade: Option<String>,
    pub student_gender: Option<StudentGender>,
    pub student_height: Option<f64>,
    pub total_amount: i64,
    pub status: OrderStatus,
    pub tailor_id: Option<Uuid>,
    pub delivery_partner_id: Option<Uuid>,
    pub assigned_at: Option<DateTimeWithTimeZone>,
    pub deadline: Option<DateTimeWithTimeZone>,
    #[sea_orm(unique)]
    pub confirmation_token: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    Schools,
    #[sea_orm(has_many = "super::order_lines::Entity")]
    OrderLines,
    #[sea_orm(has_one = "super::shipments::Entity")]
    Shipments,
    #[sea_orm(has_one = "super::payments::Entity")]
    Payments,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schools.def()
    }
}

impl Related<super::order_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLines.def()
    }
}

impl Related<super::shipments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipments.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
