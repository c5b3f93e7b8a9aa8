use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::tailor_profiles::Entity")]
    TailorProfiles,
    #[sea_orm(has_one = "super::delivery_partner_profiles::Entity")]
    DeliveryPartnerProfiles,
    #[sea_orm(has_many = "super::audit_logs::Entity")]
    AuditLogs,
}

impl Related<super::tailor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TailorProfiles.def()
    }
}

impl Related<super::delivery_partner_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeliveryPartnerProfiles.def()
    }
}

impl Related<super::audit_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
