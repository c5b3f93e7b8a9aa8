use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tailor_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub is_approved: bool,
    #[sea_orm(unique)]
    pub id_number: String,
    pub nationality: Option<String>,
    pub physical_address: Option<String>,
    pub town: Option<String>,
    pub province: Option<String>,
    pub payment_details: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub email_verification_code: Option<String>,
    pub is_email_verified: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::tailor_schools::Entity")]
    TailorSchools,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::tailor_schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TailorSchools.def()
    }
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        super::tailor_schools::Relation::Schools.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tailor_schools::Relation::TailorProfiles.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
