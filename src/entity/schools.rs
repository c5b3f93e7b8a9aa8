use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "schools")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub town: Option<String>,
    pub province: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
    #[sea_orm(has_many = "super::tailor_schools::Entity")]
    TailorSchools,
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::tailor_schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TailorSchools.def()
    }
}

impl Related<super::tailor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        super::tailor_schools::Relation::TailorProfiles.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tailor_schools::Relation::Schools.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
