use sea_orm::entity::prelude::*;

/// Schools a tailor has registered to serve.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tailor_schools")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tailor_profile_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub school_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tailor_profiles::Entity",
        from = "Column::TailorProfileId",
        to = "super::tailor_profiles::Column::Id"
    )]
    TailorProfiles,
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    Schools,
}

impl Related<super::tailor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TailorProfiles.def()
    }
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schools.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
