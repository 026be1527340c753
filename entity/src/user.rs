use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_certificate::Entity")]
    UserCertificates,

    #[sea_orm(has_many = "super::package_owner::Entity")]
    PackageOwners,
}

impl Related<super::user_certificate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCertificates.def()
    }
}

impl Related<super::package_owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackageOwners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
