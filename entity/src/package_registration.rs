use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "package_registration")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::package_owner::Entity")]
    Owners,

    #[sea_orm(has_many = "super::package_required_signer::Entity")]
    RequiredSigners,
}

impl Related<super::package_owner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owners.def()
    }
}

impl Related<super::package_required_signer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequiredSigners.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
