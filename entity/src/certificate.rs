use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "certificate")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// SHA-256 over the raw certificate bytes, lowercase hex. Globally unique.
    pub fingerprint: String,
    /// SHA-1 over the raw certificate bytes, lowercase hex.
    pub legacy_fingerprint: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_certificate::Entity")]
    UserCertificates,
}

impl Related<super::user_certificate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCertificates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
