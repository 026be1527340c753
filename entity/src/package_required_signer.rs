use sea_orm::entity::prelude::*;

/// The designated required signer of a package registration.
///
/// The schema permits several rows per registration, but only the lowest-id
/// row is honored. See `signary-module-signer`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "package_required_signer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub package_registration_id: i32,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::package_registration::Entity",
        from = "Column::PackageRegistrationId",
        to = "super::package_registration::Column::Id"
    )]
    PackageRegistration,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::package_registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PackageRegistration.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
