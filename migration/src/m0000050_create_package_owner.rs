use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PackageOwner::Table)
                    .col(
                        ColumnDef::new(PackageOwner::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PackageOwner::PackageRegistrationId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PackageOwner::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_owner_registration")
                            .from(PackageOwner::Table, PackageOwner::PackageRegistrationId)
                            .to(PackageRegistration::Table, PackageRegistration::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_owner_user")
                            .from(PackageOwner::Table, PackageOwner::UserId)
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PackageOwner::Table)
                    .name("package_owner_pair")
                    .unique()
                    .col(PackageOwner::PackageRegistrationId)
                    .col(PackageOwner::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PackageOwner::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PackageOwner {
    Table,
    Id,
    PackageRegistrationId,
    UserId,
}

#[derive(DeriveIden)]
enum PackageRegistration {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}
