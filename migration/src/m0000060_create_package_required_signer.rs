use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PackageRequiredSigner::Table)
                    .col(
                        ColumnDef::new(PackageRequiredSigner::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PackageRequiredSigner::PackageRegistrationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PackageRequiredSigner::UserId)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_required_signer_registration")
                            .from(
                                PackageRequiredSigner::Table,
                                PackageRequiredSigner::PackageRegistrationId,
                            )
                            .to(PackageRegistration::Table, PackageRegistration::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_required_signer_user")
                            .from(
                                PackageRequiredSigner::Table,
                                PackageRequiredSigner::UserId,
                            )
                            .to(User::Table, User::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(PackageRequiredSigner::Table)
                    .name("package_required_signer_pair")
                    .unique()
                    .col(PackageRequiredSigner::PackageRegistrationId)
                    .col(PackageRequiredSigner::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PackageRequiredSigner::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PackageRequiredSigner {
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
