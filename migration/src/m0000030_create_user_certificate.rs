use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserCertificate::Table)
                    .col(
                        ColumnDef::new(UserCertificate::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserCertificate::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserCertificate::CertificateId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserCertificate::Active)
                            .boolean()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_certificate_user")
                            .from(UserCertificate::Table, UserCertificate::UserId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_certificate_certificate")
                            .from(UserCertificate::Table, UserCertificate::CertificateId)
                            .to(Certificate::Table, Certificate::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(UserCertificate::Table)
                    .name("user_certificate_pair")
                    .unique()
                    .col(UserCertificate::UserId)
                    .col(UserCertificate::CertificateId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCertificate::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserCertificate {
    Table,
    Id,
    UserId,
    CertificateId,
    Active,
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Certificate {
    Table,
    Id,
}
