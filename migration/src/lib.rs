pub use sea_orm_migration::prelude::*;

mod m0000010_create_user;
mod m0000020_create_certificate;
mod m0000030_create_user_certificate;
mod m0000040_create_package_registration;
mod m0000050_create_package_owner;
mod m0000060_create_package_required_signer;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0000010_create_user::Migration),
            Box::new(m0000020_create_certificate::Migration),
            Box::new(m0000030_create_user_certificate::Migration),
            Box::new(m0000040_create_package_registration::Migration),
            Box::new(m0000050_create_package_owner::Migration),
            Box::new(m0000060_create_package_required_signer::Migration),
        ]
    }
}
