pub mod certificate;
pub mod user;
pub mod user_certificate;

pub mod package_owner;
pub mod package_registration;
pub mod package_required_signer;
