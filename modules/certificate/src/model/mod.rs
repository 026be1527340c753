use signary_entity::certificate;

/// A stored certificate.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct CertificateSummary {
    /// The primary fingerprint, SHA-256 over the content, lowercase hex
    pub fingerprint: String,
    /// The SHA-1 thumbprint, carried for legacy clients
    pub legacy_fingerprint: String,
}

impl From<certificate::Model> for CertificateSummary {
    fn from(certificate: certificate::Model) -> Self {
        Self {
            fingerprint: certificate.fingerprint,
            legacy_fingerprint: certificate.legacy_fingerprint,
        }
    }
}

/// A certificate linked to a user account.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, utoipa::ToSchema)]
pub struct UserCertificateSummary {
    /// The primary fingerprint, SHA-256 over the content, lowercase hex
    pub fingerprint: String,
    /// The SHA-1 thumbprint, carried for legacy clients
    pub legacy_fingerprint: String,
    /// Whether the user currently has the certificate activated
    pub active: bool,
}

impl UserCertificateSummary {
    pub fn new(certificate: certificate::Model, active: bool) -> Self {
        Self {
            fingerprint: certificate.fingerprint,
            legacy_fingerprint: certificate.legacy_fingerprint,
            active,
        }
    }
}
