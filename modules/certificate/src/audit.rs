use sea_orm::prelude::async_trait;
use serde::Serialize;
use signary_common::fingerprint::Fingerprint;
use std::fmt;

/// Label of the hash algorithm backing the primary fingerprint.
pub const HASH_ALGORITHM: &str = "SHA-256";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CertificateAuditAction {
    Add,
    Activate,
    Deactivate,
}

impl fmt::Display for CertificateAuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Activate => f.write_str("activate"),
            Self::Deactivate => f.write_str("deactivate"),
        }
    }
}

/// Record of a certificate operation, emitted after the operation took
/// effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CertificateAuditRecord {
    pub action: CertificateAuditAction,
    pub fingerprint: Fingerprint,
    pub hash_algorithm: &'static str,
}

impl CertificateAuditRecord {
    pub fn new(action: CertificateAuditAction, fingerprint: Fingerprint) -> Self {
        Self {
            action,
            fingerprint,
            hash_algorithm: HASH_ALGORITHM,
        }
    }

    /// Path of the audited resource, the lowercase fingerprint.
    pub fn path(&self) -> &str {
        self.fingerprint.as_str()
    }
}

/// Destination for audit records.
///
/// The gallery persists records elsewhere, this crate only ships a
/// log-backed sink.
#[async_trait::async_trait]
pub trait AuditSink: Send + Sync {
    async fn save(&self, record: CertificateAuditRecord) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LogAuditSink;

#[async_trait::async_trait]
impl AuditSink for LogAuditSink {
    async fn save(&self, record: CertificateAuditRecord) -> anyhow::Result<()> {
        log::info!(
            "audit: {} certificate {} ({})",
            record.action,
            record.path(),
            record.hash_algorithm
        );
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    const FINGERPRINT: &str = "ab53695a51124faada4ca40d776f6ca59afdfa37506df9f5e02782545373f727";

    #[test]
    fn record_carries_algorithm_label() {
        let fingerprint = Fingerprint::from_str(FINGERPRINT).unwrap();
        let record = CertificateAuditRecord::new(CertificateAuditAction::Activate, fingerprint);

        assert_eq!(record.action, CertificateAuditAction::Activate);
        assert_eq!(record.fingerprint.as_str(), FINGERPRINT);
        assert_eq!(record.hash_algorithm, "SHA-256");
    }

    /// The path is the lowercase fingerprint, also for uppercase input.
    #[test]
    fn path_is_lowercase() {
        let fingerprint = Fingerprint::from_str(&FINGERPRINT.to_uppercase()).unwrap();
        let record = CertificateAuditRecord::new(CertificateAuditAction::Add, fingerprint);

        assert_eq!(record.path(), FINGERPRINT);
    }
}
