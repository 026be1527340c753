#![allow(clippy::expect_used)]

use bytes::Bytes;
use parking_lot::Mutex;
use sea_orm::{prelude::async_trait, ActiveModelTrait, Set};
use signary_common as common;
use signary_common::fingerprint::Fingerprint;
use signary_entity::{package_owner, package_registration, package_required_signer, user};
use signary_module_certificate::{
    audit::{AuditSink, CertificateAuditRecord},
    graph::Graph,
    service::CertificateService,
    telemetry::TelemetrySink,
};
use signary_module_storage::service::fs::FileSystemBackend;
use std::{env, sync::Arc};
use tempfile::{tempdir, TempDir};
use test_context::AsyncTestContext;
use tracing::instrument;

/// Audit sink capturing records for assertions.
#[derive(Clone, Default)]
pub struct RecordingAuditSink(Arc<Mutex<Vec<CertificateAuditRecord>>>);

impl RecordingAuditSink {
    pub fn records(&self) -> Vec<CertificateAuditRecord> {
        self.0.lock().clone()
    }
}

#[async_trait::async_trait]
impl AuditSink for RecordingAuditSink {
    async fn save(&self, record: CertificateAuditRecord) -> anyhow::Result<()> {
        self.0.lock().push(record);
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelemetryEvent {
    Added(Fingerprint),
    Activated(Fingerprint),
    Deactivated(Fingerprint),
}

/// Telemetry sink capturing events for assertions.
#[derive(Clone, Default)]
pub struct RecordingTelemetry(Arc<Mutex<Vec<TelemetryEvent>>>);

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.0.lock().clone()
    }
}

impl TelemetrySink for RecordingTelemetry {
    fn certificate_added(&self, fingerprint: &Fingerprint) {
        self.0.lock().push(TelemetryEvent::Added(fingerprint.clone()));
    }

    fn certificate_activated(&self, fingerprint: &Fingerprint) {
        self.0
            .lock()
            .push(TelemetryEvent::Activated(fingerprint.clone()));
    }

    fn certificate_deactivated(&self, fingerprint: &Fingerprint) {
        self.0
            .lock()
            .push(TelemetryEvent::Deactivated(fingerprint.clone()));
    }
}

pub struct SignaryContext {
    pub db: common::db::Database,
    pub graph: Graph,
    pub storage: FileSystemBackend,
    /// Base directory backing `storage`, for tests poking at the filesystem.
    pub storage_dir: TempDir,
    pub certificates: CertificateService,
    pub audit: RecordingAuditSink,
    pub telemetry: RecordingTelemetry,
    _db_dir: Option<TempDir>,
}

impl SignaryContext {
    async fn new(db: common::db::Database, db_dir: impl Into<Option<TempDir>>) -> Self {
        let (storage, storage_dir) = FileSystemBackend::for_test()
            .await
            .expect("initializing the storage backend");
        let graph = Graph::new(db.clone());
        let audit = RecordingAuditSink::default();
        let telemetry = RecordingTelemetry::default();
        let certificates = CertificateService::new(graph.clone(), storage.clone())
            .with_audit(Arc::new(audit.clone()))
            .with_telemetry(Arc::new(telemetry.clone()));

        Self {
            db,
            graph,
            storage,
            storage_dir,
            certificates,
            audit,
            telemetry,
            _db_dir: db_dir.into(),
        }
    }

    /// Create or fetch a user.
    pub async fn ingest_user(&self, username: &str) -> Result<user::Model, anyhow::Error> {
        Ok(self.graph.ingest_user(username, ()).await?.user)
    }

    /// Seed a package registration with owners, in the given order.
    pub async fn seed_package<'a>(
        &self,
        name: &str,
        owners: impl IntoIterator<Item = &'a str>,
    ) -> Result<package_registration::Model, anyhow::Error> {
        let registration = package_registration::ActiveModel {
            id: Default::default(),
            name: Set(name.to_string()),
        }
        .insert(&self.db)
        .await?;

        for owner in owners {
            let user = self.ingest_user(owner).await?;
            package_owner::ActiveModel {
                id: Default::default(),
                package_registration_id: Set(registration.id),
                user_id: Set(user.id),
            }
            .insert(&self.db)
            .await?;
        }

        Ok(registration)
    }

    /// Designate a required signer for a registration.
    pub async fn seed_required_signer(
        &self,
        registration: &package_registration::Model,
        username: &str,
    ) -> Result<(), anyhow::Error> {
        let user = self.ingest_user(username).await?;

        package_required_signer::ActiveModel {
            id: Default::default(),
            package_registration_id: Set(registration.id),
            user_id: Set(user.id),
        }
        .insert(&self.db)
        .await?;

        Ok(())
    }
}

impl AsyncTestContext for SignaryContext {
    #[instrument]
    async fn setup() -> SignaryContext {
        if env::var("EXTERNAL_TEST_DB").is_ok() {
            log::warn!("Using external database from 'DB_*' env vars");
            let config = common::config::Database::from_env().expect("DB config from env");
            let db = common::db::Database::bootstrap(&config)
                .await
                .expect("bootstrapping the database");

            return SignaryContext::new(db, None).await;
        }

        let dir = tempdir().expect("create a database directory");
        let db = common::db::Database::connect(format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("signary.db").display()
        ))
        .await
        .expect("creating the database");
        db.migrate().await.expect("applying migrations");

        SignaryContext::new(db, dir).await
    }

    async fn teardown(self) {
        if let Err(err) = self.db.close().await {
            log::warn!("failed to close the database: {err}");
        }
    }
}

/// Distinct certificate-looking content for tests.
pub fn certificate_bytes(seed: &str) -> Bytes {
    Bytes::from(format!(
        "-----BEGIN CERTIFICATE-----\n{seed}\n-----END CERTIFICATE-----\n"
    ))
}

#[cfg(test)]
mod test {
    use super::*;
    use test_context::test_context;
    use test_log::test;

    #[test_context(SignaryContext)]
    #[test(tokio::test)]
    async fn fresh_context(ctx: &SignaryContext) -> Result<(), anyhow::Error> {
        let user = ctx.ingest_user("alice").await?;
        assert_eq!(user.username, "alice");

        let certificates = ctx.certificates.get_active_certificates("alice").await?;
        assert!(certificates.is_empty());

        assert!(ctx.audit.records().is_empty());
        assert!(ctx.telemetry.events().is_empty());

        Ok(())
    }

    #[test_context(SignaryContext)]
    #[test(tokio::test)]
    async fn seeded_package(ctx: &SignaryContext) -> Result<(), anyhow::Error> {
        let registration = ctx.seed_package("demo", ["alice", "bob"]).await?;
        ctx.seed_required_signer(&registration, "alice").await?;

        Ok(())
    }
}
