use crate::{
    audit::{AuditSink, CertificateAuditAction, CertificateAuditRecord, LogAuditSink},
    graph::Graph,
    model::{CertificateSummary, UserCertificateSummary},
    telemetry::{LogTelemetry, TelemetrySink},
    validator::{BasicCertificateValidator, CertificateValidator, ValidationError},
};
use actix_web::{body::BoxBody, HttpResponse, ResponseError};
use anyhow::anyhow;
use bytes::Bytes;
use sea_orm::DbErr;
use signary_common::{
    error::ErrorInformation,
    fingerprint::{Fingerprint, FingerprintError},
    hashing::Digests,
};
use signary_module_storage::service::{dispatch::DispatchBackend, StorageBackend, StoreError};
use std::{str::FromStr, sync::Arc};
use tracing::instrument;

/// Storage container holding the uploaded certificate files.
pub const CONTAINER: &str = "user-certificates";

/// Blob path of a certificate within [`CONTAINER`].
pub fn blob_path(fingerprint: &Fingerprint) -> String {
    format!("SHA-256/{fingerprint}.cer")
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("certificate file is empty")]
    EmptyUpload,
    #[error(transparent)]
    InvalidFingerprint(#[from] FingerprintError),
    #[error("certificate does not exist")]
    CertificateNotFound,
    #[error("user does not exist: {0}")]
    UserNotFound(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Storage(#[source] anyhow::Error),
    #[error("audit error: {0}")]
    Audit(#[source] anyhow::Error),
    #[error(transparent)]
    Graph(#[from] crate::graph::error::Error),
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::EmptyUpload => HttpResponse::BadRequest().json(ErrorInformation {
                error: "EmptyUpload".into(),
                message: self.to_string(),
                details: None,
            }),
            Self::InvalidFingerprint(err) => HttpResponse::BadRequest().json(ErrorInformation {
                error: "InvalidFingerprint".into(),
                message: err.to_string(),
                details: None,
            }),
            Self::Validation(err) => HttpResponse::BadRequest().json(ErrorInformation {
                error: "InvalidCertificate".into(),
                message: err.to_string(),
                details: None,
            }),
            Self::CertificateNotFound | Self::UserNotFound(_) => {
                HttpResponse::NotFound().json(ErrorInformation {
                    error: "NotFound".into(),
                    message: self.to_string(),
                    details: None,
                })
            }
            Self::Storage(err) => HttpResponse::InternalServerError().json(ErrorInformation {
                error: "Storage".into(),
                message: err.to_string(),
                details: None,
            }),
            Self::Audit(err) => HttpResponse::InternalServerError().json(ErrorInformation {
                error: "Audit".into(),
                message: err.to_string(),
                details: None,
            }),
            Self::Graph(err) => HttpResponse::InternalServerError().json(ErrorInformation {
                error: "Graph".into(),
                message: err.to_string(),
                details: None,
            }),
            Self::Db(err) => HttpResponse::InternalServerError().json(ErrorInformation {
                error: "Database".into(),
                message: err.to_string(),
                details: None,
            }),
        }
    }
}

#[derive(Clone)]
pub struct CertificateService {
    graph: Graph,
    storage: DispatchBackend,
    validator: Arc<dyn CertificateValidator>,
    audit: Arc<dyn AuditSink>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl CertificateService {
    pub fn new(graph: Graph, storage: impl Into<DispatchBackend>) -> Self {
        Self {
            graph,
            storage: storage.into(),
            validator: Arc::new(BasicCertificateValidator::default()),
            audit: Arc::new(LogAuditSink),
            telemetry: Arc::new(LogTelemetry),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn CertificateValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn storage(&self) -> &DispatchBackend {
        &self.storage
    }

    /// Store a certificate, get-or-create style.
    ///
    /// The certificate is identified by the SHA-256 digest of its content.
    /// Uploading known content returns the existing certificate and leaves
    /// no trace in storage, audit or telemetry.
    #[instrument(skip(self, data), err)]
    pub async fn add_certificate(&self, data: Bytes) -> Result<CertificateSummary, Error> {
        if data.is_empty() {
            return Err(Error::EmptyUpload);
        }

        self.validator.validate(&data)?;

        let digests = Digests::digest(&data);
        let fingerprint = Fingerprint::sha256(&digests.sha256);

        let tx = self.graph.transaction().await?;

        if let Some(found) = self
            .graph
            .get_certificate_by_fingerprint(&fingerprint, &tx)
            .await?
        {
            return Ok(found.certificate.into());
        }

        self.store_blob(&fingerprint, data).await?;

        let certificate = self.graph.ingest_certificate(&digests, &tx).await?.certificate;

        tx.commit().await?;

        self.audit
            .save(CertificateAuditRecord::new(
                CertificateAuditAction::Add,
                fingerprint.clone(),
            ))
            .await
            .map_err(Error::Audit)?;
        self.telemetry.certificate_added(&fingerprint);

        Ok(certificate.into())
    }

    /// Activate a certificate for a user account.
    ///
    /// Activating an already active certificate is a no-op without audit or
    /// telemetry.
    #[instrument(skip(self), err)]
    pub async fn activate_certificate(
        &self,
        fingerprint: &str,
        username: &str,
    ) -> Result<(), Error> {
        let fingerprint = Fingerprint::from_str(fingerprint)?;

        let tx = self.graph.transaction().await?;

        let user = self
            .graph
            .get_user_by_name(username, &tx)
            .await?
            .ok_or_else(|| Error::UserNotFound(username.into()))?;

        let certificate = self
            .graph
            .get_certificate_by_fingerprint(&fingerprint, &tx)
            .await?
            .ok_or(Error::CertificateNotFound)?;

        if certificate.ensure_active(user.user.id, &tx).await? {
            tx.commit().await?;

            self.audit
                .save(CertificateAuditRecord::new(
                    CertificateAuditAction::Activate,
                    fingerprint.clone(),
                ))
                .await
                .map_err(Error::Audit)?;
            self.telemetry.certificate_activated(&fingerprint);
        }

        Ok(())
    }

    /// Deactivate a certificate for a user account.
    ///
    /// Only an active association is flipped. Anything else, including a
    /// certificate the user never activated, is a no-op without audit or
    /// telemetry.
    #[instrument(skip(self), err)]
    pub async fn deactivate_certificate(
        &self,
        fingerprint: &str,
        username: &str,
    ) -> Result<(), Error> {
        let fingerprint = Fingerprint::from_str(fingerprint)?;

        let tx = self.graph.transaction().await?;

        let user = self
            .graph
            .get_user_by_name(username, &tx)
            .await?
            .ok_or_else(|| Error::UserNotFound(username.into()))?;

        let certificate = self
            .graph
            .get_certificate_by_fingerprint(&fingerprint, &tx)
            .await?
            .ok_or(Error::CertificateNotFound)?;

        if certificate.ensure_inactive(user.user.id, &tx).await? {
            tx.commit().await?;

            self.audit
                .save(CertificateAuditRecord::new(
                    CertificateAuditAction::Deactivate,
                    fingerprint.clone(),
                ))
                .await
                .map_err(Error::Audit)?;
            self.telemetry.certificate_deactivated(&fingerprint);
        }

        Ok(())
    }

    /// All certificates linked to a user account, active or not.
    #[instrument(skip(self), err)]
    pub async fn get_certificates(
        &self,
        username: &str,
    ) -> Result<Vec<UserCertificateSummary>, Error> {
        let user = self
            .graph
            .get_user_by_name(username, ())
            .await?
            .ok_or_else(|| Error::UserNotFound(username.into()))?;

        Ok(user
            .certificates(())
            .await?
            .into_iter()
            .map(|(association, certificate)| {
                UserCertificateSummary::new(certificate, association.active)
            })
            .collect())
    }

    /// Certificates currently active for a user account.
    #[instrument(skip(self), err)]
    pub async fn get_active_certificates(
        &self,
        username: &str,
    ) -> Result<Vec<CertificateSummary>, Error> {
        let user = self
            .graph
            .get_user_by_name(username, ())
            .await?
            .ok_or_else(|| Error::UserNotFound(username.into()))?;

        Ok(user
            .active_certificates(())
            .await?
            .into_iter()
            .map(CertificateSummary::from)
            .collect())
    }

    /// Upload the certificate blob, tolerating content which is already
    /// there.
    ///
    /// A destination conflict is swallowed only after the blob was confirmed
    /// to be present, a failed earlier upload may have left the destination
    /// claimed but empty.
    async fn store_blob(&self, fingerprint: &Fingerprint, data: Bytes) -> Result<(), Error> {
        let path = blob_path(fingerprint);

        match self.storage.store(CONTAINER, &path, data, false).await {
            Ok(()) => Ok(()),
            Err(StoreError::AlreadyExists(location)) => {
                if self
                    .storage
                    .exists(CONTAINER, &path)
                    .await
                    .map_err(Error::Storage)?
                {
                    log::debug!("certificate blob already present: {location}");
                    Ok(())
                } else {
                    Err(Error::Storage(anyhow!(
                        "destination already exists: {location}"
                    )))
                }
            }
            Err(StoreError::Backend(err)) => Err(Error::Storage(err)),
        }
    }
}
