use hex::ToHex;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use signary_common::{
    db::{DatabaseErrors, Transactional},
    fingerprint::Fingerprint,
    hashing::Digests,
};
use signary_entity::{certificate, user_certificate};
use tracing::instrument;

use crate::graph::{error::Error, Graph};

pub struct CertificateContext<'g> {
    graph: &'g Graph,
    pub certificate: certificate::Model,
}

impl<'g> CertificateContext<'g> {
    pub fn new(graph: &'g Graph, certificate: certificate::Model) -> Self {
        Self { graph, certificate }
    }

    /// The association row linking this certificate to the given user, if any.
    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn user_certificate<TX: AsRef<Transactional>>(
        &self,
        user_id: i32,
        tx: TX,
    ) -> Result<Option<user_certificate::Model>, Error> {
        Ok(user_certificate::Entity::find()
            .filter(user_certificate::Column::UserId.eq(user_id))
            .filter(user_certificate::Column::CertificateId.eq(self.certificate.id))
            .one(&self.graph.connection(&tx))
            .await?)
    }

    /// Turn the certificate active for the given user.
    ///
    /// Creates the association row on first activation, flips it back on
    /// re-activation. Returns `true` if anything changed, `false` if the
    /// certificate was already active.
    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn ensure_active<TX: AsRef<Transactional>>(
        &self,
        user_id: i32,
        tx: TX,
    ) -> Result<bool, Error> {
        match self.user_certificate(user_id, &tx).await? {
            None => {
                let entity = user_certificate::ActiveModel {
                    id: Default::default(),
                    user_id: Set(user_id),
                    certificate_id: Set(self.certificate.id),
                    active: Set(true),
                };
                entity.insert(&self.graph.connection(&tx)).await?;
                Ok(true)
            }
            Some(found) if !found.active => {
                let mut entity = user_certificate::ActiveModel::from(found);
                entity.active = Set(true);
                entity.update(&self.graph.connection(&tx)).await?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    /// Turn the certificate inactive for the given user.
    ///
    /// Returns `true` if an active association was flipped. A user which
    /// never activated the certificate keeps no association row.
    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn ensure_inactive<TX: AsRef<Transactional>>(
        &self,
        user_id: i32,
        tx: TX,
    ) -> Result<bool, Error> {
        match self.user_certificate(user_id, &tx).await? {
            Some(found) if found.active => {
                let mut entity = user_certificate::ActiveModel::from(found);
                entity.active = Set(false);
                entity.update(&self.graph.connection(&tx)).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl Graph {
    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn get_certificate_by_fingerprint<TX: AsRef<Transactional>>(
        &self,
        fingerprint: &Fingerprint,
        tx: TX,
    ) -> Result<Option<CertificateContext>, Error> {
        Ok(certificate::Entity::find()
            .filter(certificate::Column::Fingerprint.eq(fingerprint.as_str()))
            .one(&self.connection(&tx))
            .await?
            .map(|certificate| CertificateContext::new(self, certificate)))
    }

    /// Get-or-create a certificate row, keyed by the primary fingerprint.
    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn ingest_certificate<TX: AsRef<Transactional>>(
        &self,
        digests: &Digests,
        tx: TX,
    ) -> Result<CertificateContext, Error> {
        let fingerprint = Fingerprint::sha256(&digests.sha256);

        if let Some(found) = self
            .get_certificate_by_fingerprint(&fingerprint, &tx)
            .await?
        {
            return Ok(found);
        }

        let entity = certificate::ActiveModel {
            id: Default::default(),
            fingerprint: Set(fingerprint.to_string()),
            legacy_fingerprint: Set(digests.sha1.encode_hex()),
        };

        match entity.insert(&self.connection(&tx)).await {
            Ok(model) => Ok(CertificateContext::new(self, model)),
            // lost the insert race, another writer created the row
            Err(err) if err.is_duplicate() => self
                .get_certificate_by_fingerprint(&fingerprint, &tx)
                .await?
                .ok_or(Error::Database(err)),
            Err(err) => Err(err.into()),
        }
    }
}
