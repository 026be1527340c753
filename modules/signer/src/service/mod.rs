use crate::{
    model::{RequiredSignerProjection, Signer},
    policy::{NoPolicies, SecurityPolicyService},
};
use actix_web::{body::BoxBody, HttpResponse, ResponseError};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use signary_common::{db::Database, error::ErrorInformation};
use signary_entity::{
    package_owner, package_registration, package_required_signer, user, user_certificate,
};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("package does not exist: {0}")]
    PackageNotFound(String),
    #[error("user does not exist: {0}")]
    UserNotFound(String),
    #[error("user is not an owner: {0}")]
    NotAnOwner(String),
    #[error("user {0} may not change the required signer")]
    Forbidden(String),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            Self::PackageNotFound(_) | Self::UserNotFound(_) => {
                HttpResponse::NotFound().json(ErrorInformation {
                    error: "NotFound".into(),
                    message: self.to_string(),
                    details: None,
                })
            }
            Self::NotAnOwner(_) => HttpResponse::BadRequest().json(ErrorInformation {
                error: "NotAnOwner".into(),
                message: self.to_string(),
                details: None,
            }),
            Self::Forbidden(_) => HttpResponse::Forbidden().json(ErrorInformation {
                error: "Forbidden".into(),
                message: self.to_string(),
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

/// Everything known about a registration's signer configuration.
struct RegistrationState {
    registration: package_registration::Model,
    owners: Vec<Signer>,
    required: Option<Signer>,
    viewer: Signer,
}

impl RegistrationState {
    fn project(&self, policy: &dyn SecurityPolicyService) -> RequiredSignerProjection {
        RequiredSignerProjection::compute(
            &self.owners,
            self.required.as_ref(),
            &self.viewer,
            policy,
        )
    }
}

#[derive(Clone)]
pub struct SignerService {
    db: Database,
    policy: Arc<dyn SecurityPolicyService>,
}

impl SignerService {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            policy: Arc::new(NoPolicies),
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn SecurityPolicyService>) -> Self {
        self.policy = policy;
        self
    }

    /// The required-signer controls of `package`, as seen by `viewer`.
    #[instrument(skip(self), err)]
    pub async fn required_signer_controls(
        &self,
        package: &str,
        viewer: &str,
    ) -> Result<RequiredSignerProjection, Error> {
        let state = self.load(package, viewer, &self.db).await?;

        Ok(state.project(self.policy.as_ref()))
    }

    /// Designate `username` as the required signer of `package`, or clear the
    /// designation with `None`.
    ///
    /// The caller must be allowed to edit according to its own projection.
    /// The designated user must be an owner of the package.
    #[instrument(skip(self), err)]
    pub async fn set_required_signer(
        &self,
        package: &str,
        viewer: &str,
        username: Option<&str>,
    ) -> Result<(), Error> {
        let tx = self.db.begin().await?;

        let state = self.load(package, viewer, &tx).await?;

        if !state.project(self.policy.as_ref()).editable {
            return Err(Error::Forbidden(state.viewer.username));
        }

        let signer = match username {
            Some(username) => Some(
                state
                    .owners
                    .iter()
                    .find(|owner| owner.username == username)
                    .ok_or_else(|| Error::NotAnOwner(username.into()))?,
            ),
            None => None,
        };

        // the schema permits several rows, replace them all
        package_required_signer::Entity::delete_many()
            .filter(
                package_required_signer::Column::PackageRegistrationId.eq(state.registration.id),
            )
            .exec(&tx)
            .await?;

        if let Some(signer) = signer {
            package_required_signer::Entity::insert(package_required_signer::ActiveModel {
                package_registration_id: Set(state.registration.id),
                user_id: Set(signer.id),
                ..Default::default()
            })
            .exec(&tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    async fn load<C: ConnectionTrait>(
        &self,
        package: &str,
        viewer: &str,
        connection: &C,
    ) -> Result<RegistrationState, Error> {
        let registration = package_registration::Entity::find()
            .filter(package_registration::Column::Name.eq(package))
            .one(connection)
            .await?
            .ok_or_else(|| Error::PackageNotFound(package.into()))?;

        let viewer = user::Entity::find()
            .filter(user::Column::Username.eq(viewer))
            .one(connection)
            .await?
            .ok_or_else(|| Error::UserNotFound(viewer.into()))?;
        let viewer = signer(viewer, connection).await?;

        let rows = package_owner::Entity::find()
            .filter(package_owner::Column::PackageRegistrationId.eq(registration.id))
            .order_by_asc(package_owner::Column::Id)
            .find_also_related(user::Entity)
            .all(connection)
            .await?;

        let mut owners = Vec::with_capacity(rows.len());
        for (_, owner) in rows {
            let Some(owner) = owner else {
                continue;
            };
            owners.push(signer(owner, connection).await?);
        }

        // only the lowest-id designation is honored
        let required = match package_required_signer::Entity::find()
            .filter(package_required_signer::Column::PackageRegistrationId.eq(registration.id))
            .order_by_asc(package_required_signer::Column::Id)
            .find_also_related(user::Entity)
            .one(connection)
            .await?
        {
            Some((_, Some(user))) => Some(signer(user, connection).await?),
            _ => None,
        };

        Ok(RegistrationState {
            registration,
            owners,
            required,
            viewer,
        })
    }
}

async fn signer<C: ConnectionTrait>(user: user::Model, connection: &C) -> Result<Signer, Error> {
    let active_certificates = user_certificate::Entity::find()
        .filter(user_certificate::Column::UserId.eq(user.id))
        .filter(user_certificate::Column::Active.eq(true))
        .count(connection)
        .await?;

    Ok(Signer {
        id: user.id,
        username: user.username,
        active_certificates,
    })
}
