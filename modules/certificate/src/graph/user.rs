use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use signary_common::db::Transactional;
use signary_entity::{certificate, user, user_certificate};
use std::fmt::Debug;
use tracing::instrument;

use crate::graph::{error::Error, Graph};

pub struct UserContext<'g> {
    graph: &'g Graph,
    pub user: user::Model,
}

impl<'g> UserContext<'g> {
    pub fn new(graph: &'g Graph, user: user::Model) -> Self {
        Self { graph, user }
    }

    /// All certificates linked to this user, in activation order, together
    /// with their association row.
    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn certificates<TX: AsRef<Transactional>>(
        &self,
        tx: TX,
    ) -> Result<Vec<(user_certificate::Model, certificate::Model)>, Error> {
        Ok(user_certificate::Entity::find()
            .filter(user_certificate::Column::UserId.eq(self.user.id))
            .order_by_asc(user_certificate::Column::Id)
            .find_also_related(certificate::Entity)
            .all(&self.graph.connection(&tx))
            .await?
            .into_iter()
            .filter_map(|(association, certificate)| {
                certificate.map(|certificate| (association, certificate))
            })
            .collect())
    }

    /// Certificates currently active for this user.
    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn active_certificates<TX: AsRef<Transactional>>(
        &self,
        tx: TX,
    ) -> Result<Vec<certificate::Model>, Error> {
        Ok(self
            .certificates(&tx)
            .await?
            .into_iter()
            .filter_map(|(association, certificate)| {
                association.active.then_some(certificate)
            })
            .collect())
    }
}

impl Graph {
    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn get_user_by_name<TX: AsRef<Transactional>>(
        &self,
        username: impl Into<String> + Debug,
        tx: TX,
    ) -> Result<Option<UserContext>, Error> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username.into()))
            .one(&self.connection(&tx))
            .await?
            .map(|user| UserContext::new(self, user)))
    }

    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn get_user_by_id<TX: AsRef<Transactional>>(
        &self,
        id: i32,
        tx: TX,
    ) -> Result<Option<UserContext>, Error> {
        Ok(user::Entity::find_by_id(id)
            .one(&self.connection(&tx))
            .await?
            .map(|user| UserContext::new(self, user)))
    }

    #[instrument(skip(self, tx), err(level=tracing::Level::INFO))]
    pub async fn ingest_user<TX: AsRef<Transactional>>(
        &self,
        username: impl Into<String> + Debug,
        tx: TX,
    ) -> Result<UserContext, Error> {
        let username = username.into();

        if let Some(found) = self.get_user_by_name(&username, &tx).await? {
            Ok(found)
        } else {
            let entity = user::ActiveModel {
                id: Default::default(),
                username: Set(username),
            };

            Ok(UserContext::new(
                self,
                entity.insert(&self.connection(&tx)).await?,
            ))
        }
    }
}
