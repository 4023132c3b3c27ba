//! Query operations for SeaOrmStorage
//!
//! Read-only lookups used by link creation. Values are always bound
//! through the query builder.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::trace;

use super::SeaOrmStorage;
use super::converters::model_to_record;
use crate::errors::Result;
use crate::storage::LinkRecord;

use migration::entities::link;

impl SeaOrmStorage {
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<LinkRecord>> {
        let model = link::Entity::find()
            .filter(link::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;

        trace!("get_by_slug({}) -> found={}", slug, model.is_some());
        Ok(model.map(model_to_record))
    }

    pub async fn get_first_by_url(&self, url: &str) -> Result<Option<LinkRecord>> {
        let model = link::Entity::find()
            .filter(link::Column::Url.eq(url))
            .order_by_asc(link::Column::Id)
            .one(&self.db)
            .await?;

        trace!("get_first_by_url -> found={}", model.is_some());
        Ok(model.map(model_to_record))
    }
}
