//! Mutation operations for SeaOrmStorage
//!
//! Links are insert-only.

use sea_orm::{EntityTrait, SqlErr};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::record_to_active_model;
use crate::errors::Result;
use crate::storage::{InsertOutcome, LinkRecord};

use migration::entities::link;

impl SeaOrmStorage {
    pub async fn insert_new(&self, record: &LinkRecord) -> Result<InsertOutcome> {
        let active_model = record_to_active_model(record);

        match link::Entity::insert(active_model).exec(&self.db).await {
            Ok(_) => {
                info!("Link inserted: {}", record.slug);
                Ok(InsertOutcome::Inserted)
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                debug!("Slug '{}' hit the unique constraint", record.slug);
                Ok(InsertOutcome::SlugTaken)
            }
            Err(e) => Err(e.into()),
        }
    }
}
