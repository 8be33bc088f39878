//! Plant repository for the `plants` collection.

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use mongodb::{Collection, Database};

use plantnet_core::QuantityChange;

use super::{InsertOutcome, PLANTS, RepositoryError, UpdateOutcome};
use crate::models::NewPlant;
use crate::models::plant::quantity_update;

/// Repository for plant listings.
///
/// Listings are read back as raw documents so they are served exactly as
/// stored.
pub struct PlantRepository<'a> {
    db: &'a Database,
}

impl<'a> PlantRepository<'a> {
    /// Create a new plant repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn documents(&self) -> Collection<Document> {
        self.db.collection(PLANTS)
    }

    /// Insert a new listing as given.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, plant: Document) -> Result<InsertOutcome, RepositoryError> {
        let result = self.documents().insert_one(plant).await?;
        Ok(result.into())
    }

    /// List every plant, unfiltered and unpaginated.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Document>, RepositoryError> {
        let plants = self.documents().find(doc! {}).await?.try_collect().await?;
        Ok(plants)
    }

    /// Get a plant by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ObjectId) -> Result<Option<Document>, RepositoryError> {
        let plant = self.documents().find_one(doc! { "_id": id }).await?;
        Ok(plant)
    }

    /// Apply a stock change as a single `$inc`.
    ///
    /// No lower bound is enforced; concurrent adjustments are not
    /// coordinated beyond the atomicity of the increment itself.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn adjust_quantity(
        &self,
        id: ObjectId,
        change: QuantityChange,
    ) -> Result<UpdateOutcome, RepositoryError> {
        let result = self
            .documents()
            .update_one(doc! { "_id": id }, quantity_update(change))
            .await?;
        Ok(result.into())
    }

    /// Insert several validated listings at once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_many(&self, plants: &[NewPlant]) -> Result<usize, RepositoryError> {
        if plants.is_empty() {
            return Ok(0);
        }
        let result = self
            .db
            .collection::<NewPlant>(PLANTS)
            .insert_many(plants)
            .await?;
        Ok(result.inserted_ids.len())
    }
}
