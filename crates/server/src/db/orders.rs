//! Order repository for the `Orders` collection.

use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use mongodb::{Collection, Database};

use plantnet_core::{Email, OrderStatus};

use super::{DeleteOutcome, InsertOutcome, ORDERS, RepositoryError};
use crate::models::order::{cancellable_filter, customer_orders_pipeline};
use crate::models::{NewOrder, Order};

/// Result of an attempt to cancel an order.
#[derive(Debug, Clone, PartialEq)]
pub enum Cancellation {
    /// The order was removed.
    Deleted(DeleteOutcome),
    /// The order exists but its status forbids cancellation.
    Refused(OrderStatus),
    /// No order has this id.
    Missing,
}

/// Repository for customer orders.
pub struct OrderRepository<'a> {
    db: &'a Database,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    fn orders(&self) -> Collection<Order> {
        self.db.collection(ORDERS)
    }

    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, order: &NewOrder) -> Result<InsertOutcome, RepositoryError> {
        let result = self
            .db
            .collection::<NewOrder>(ORDERS)
            .insert_one(order)
            .await?;
        Ok(result.into())
    }

    /// List a customer's orders annotated with plant name, image, and category.
    ///
    /// Orders whose `plantId` does not reference an existing plant are
    /// dropped by the join. A `plantId` that is not an object id fails the
    /// whole aggregation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the aggregation fails.
    pub async fn list_for_customer(&self, email: &Email) -> Result<Vec<Document>, RepositoryError> {
        let orders = self
            .db
            .collection::<Document>(ORDERS)
            .aggregate(customer_orders_pipeline(email))
            .await?
            .try_collect()
            .await?;
        Ok(orders)
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ObjectId) -> Result<Option<Order>, RepositoryError> {
        let order = self.orders().find_one(doc! { "_id": id }).await?;
        Ok(order)
    }

    /// Delete an order unless it has been delivered.
    ///
    /// The status check is part of the delete filter. When nothing is
    /// deleted the order is read back to tell a refusal from a missing id.
    /// If the read-back finds a cancellable status the order changed in
    /// between, and the plain delete result is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any operation fails.
    pub async fn cancel(&self, id: ObjectId) -> Result<Cancellation, RepositoryError> {
        let result = self.orders().delete_one(cancellable_filter(id)).await?;
        if result.deleted_count > 0 {
            return Ok(Cancellation::Deleted(result.into()));
        }

        let stored = self.get(id).await?;
        if let Some(status) = refusal(stored.as_ref()) {
            return Ok(Cancellation::Refused(status));
        }
        if stored.is_none() {
            return Ok(Cancellation::Missing);
        }

        tracing::debug!(%id, "Order status changed during cancellation");
        let result = self.orders().delete_one(cancellable_filter(id)).await?;
        Ok(Cancellation::Deleted(result.into()))
    }
}

/// Status that blocks cancelling `order`, if any.
fn refusal(order: Option<&Order>) -> Option<OrderStatus> {
    order
        .filter(|order| !order.status.is_cancellable())
        .map(|order| order.status.clone())
}
