//! Remote data gateway contract.
//!
//! The dashboard never talks to the hosted document store directly; every
//! data operation goes through the [`DataGateway`] trait. Production wires in
//! a client for the hosted store, tests and local demos use
//! [`memory::MemoryDataGateway`].
//!
//! # Subscription model
//!
//! `subscribe` delivers the complete current set of documents in a collection
//! and then redelivers the *complete* set on every add/update/delete anywhere
//! in that collection. There are no diffs: consumers replace their entire
//! cached list on each event, and must not assume stable ordering across
//! snapshots. A subscription error is terminal; nothing retries.

pub mod auth;
pub mod memory;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use luxe_admin_core::{Collection, OrderId, OrderStatus, UserId};

/// Errors surfaced by the remote data gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The store rejected the operation for lack of permission.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The store could not be reached or the call failed in transit.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// The addressed document does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Document fields could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Terminal error delivered on a live subscription.
///
/// Once a subscription yields this, no further snapshots arrive; the consumer
/// is expected to show a load-failure state. Subscriptions never auto-retry.
#[derive(Debug, Error)]
#[error("subscription to {collection} failed: {message}")]
pub struct SubscriptionError {
    /// The collection the subscription was bound to.
    pub collection: Collection,
    /// Store-provided failure message.
    pub message: String,
}

/// A document as delivered by the store: an opaque ID plus its field map.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned document identifier.
    pub id: String,
    /// The document's stored fields.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Build a document from an ID and a JSON object.
    ///
    /// Non-object values produce an empty field map; the store only ever
    /// delivers objects.
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Value) -> Self {
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decode the document into a typed entity, injecting the document ID
    /// under the `id` key the way the store's client SDKs spread it.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Serialization` if the fields do not match the
    /// target type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        let mut fields = self.fields.clone();
        fields.insert("id".to_owned(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

/// A full-collection snapshot: every document currently in the collection.
pub type Snapshot = Vec<Document>;

/// Stream of full-snapshot updates. Ends after yielding an error.
pub type SnapshotStream = BoxStream<'static, Result<Snapshot, SubscriptionError>>;

/// Handle that keeps a live subscription open.
///
/// Dropping the guard (or calling [`release`](Self::release)) tells the
/// gateway to tear the subscription down. Holding a guard past the consumer's
/// lifetime leaks a live connection, so views must release on teardown.
pub struct SubscriptionGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    /// Create a guard from a cancellation hook.
    #[must_use]
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Explicitly release the subscription.
    pub fn release(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// An open live subscription: the snapshot stream plus its release guard.
pub struct CollectionSubscription {
    /// Initial snapshot followed by full-snapshot redeliveries.
    pub snapshots: SnapshotStream,
    /// Releases the subscription when dropped.
    pub guard: SubscriptionGuard,
}

impl std::fmt::Debug for CollectionSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionSubscription")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

/// CRUD and live-subscription operations against named collections.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// One-shot read of every document in a collection.
    async fn get_all(&self, collection: Collection) -> Result<Snapshot, GatewayError>;

    /// Open a live subscription to a collection.
    ///
    /// The returned stream yields the complete current snapshot first, then a
    /// fresh complete snapshot after every change. See the module docs for
    /// the redelivery and teardown contract.
    async fn subscribe(
        &self,
        collection: Collection,
    ) -> Result<CollectionSubscription, GatewayError>;

    /// Create a document; the store assigns and returns its ID.
    async fn create(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<String, GatewayError>;

    /// Merge the given fields into an existing document.
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), GatewayError>;

    /// Delete a document.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), GatewayError>;

    /// Exact-match query on a single field.
    async fn query_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Snapshot, GatewayError>;

    /// Update the denormalized per-user order record at
    /// `users/{user_id}/orders/{order_id}`.
    async fn update_user_order(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), GatewayError>;
}
