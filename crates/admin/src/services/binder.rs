//! Live collection binder.
//!
//! Binds a view to a collection: the gateway delivers the complete current
//! document set up front, then redelivers the complete set after every
//! change, and the consumer replaces its whole cached list each time. The
//! same binder serves products, categories, orders, and users.
//!
//! Releasing the binder on view teardown is part of the contract: a binder
//! that is never released keeps a live connection to the store open.

use futures::StreamExt;
use serde::de::DeserializeOwned;

use luxe_admin_core::Collection;

use crate::gateway::{
    DataGateway, Document, GatewayError, Snapshot, SnapshotStream, SubscriptionError,
    SubscriptionGuard,
};

/// A live binding to one collection.
pub struct LiveCollection {
    collection: Collection,
    snapshots: SnapshotStream,
    guard: SubscriptionGuard,
}

impl LiveCollection {
    /// Open a live binding.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the subscription cannot be established at
    /// all. Failures after establishment arrive as a terminal item on the
    /// snapshot stream instead.
    pub async fn bind(
        gateway: &dyn DataGateway,
        collection: Collection,
    ) -> Result<Self, GatewayError> {
        let subscription = gateway.subscribe(collection).await?;
        tracing::debug!(collection = %collection, "live collection bound");
        Ok(Self {
            collection,
            snapshots: subscription.snapshots,
            guard: subscription.guard,
        })
    }

    /// The bound collection.
    #[must_use]
    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Wait for the next full snapshot.
    ///
    /// Yields `Some(Err(_))` exactly once on subscription failure, after
    /// which the stream is exhausted; `None` once the binding is torn down.
    /// Snapshot order within a delivery carries no guarantee.
    pub async fn next(&mut self) -> Option<Result<Snapshot, SubscriptionError>> {
        let item = self.snapshots.next().await;
        if let Some(Err(e)) = &item {
            tracing::error!(collection = %self.collection, error = %e, "live collection failed");
        }
        item
    }

    /// Release the binding, closing the underlying subscription.
    ///
    /// Dropping the binder has the same effect; this exists so view teardown
    /// can be explicit.
    pub fn release(self) {
        tracing::debug!(collection = %self.collection, "live collection released");
        self.guard.release();
    }
}

impl std::fmt::Debug for LiveCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveCollection")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

/// Decode a snapshot into typed entities.
///
/// Documents that do not match the target type are skipped with a warning
/// rather than poisoning the whole snapshot; the store is shared with the
/// storefront and can hold fields this dashboard does not know about.
#[must_use]
pub fn decode_snapshot<T: DeserializeOwned>(snapshot: &[Document]) -> Vec<T> {
    snapshot
        .iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!(id = %doc.id, error = %e, "skipping undecodable document");
                None
            }
        })
        .collect()
}
