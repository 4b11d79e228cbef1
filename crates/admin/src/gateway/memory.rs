//! In-memory gateway implementations.
//!
//! Back the dashboard core with process-local state instead of the hosted
//! services. Used by the test suites and local development shells; they honor
//! the same contracts as the hosted backends, including full-snapshot
//! redelivery on every change and terminal subscription errors.
//!
//! Failure injection (`fail_reads`, `fail_writes`, `fail_mirror`, `go_offline`,
//! `fail_uploads`) exists so tests can exercise each component's
//! partial-failure paths.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, oneshot, watch};
use url::Url;
use uuid::Uuid;

use luxe_admin_core::{Collection, Email, OrderId, OrderStatus, UserId};

use super::auth::{AuthGateway, AuthGatewayError, Identity};
use super::{
    CollectionSubscription, DataGateway, Document, GatewayError, Snapshot, SubscriptionError,
    SubscriptionGuard,
};
use crate::imgbb::{ImageHost, UploadError};

const BROADCAST_CAPACITY: usize = 64;

// =============================================================================
// Data gateway
// =============================================================================

#[derive(Default)]
struct DataState {
    collections: HashMap<Collection, Vec<Document>>,
    mirrors: HashMap<(UserId, OrderId), OrderStatus>,
    read_failures: HashMap<Collection, String>,
    write_failure: Option<String>,
    mirror_failure: Option<String>,
}

/// In-memory [`DataGateway`].
#[derive(Clone)]
pub struct MemoryDataGateway {
    state: Arc<Mutex<DataState>>,
    senders: Arc<Mutex<HashMap<Collection, broadcast::Sender<Snapshot>>>>,
}

impl Default for MemoryDataGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDataGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DataState::default())),
            senders: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Insert a document with a fixed ID, bypassing the create path.
    ///
    /// Intended for seeding test fixtures; publishes a snapshot like any
    /// other change.
    pub fn seed(&self, collection: Collection, id: &str, fields: Value) {
        {
            let mut state = self.state.lock().expect("gateway state lock poisoned");
            state
                .collections
                .entry(collection)
                .or_default()
                .push(Document::new(id, fields));
        }
        self.publish(collection);
    }

    /// Make every subsequent read of `collection` (one-shot or subscribe)
    /// fail with the given message.
    pub fn fail_reads(&self, collection: Collection, message: &str) {
        let mut state = self.state.lock().expect("gateway state lock poisoned");
        state.read_failures.insert(collection, message.to_owned());
    }

    /// Make every subsequent write fail with the given message.
    pub fn fail_writes(&self, message: &str) {
        let mut state = self.state.lock().expect("gateway state lock poisoned");
        state.write_failure = Some(message.to_owned());
    }

    /// Make every subsequent per-user order mirror update fail.
    pub fn fail_mirror(&self, message: &str) {
        let mut state = self.state.lock().expect("gateway state lock poisoned");
        state.mirror_failure = Some(message.to_owned());
    }

    /// The mirrored status stored under `users/{user_id}/orders/{order_id}`,
    /// if any mirror write happened.
    #[must_use]
    pub fn mirrored_status(&self, user_id: &UserId, order_id: &OrderId) -> Option<OrderStatus> {
        let state = self.state.lock().expect("gateway state lock poisoned");
        state
            .mirrors
            .get(&(user_id.clone(), order_id.clone()))
            .copied()
    }

    /// Current document count in a collection.
    #[must_use]
    pub fn len(&self, collection: Collection) -> usize {
        let state = self.state.lock().expect("gateway state lock poisoned");
        state.collections.get(&collection).map_or(0, Vec::len)
    }

    /// Whether a collection holds no documents.
    #[must_use]
    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    /// Read a single document by ID.
    #[must_use]
    pub fn get(&self, collection: Collection, id: &str) -> Option<Document> {
        let state = self.state.lock().expect("gateway state lock poisoned");
        state
            .collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id).cloned())
    }

    fn sender(&self, collection: Collection) -> broadcast::Sender<Snapshot> {
        let mut senders = self.senders.lock().expect("gateway senders lock poisoned");
        senders
            .entry(collection)
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .clone()
    }

    fn publish(&self, collection: Collection) {
        let snapshot = {
            let state = self.state.lock().expect("gateway state lock poisoned");
            state.collections.get(&collection).cloned().unwrap_or_default()
        };
        // No receivers is fine; send only fails when nobody listens.
        let _ = self.sender(collection).send(snapshot);
    }

    fn check_write(&self) -> Result<(), GatewayError> {
        let state = self.state.lock().expect("gateway state lock poisoned");
        state
            .write_failure
            .as_ref()
            .map_or(Ok(()), |msg| Err(GatewayError::Unavailable(msg.clone())))
    }
}

#[async_trait]
impl DataGateway for MemoryDataGateway {
    async fn get_all(&self, collection: Collection) -> Result<Snapshot, GatewayError> {
        let state = self.state.lock().expect("gateway state lock poisoned");
        if let Some(message) = state.read_failures.get(&collection) {
            return Err(GatewayError::PermissionDenied(message.clone()));
        }
        Ok(state.collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn subscribe(
        &self,
        collection: Collection,
    ) -> Result<CollectionSubscription, GatewayError> {
        let (failure, initial) = {
            let state = self.state.lock().expect("gateway state lock poisoned");
            (
                state.read_failures.get(&collection).cloned(),
                state.collections.get(&collection).cloned().unwrap_or_default(),
            )
        };
        let mut rx = self.sender(collection).subscribe();
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let snapshots = Box::pin(stream! {
            if let Some(message) = failure {
                // Terminal: the consumer shows a load-failure state, no retry.
                yield Err(SubscriptionError { collection, message });
                return;
            }
            yield Ok(initial);
            loop {
                // biased: a released guard always wins over a pending snapshot
                tokio::select! {
                    biased;
                    _ = &mut cancel_rx => break,
                    received = rx.recv() => match received {
                        Ok(snapshot) => yield Ok(snapshot),
                        Err(broadcast::error::RecvError::Closed) => break,
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    },
                }
            }
        });

        let guard = SubscriptionGuard::new(move || {
            let _ = cancel_tx.send(());
        });

        Ok(CollectionSubscription { snapshots, guard })
    }

    async fn create(
        &self,
        collection: Collection,
        fields: Map<String, Value>,
    ) -> Result<String, GatewayError> {
        self.check_write()?;
        let id = Uuid::new_v4().to_string();
        {
            let mut state = self.state.lock().expect("gateway state lock poisoned");
            state
                .collections
                .entry(collection)
                .or_default()
                .push(Document {
                    id: id.clone(),
                    fields,
                });
        }
        self.publish(collection);
        Ok(id)
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), GatewayError> {
        self.check_write()?;
        {
            let mut state = self.state.lock().expect("gateway state lock poisoned");
            let doc = state
                .collections
                .entry(collection)
                .or_default()
                .iter_mut()
                .find(|d| d.id == id)
                .ok_or_else(|| GatewayError::NotFound(format!("{collection}/{id}")))?;
            doc.fields.extend(fields);
        }
        self.publish(collection);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), GatewayError> {
        self.check_write()?;
        {
            let mut state = self.state.lock().expect("gateway state lock poisoned");
            state
                .collections
                .entry(collection)
                .or_default()
                .retain(|d| d.id != id);
        }
        self.publish(collection);
        Ok(())
    }

    async fn query_by_field(
        &self,
        collection: Collection,
        field: &str,
        value: &Value,
    ) -> Result<Snapshot, GatewayError> {
        let state = self.state.lock().expect("gateway state lock poisoned");
        if let Some(message) = state.read_failures.get(&collection) {
            return Err(GatewayError::PermissionDenied(message.clone()));
        }
        Ok(state
            .collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.fields.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_user_order(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().expect("gateway state lock poisoned");
        if let Some(message) = &state.mirror_failure {
            return Err(GatewayError::Unavailable(message.clone()));
        }
        state
            .mirrors
            .insert((user_id.clone(), order_id.clone()), status);
        Ok(())
    }
}

// =============================================================================
// Auth gateway
// =============================================================================

struct Account {
    password: String,
    identity: Identity,
}

/// In-memory [`AuthGateway`].
pub struct MemoryAuthGateway {
    accounts: Mutex<HashMap<String, Account>>,
    current: watch::Sender<Option<Identity>>,
    offline: Mutex<Option<String>>,
}

impl Default for MemoryAuthGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuthGateway {
    /// Create a gateway with no accounts and nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current,
            offline: Mutex::new(None),
        }
    }

    /// Register an account that `sign_in` will accept.
    ///
    /// # Panics
    ///
    /// Panics if `email` is not a structurally valid address.
    pub fn register(&self, email: &str, password: &str, display_name: Option<&str>) {
        let identity = Identity {
            uid: Uuid::new_v4().to_string(),
            email: Email::parse(email).expect("test account email must be valid"),
            display_name: display_name.map(str::to_owned),
        };
        let mut accounts = self.accounts.lock().expect("auth accounts lock poisoned");
        accounts.insert(
            email.to_owned(),
            Account {
                password: password.to_owned(),
                identity,
            },
        );
    }

    /// Make every subsequent call fail as unreachable.
    pub fn go_offline(&self, message: &str) {
        let mut offline = self.offline.lock().expect("auth offline lock poisoned");
        *offline = Some(message.to_owned());
    }

    /// The identity currently signed in at the gateway level, if any.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn check_online(&self) -> Result<(), AuthGatewayError> {
        let offline = self.offline.lock().expect("auth offline lock poisoned");
        offline
            .as_ref()
            .map_or(Ok(()), |msg| Err(AuthGatewayError::Unavailable(msg.clone())))
    }
}

#[async_trait]
impl AuthGateway for MemoryAuthGateway {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthGatewayError> {
        self.check_online()?;
        let identity = {
            let accounts = self.accounts.lock().expect("auth accounts lock poisoned");
            let account = accounts
                .get(email)
                .filter(|a| a.password == password)
                .ok_or(AuthGatewayError::InvalidCredentials)?;
            account.identity.clone()
        };
        let _ = self.current.send(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthGatewayError> {
        self.check_online()?;
        let _ = self.current.send(None);
        Ok(())
    }

    fn state_changes(&self) -> BoxStream<'static, Option<Identity>> {
        let mut rx = self.current.subscribe();
        Box::pin(stream! {
            loop {
                let value = rx.borrow_and_update().clone();
                yield value;
                if rx.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}

// =============================================================================
// Image host
// =============================================================================

/// In-memory [`ImageHost`] that fabricates hosted URLs.
#[derive(Default)]
pub struct MemoryImageHost {
    uploads: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
}

impl MemoryImageHost {
    /// Create a host that accepts every upload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail with the given message.
    pub fn fail_uploads(&self, message: &str) {
        let mut failure = self.failure.lock().expect("image host lock poisoned");
        *failure = Some(message.to_owned());
    }

    /// File names uploaded so far, in order.
    #[must_use]
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().expect("image host lock poisoned").clone()
    }
}

#[async_trait]
impl ImageHost for MemoryImageHost {
    async fn upload(&self, file_name: &str, _bytes: Vec<u8>) -> Result<Url, UploadError> {
        {
            let failure = self.failure.lock().expect("image host lock poisoned");
            if let Some(message) = failure.as_ref() {
                return Err(UploadError::Rejected(message.clone()));
            }
        }
        let mut uploads = self.uploads.lock().expect("image host lock poisoned");
        uploads.push(file_name.to_owned());
        Ok(Url::parse(&format!(
            "https://images.luxe.test/{file_name}"
        ))?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_assigns_id_and_publishes() {
        let gateway = MemoryDataGateway::new();
        let sub = gateway.subscribe(Collection::Products).await.unwrap();
        let mut snapshots = sub.snapshots;

        let initial = snapshots.next().await.unwrap().unwrap();
        assert!(initial.is_empty());

        let fields = match json!({"name": "Belt"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let id = gateway.create(Collection::Products, fields).await.unwrap();

        let next = snapshots.next().await.unwrap().unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].id, id);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let gateway = MemoryDataGateway::new();
        gateway.seed(Collection::Orders, "o-1", json!({"status": "Processing", "total": 100}));

        let fields = match json!({"status": "Shipped"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        gateway
            .update(Collection::Orders, "o-1", fields)
            .await
            .unwrap();

        let doc = gateway.get(Collection::Orders, "o-1").unwrap();
        assert_eq!(doc.fields.get("status"), Some(&json!("Shipped")));
        assert_eq!(doc.fields.get("total"), Some(&json!(100)));
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let gateway = MemoryDataGateway::new();
        let result = gateway
            .update(Collection::Orders, "missing", Map::new())
            .await;
        assert!(matches!(result, Err(GatewayError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_failure_is_terminal_on_subscribe() {
        let gateway = MemoryDataGateway::new();
        gateway.fail_reads(Collection::Categories, "permission denied");

        let sub = gateway.subscribe(Collection::Categories).await.unwrap();
        let mut snapshots = sub.snapshots;
        let first = snapshots.next().await.unwrap();
        assert!(first.is_err());
        assert!(snapshots.next().await.is_none());
    }

    #[tokio::test]
    async fn test_query_by_field_exact_match() {
        let gateway = MemoryDataGateway::new();
        gateway.seed(Collection::Users, "u-1", json!({"email": "a@b.c"}));
        gateway.seed(Collection::Users, "u-2", json!({"email": "x@y.z"}));

        let matches = gateway
            .query_by_field(Collection::Users, "email", &json!("a@b.c"))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "u-1");
    }

    #[tokio::test]
    async fn test_auth_state_stream_emits_current_then_changes() {
        let auth = MemoryAuthGateway::new();
        auth.register("admin@luxe.com", "hunter2", None);

        let mut states = auth.state_changes();
        assert_eq!(states.next().await.unwrap(), None);

        auth.sign_in("admin@luxe.com", "hunter2").await.unwrap();
        let signed_in = states.next().await.unwrap();
        assert_eq!(signed_in.unwrap().email.as_str(), "admin@luxe.com");

        auth.sign_out().await.unwrap();
        assert_eq!(states.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_auth_rejects_bad_password() {
        let auth = MemoryAuthGateway::new();
        auth.register("admin@luxe.com", "hunter2", None);
        let result = auth.sign_in("admin@luxe.com", "wrong").await;
        assert!(matches!(result, Err(AuthGatewayError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_image_host_records_uploads() {
        let host = MemoryImageHost::new();
        let url = host.upload("scarf.jpg", vec![1, 2, 3]).await.unwrap();
        assert_eq!(url.as_str(), "https://images.luxe.test/scarf.jpg");
        assert_eq!(host.uploaded(), vec!["scarf.jpg"]);
    }
}
