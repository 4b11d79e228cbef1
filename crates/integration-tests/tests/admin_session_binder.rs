//! Integration tests for the auth gate and live collection lifecycle.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;

use luxe_admin::gateway::memory::{MemoryAuthGateway, MemoryDataGateway, MemoryImageHost};
use luxe_admin::services::binder::LiveCollection;
use luxe_admin::services::session::AuthError;
use luxe_admin::state::AppState;
use luxe_admin::theme::MemoryThemeStore;
use luxe_admin::{AdminConfig, config::ImgbbConfig};
use luxe_admin_core::{Collection, Email};

fn app_state(auth: Arc<MemoryAuthGateway>) -> AppState {
    let config = AdminConfig {
        imgbb: ImgbbConfig {
            api_key: secrecy::SecretString::from("k9f2mX7qL4pZ8wR3"),
            upload_url: "https://api.imgbb.com/1/upload".to_owned(),
        },
        allowed_admin_email: Email::parse("admin@luxe.com").unwrap(),
    };
    AppState::new(
        config,
        auth,
        Arc::new(MemoryDataGateway::new()),
        Arc::new(MemoryImageHost::new()),
        Arc::new(MemoryThemeStore::new()),
    )
}

#[tokio::test]
async fn test_only_allowed_email_gets_a_session() {
    let auth = Arc::new(MemoryAuthGateway::new());
    auth.register("admin@luxe.com", "hunter2", Some("Ayesha"));
    auth.register("customer@example.com", "hunter2", None);
    let state = app_state(Arc::clone(&auth));

    let admin = state.sessions().login("admin@luxe.com", "hunter2").await;
    assert!(admin.unwrap().is_authenticated());

    // A valid account with the wrong email is indistinguishable from a bad
    // password and leaves no external session behind.
    let customer = state
        .sessions()
        .login("customer@example.com", "hunter2")
        .await;
    assert!(matches!(customer, Err(AuthError::InvalidCredentials)));
    assert!(auth.current_identity().is_none());
}

#[tokio::test]
async fn test_observed_session_follows_login_and_logout() {
    let auth = Arc::new(MemoryAuthGateway::new());
    auth.register("admin@luxe.com", "hunter2", None);
    let state = app_state(Arc::clone(&auth));

    let mut observed = Box::pin(state.sessions().observe());
    assert!(!observed.next().await.unwrap().is_authenticated());

    state
        .sessions()
        .login("admin@luxe.com", "hunter2")
        .await
        .unwrap();
    assert!(observed.next().await.unwrap().is_authenticated());

    state.sessions().logout().await;
    assert!(!observed.next().await.unwrap().is_authenticated());
}

#[tokio::test]
async fn test_released_binder_receives_nothing_further() {
    let gateway = MemoryDataGateway::new();
    gateway.seed(Collection::Products, "p-1", json!({"name": "Scarf"}));

    let mut live = LiveCollection::bind(&gateway, Collection::Products)
        .await
        .unwrap();
    assert_eq!(live.next().await.unwrap().unwrap().len(), 1);
    live.release();

    // A second binder still works; the store connection was per-binding.
    gateway.seed(Collection::Products, "p-2", json!({"name": "Belt"}));
    let mut fresh = LiveCollection::bind(&gateway, Collection::Products)
        .await
        .unwrap();
    assert_eq!(fresh.next().await.unwrap().unwrap().len(), 2);
    fresh.release();
}

#[tokio::test]
async fn test_subscription_failure_is_terminal() {
    let gateway = MemoryDataGateway::new();
    gateway.fail_reads(Collection::Users, "permission denied");

    let mut live = LiveCollection::bind(&gateway, Collection::Users)
        .await
        .unwrap();
    let first = live.next().await.unwrap();
    assert!(first.is_err());
    assert!(live.next().await.is_none());
}
