//! Application state shared across the dashboard.

use std::sync::Arc;

use crate::config::AdminConfig;
use crate::gateway::DataGateway;
use crate::gateway::auth::AuthGateway;
use crate::imgbb::ImageHost;
use crate::services::session::{AllowedEmailPolicy, SessionManager};
use crate::theme::ThemeStore;

/// Application state shared by every view of the dashboard.
///
/// Built once at startup, cloned freely. Dropping the last clone at process
/// exit releases any subscriptions still held through it.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    data: Arc<dyn DataGateway>,
    images: Arc<dyn ImageHost>,
    sessions: SessionManager,
    theme: Arc<dyn ThemeStore>,
}

impl AppState {
    /// Wire the state together from its gateways.
    ///
    /// The session manager is constructed here with the allowed-email policy
    /// taken from `config`.
    #[must_use]
    pub fn new(
        config: AdminConfig,
        auth: Arc<dyn AuthGateway>,
        data: Arc<dyn DataGateway>,
        images: Arc<dyn ImageHost>,
        theme: Arc<dyn ThemeStore>,
    ) -> Self {
        let policy = AllowedEmailPolicy::new(config.allowed_admin_email.clone());
        let sessions = SessionManager::new(auth, Arc::new(policy));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                data,
                images,
                sessions,
                theme,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn data(&self) -> &dyn DataGateway {
        self.inner.data.as_ref()
    }

    #[must_use]
    pub fn images(&self) -> &dyn ImageHost {
        self.inner.images.as_ref()
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.inner.sessions
    }

    #[must_use]
    pub fn theme(&self) -> &dyn ThemeStore {
        self.inner.theme.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ImgbbConfig;
    use crate::gateway::memory::{MemoryAuthGateway, MemoryDataGateway, MemoryImageHost};
    use crate::theme::MemoryThemeStore;
    use luxe_admin_core::Email;
    use secrecy::SecretString;

    fn test_config() -> AdminConfig {
        AdminConfig {
            imgbb: ImgbbConfig {
                api_key: SecretString::from("k9f2mX7qL4pZ8wR3"),
                upload_url: "https://api.imgbb.com/1/upload".to_owned(),
            },
            allowed_admin_email: Email::parse("admin@luxe.com").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_state_wires_policy_from_config() {
        let auth = Arc::new(MemoryAuthGateway::new());
        auth.register("admin@luxe.com", "hunter2", None);
        let state = AppState::new(
            test_config(),
            auth,
            Arc::new(MemoryDataGateway::new()),
            Arc::new(MemoryImageHost::new()),
            Arc::new(MemoryThemeStore::new()),
        );

        let session = state.sessions().login("admin@luxe.com", "hunter2").await;
        assert!(session.unwrap().is_authenticated());
    }
}
