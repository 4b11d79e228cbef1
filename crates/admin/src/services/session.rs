//! Auth session manager.
//!
//! Owns the signed-in identity for the dashboard. Credential verification is
//! delegated to the external auth gateway; on top of it this module enforces
//! the dashboard's authorization policy: an identity the policy rejects is
//! treated exactly like no identity at all, even though the underlying
//! external session may remain signed in.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use thiserror::Error;

use luxe_admin_core::Email;

use crate::gateway::auth::{AuthGateway, AuthGatewayError, Identity};

/// Errors that can occur during login.
///
/// An unauthorized email reports [`AuthError::InvalidCredentials`], the same
/// outcome as a wrong password, so the login form cannot be used to probe
/// which accounts exist.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Credentials rejected, or the identity is not authorized for the
    /// dashboard.
    #[error("invalid credentials or unauthorized user")]
    InvalidCredentials,

    /// The auth service could not be reached.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// The dashboard's view of the signed-in state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The accepted admin identity, if any.
    pub identity: Option<Identity>,
    /// True until the first auth-state emission arrives after startup.
    pub loading: bool,
}

impl Session {
    /// The state held before the auth stream has emitted anything.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }

    /// No accepted identity.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            identity: None,
            loading: false,
        }
    }

    /// An accepted admin identity.
    #[must_use]
    pub const fn admin(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            loading: false,
        }
    }

    /// Whether the dashboard should be shown.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Decides whether a signed-in identity may use the dashboard.
///
/// Injected into the [`SessionManager`] so the policy can change without
/// touching the session control flow.
pub trait AuthPolicy: Send + Sync {
    /// True if the identity is allowed in.
    fn is_authorized(&self, identity: &Identity) -> bool;
}

/// Grants access to exactly one email address.
#[derive(Debug, Clone)]
pub struct AllowedEmailPolicy {
    allowed: Email,
}

impl AllowedEmailPolicy {
    /// Allow only `allowed`.
    #[must_use]
    pub const fn new(allowed: Email) -> Self {
        Self { allowed }
    }
}

impl AuthPolicy for AllowedEmailPolicy {
    fn is_authorized(&self, identity: &Identity) -> bool {
        identity.email == self.allowed
    }
}

/// Owns login/logout and the observed session stream.
pub struct SessionManager {
    auth: Arc<dyn AuthGateway>,
    policy: Arc<dyn AuthPolicy>,
}

impl SessionManager {
    /// Create a session manager over an auth gateway and a policy.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthGateway>, policy: Arc<dyn AuthPolicy>) -> Self {
        Self { auth, policy }
    }

    /// Infinite stream of [`Session`] values driven by the external
    /// auth-state stream.
    ///
    /// Each emission reflects the current signed-in identity gated through
    /// the authorization policy. Consumers hold [`Session::initial`] until
    /// the first emission arrives.
    pub fn observe(&self) -> impl Stream<Item = Session> + Send + 'static {
        let policy = Arc::clone(&self.policy);
        self.auth
            .state_changes()
            .map(move |identity| gate(policy.as_ref(), identity))
    }

    /// Verify credentials and establish an admin session.
    ///
    /// If the gateway accepts the credentials but the policy rejects the
    /// identity, the external session is signed out again and the login
    /// reports invalid credentials; no externally-created account can reach
    /// the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for rejected credentials or
    /// an unauthorized identity, [`AuthError::Unavailable`] if the auth
    /// service cannot be reached.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let identity = self.auth.sign_in(email, password).await.map_err(|e| {
            tracing::error!(error = %e, "login failed at auth gateway");
            match e {
                AuthGatewayError::InvalidCredentials => AuthError::InvalidCredentials,
                AuthGatewayError::Unavailable(msg) => AuthError::Unavailable(msg),
            }
        })?;

        if self.policy.is_authorized(&identity) {
            tracing::info!(email = %identity.email, uid = %identity.uid, "admin login accepted");
            Ok(Session::admin(identity))
        } else {
            tracing::warn!(email = %identity.email, "login rejected: unauthorized email");
            if let Err(e) = self.auth.sign_out().await {
                tracing::error!(error = %e, "failed to sign out unauthorized identity");
            }
            Err(AuthError::InvalidCredentials)
        }
    }

    /// Clear the external session and the local one.
    ///
    /// Gateway errors are logged and swallowed; the local session is
    /// anonymous either way.
    pub async fn logout(&self) -> Session {
        match self.auth.sign_out().await {
            Ok(()) => tracing::info!("admin logged out"),
            Err(e) => tracing::error!(error = %e, "logout failed at auth gateway"),
        }
        Session::anonymous()
    }
}

/// Apply the authorization policy to one auth-state emission.
fn gate(policy: &dyn AuthPolicy, identity: Option<Identity>) -> Session {
    match identity {
        Some(identity) if policy.is_authorized(&identity) => {
            tracing::info!(email = %identity.email, uid = %identity.uid, "admin session accepted");
            Session::admin(identity)
        }
        Some(identity) => {
            tracing::warn!(email = %identity.email, "session identity rejected by policy");
            Session::anonymous()
        }
        None => {
            tracing::debug!("no signed-in identity");
            Session::anonymous()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gateway::memory::MemoryAuthGateway;
    use futures::StreamExt;

    fn manager(auth: Arc<MemoryAuthGateway>) -> SessionManager {
        let policy = AllowedEmailPolicy::new(Email::parse("admin@luxe.com").unwrap());
        SessionManager::new(auth, Arc::new(policy))
    }

    #[tokio::test]
    async fn test_login_accepts_allowed_email() {
        let auth = Arc::new(MemoryAuthGateway::new());
        auth.register("admin@luxe.com", "hunter2", Some("Ayesha"));
        let sessions = manager(Arc::clone(&auth));

        let session = sessions.login("admin@luxe.com", "hunter2").await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(
            session.identity.unwrap().email.as_str(),
            "admin@luxe.com"
        );
    }

    #[tokio::test]
    async fn test_login_rejects_other_email_and_signs_out() {
        let auth = Arc::new(MemoryAuthGateway::new());
        auth.register("customer@example.com", "hunter2", None);
        let sessions = manager(Arc::clone(&auth));

        let result = sessions.login("customer@example.com", "hunter2").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        // The external session must not survive the rejection.
        assert!(auth.current_identity().is_none());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_password() {
        let auth = Arc::new(MemoryAuthGateway::new());
        auth.register("admin@luxe.com", "hunter2", None);
        let sessions = manager(Arc::clone(&auth));

        let result = sessions.login("admin@luxe.com", "wrong").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_reports_unavailable_gateway() {
        let auth = Arc::new(MemoryAuthGateway::new());
        auth.go_offline("network down");
        let sessions = manager(Arc::clone(&auth));

        let result = sessions.login("admin@luxe.com", "hunter2").await;
        assert!(matches!(result, Err(AuthError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_observe_gates_unauthorized_identity() {
        let auth = Arc::new(MemoryAuthGateway::new());
        auth.register("customer@example.com", "pw", None);
        let sessions = manager(Arc::clone(&auth));

        let mut observed = Box::pin(sessions.observe());
        assert_eq!(observed.next().await.unwrap(), Session::anonymous());

        // Sign in directly at the gateway, bypassing login(): the observed
        // session must still come through anonymous.
        auth.sign_in("customer@example.com", "pw").await.unwrap();
        assert_eq!(observed.next().await.unwrap(), Session::anonymous());
    }

    #[tokio::test]
    async fn test_observe_emits_admin_session() {
        let auth = Arc::new(MemoryAuthGateway::new());
        auth.register("admin@luxe.com", "hunter2", None);
        let sessions = manager(Arc::clone(&auth));

        let mut observed = Box::pin(sessions.observe());
        assert!(!observed.next().await.unwrap().is_authenticated());

        auth.sign_in("admin@luxe.com", "hunter2").await.unwrap();
        let session = observed.next().await.unwrap();
        assert!(session.is_authenticated());

        sessions.logout().await;
        assert!(!observed.next().await.unwrap().is_authenticated());
    }

    #[test]
    fn test_initial_session_is_loading_and_anonymous() {
        let session = Session::initial();
        assert!(session.loading);
        assert!(!session.is_authenticated());
    }
}
