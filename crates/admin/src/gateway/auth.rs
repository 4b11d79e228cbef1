//! External authentication gateway contract.
//!
//! Credential verification and the signed-in-state stream both live in the
//! hosted auth service; this module only defines the seam. The session
//! manager layers the dashboard's authorization policy on top.

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use luxe_admin_core::Email;

/// Errors surfaced by the external auth gateway.
#[derive(Debug, Error)]
pub enum AuthGatewayError {
    /// The email/password pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The auth service could not be reached.
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

/// A signed-in identity as reported by the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable user identifier assigned by the auth service.
    pub uid: String,
    pub email: Email,
    pub display_name: Option<String>,
}

impl Identity {
    /// Display name, falling back to "Admin" like the dashboard header does.
    #[must_use]
    pub fn display_name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Admin")
    }
}

/// Credential sign-in, sign-out, and the auth-state stream.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Verify credentials and establish an external session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthGatewayError>;

    /// Clear the external session.
    async fn sign_out(&self) -> Result<(), AuthGatewayError>;

    /// Infinite stream of auth-state changes.
    ///
    /// Emits the current state immediately on subscription, then again on
    /// every sign-in or sign-out. `None` means no identity is signed in.
    fn state_changes(&self) -> BoxStream<'static, Option<Identity>>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let identity = Identity {
            uid: "u-1".into(),
            email: Email::parse("admin@luxe.com").unwrap(),
            display_name: None,
        };
        assert_eq!(identity.display_name_or_default(), "Admin");

        let named = Identity {
            display_name: Some("Ayesha".into()),
            ..identity
        };
        assert_eq!(named.display_name_or_default(), "Ayesha");
    }
}
