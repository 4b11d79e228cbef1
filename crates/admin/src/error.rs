//! Unified error handling for the admin dashboard.

use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::{GatewayError, SubscriptionError};
use crate::imgbb::UploadError;
use crate::services::catalog::SaveError;
use crate::services::form::{FormError, ValidationError};
use crate::services::orders::UpdateError;
use crate::services::session::AuthError;

/// Application-level error type for the admin dashboard.
///
/// Every failure is terminal for the operation that produced it; nothing in
/// the dashboard retries automatically.
#[derive(Debug, Error)]
pub enum AppError {
    /// Login or session handling failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A live subscription failed and will not recover.
    #[error("Subscription error: {0}")]
    Subscription(#[from] SubscriptionError),

    /// A form draft failed local validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An image upload was rejected by the host.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// A catalog save did not persist.
    #[error("Save error: {0}")]
    Save(#[from] SaveError),

    /// An order-status change did not fully apply.
    #[error("Update error: {0}")]
    Update(#[from] UpdateError),

    /// Form submission failed at any of its stages.
    #[error("Form error: {0}")]
    Form(#[from] FormError),

    /// The data gateway failed outside a more specific operation.
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_source() {
        let err = AppError::from(GatewayError::Unavailable("store down".to_owned()));
        assert_eq!(err.to_string(), "Gateway error: gateway unavailable: store down");
    }

    #[test]
    fn test_validation_error_converts() {
        let err = AppError::from(ValidationError::InvalidPrice);
        assert!(matches!(err, AppError::Validation(_)));
    }
}
