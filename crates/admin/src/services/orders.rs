//! Order status workflow.
//!
//! Changing an order's status writes the canonical order document first,
//! then updates the denormalized copy under the customer's user record. The
//! two writes are not transactional: a failure after the canonical write does
//! not roll it back, and the caller sees a single undifferentiated failure
//! with no step attribution. When the email resolves to zero or multiple
//! users the mirror is skipped silently and the copies diverge until the
//! next change; that divergence is accepted, not masked.

use serde_json::{Map, Value};
use thiserror::Error;

use luxe_admin_core::{Collection, Order, OrderId, OrderStatus, UserId};

use crate::gateway::{DataGateway, GatewayError};

/// An order-status change that did not fully apply.
///
/// Carries no step attribution: the canonical write, the user lookup, and
/// the mirror write all report the same way, and the canonical write may
/// have landed before the failure.
#[derive(Debug, Error)]
#[error("order status update failed: {0}")]
pub struct UpdateError(#[from] pub GatewayError);

/// Set an order's status, mirroring into the owning user's copy.
///
/// `orders` is the already-loaded snapshot the order list view holds; the
/// customer email is looked up there rather than re-read from the store.
/// The mirror is written only when the email resolves to exactly one user;
/// zero or multiple matches skip it without error, as does an order missing
/// from the snapshot.
///
/// # Errors
///
/// Returns [`UpdateError`] if the canonical update, the user lookup, or the
/// mirror write fails at the gateway. The error does not say which step
/// failed, and the canonical write is not rolled back.
pub async fn set_status(
    gateway: &dyn DataGateway,
    orders: &[Order],
    order_id: &OrderId,
    new_status: OrderStatus,
) -> Result<(), UpdateError> {
    let mut fields = Map::new();
    fields.insert(
        "status".to_owned(),
        Value::String(new_status.as_str().to_owned()),
    );
    gateway
        .update(Collection::Orders, order_id.as_str(), fields)
        .await?;
    tracing::info!(order = %order_id, status = %new_status, "order status updated");

    mirror_status(gateway, orders, order_id, new_status).await?;
    Ok(())
}

/// Denormalized mirror of a status change.
///
/// Zero/multiple email matches and a stale snapshot skip silently; gateway
/// failures propagate.
async fn mirror_status(
    gateway: &dyn DataGateway,
    orders: &[Order],
    order_id: &OrderId,
    new_status: OrderStatus,
) -> Result<(), GatewayError> {
    let Some(order) = orders
        .iter()
        .find(|o| o.id.as_ref() == Some(order_id))
    else {
        tracing::warn!(order = %order_id, "order not in loaded snapshot, mirror skipped");
        return Ok(());
    };

    let email = Value::String(order.customer_email.as_str().to_owned());
    let users = gateway
        .query_by_field(Collection::Users, "email", &email)
        .await
        .inspect_err(|e| {
            tracing::error!(order = %order_id, error = %e, "user lookup failed after canonical write");
        })?;

    if users.len() != 1 {
        tracing::warn!(
            order = %order_id,
            email = %order.customer_email,
            matches = users.len(),
            "email did not resolve to exactly one user, mirror skipped"
        );
        return Ok(());
    }

    let user_id = UserId::new(users[0].id.clone());
    gateway
        .update_user_order(&user_id, order_id, new_status)
        .await
        .inspect_err(|e| {
            tracing::error!(order = %order_id, user = %user_id, error = %e, "order mirror failed after canonical write");
        })?;
    tracing::debug!(order = %order_id, user = %user_id, "order mirror updated");
    Ok(())
}
