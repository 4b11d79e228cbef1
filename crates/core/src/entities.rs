//! The persisted entities mirrored from the document store.
//!
//! All of these are owned by the remote store; the dashboard only ever holds
//! transient cached copies whose lifetime is bounded by the active
//! subscription or one-shot fetch that produced them.
//!
//! Document IDs live outside the stored field map (they are the document
//! key), so every entity carries its ID as an `Option` that is absent on a
//! not-yet-created draft and filled in from the document key on decode.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{CategoryId, Email, OrderId, OrderStatus, ProductId, UserId};

/// A storefront product.
///
/// Invariants (enforced by the product form before save): `price > 0`,
/// `stock >= 0`, `image` non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Document ID; `None` for a draft that has not been created yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub name: String,
    /// One of the known category names, or a freeform custom category.
    pub category: String,
    pub price: Decimal,
    pub stock: u32,
    /// Ordered size labels, edited as a comma-separated list.
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Ordered detail lines, edited as a comma-separated list.
    #[serde(default)]
    pub details: Vec<String>,
    /// Hosted image URL.
    pub image: String,
    /// RFC 3339 creation timestamp, set when the product is first saved.
    #[serde(default, rename = "createdAt")]
    pub created_at: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Document ID; `None` for a draft that has not been created yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CategoryId>,
    pub name: String,
    /// Hosted image URL.
    pub image: String,
}

/// A single line item on an order.
///
/// The checkout flow writes more fields than the dashboard reads; everything
/// beyond the name is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, Value>,
}

/// A customer order.
///
/// Orders are created by the storefront checkout flow; this subsystem only
/// ever mutates `status`, through the order-status workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<OrderId>,
    #[serde(rename = "customerEmail")]
    pub customer_email: Email,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Order total; missing totals are treated as zero by the aggregator.
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
}

/// A storefront customer account. Read-only in the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: String,
    pub email: Email,
    /// Join date string as written by the signup flow.
    #[serde(default)]
    pub joined: String,
}

/// Derived, non-persisted dashboard aggregate.
///
/// Recomputed from scratch on each dashboard view mount; collections whose
/// read failed contribute zero.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Sum of order totals across the `orders` collection.
    pub revenue: Decimal,
    pub orders: u64,
    pub products: u64,
    pub users: u64,
}
