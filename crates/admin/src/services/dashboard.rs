//! Dashboard stats aggregator.
//!
//! One-shot reads over orders, products, and users, run concurrently and
//! each independently failure-wrapped: a collection that fails to load
//! contributes zero to every stat it feeds and one entry to the failure
//! list, and the other collections still count. The read is terminal;
//! surfacing the partial-failure warning is the caller's job.

use rust_decimal::Decimal;

use luxe_admin_core::{Collection, DashboardStats};

use crate::gateway::{DataGateway, Snapshot};

/// The aggregate result of one dashboard refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    pub stats: DashboardStats,
    /// One `"<collection>: <message>"` entry per failed read.
    pub failures: Vec<String>,
}

impl StatsReport {
    /// Whether every collection loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compute dashboard stats from one-shot reads of orders, products, users.
///
/// Revenue sums the `total` field of every order, treating a missing or
/// non-numeric total as zero. Never fails as a whole: the worst case is all
/// zeros with three failure entries.
pub async fn compute_stats(gateway: &dyn DataGateway) -> StatsReport {
    let (orders, products, users) = tokio::join!(
        gateway.get_all(Collection::Orders),
        gateway.get_all(Collection::Products),
        gateway.get_all(Collection::Users),
    );

    let mut failures = Vec::new();
    let mut stats = DashboardStats::default();

    match orders {
        Ok(snapshot) => {
            stats.orders = snapshot.len() as u64;
            stats.revenue = sum_revenue(&snapshot);
        }
        Err(e) => failures.push(format!("{}: {e}", Collection::Orders)),
    }
    match products {
        Ok(snapshot) => stats.products = snapshot.len() as u64,
        Err(e) => failures.push(format!("{}: {e}", Collection::Products)),
    }
    match users {
        Ok(snapshot) => stats.users = snapshot.len() as u64,
        Err(e) => failures.push(format!("{}: {e}", Collection::Users)),
    }

    if failures.is_empty() {
        tracing::debug!(
            orders = stats.orders,
            products = stats.products,
            users = stats.users,
            "dashboard stats refreshed"
        );
    } else {
        tracing::warn!(failures = ?failures, "dashboard stats partially loaded");
    }

    StatsReport { stats, failures }
}

/// Sum order totals across a snapshot. Missing totals count as zero.
fn sum_revenue(orders: &Snapshot) -> Decimal {
    orders
        .iter()
        .filter_map(|doc| doc.fields.get("total"))
        .filter_map(|total| serde_json::from_value::<Decimal>(total.clone()).ok())
        .sum()
}
