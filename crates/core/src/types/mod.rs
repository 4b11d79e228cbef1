//! Newtype wrappers for type-safe IDs, emails, and statuses.

mod collection;
mod email;
mod id;
mod status;

pub use collection::Collection;
pub use email::{Email, EmailError};
pub use id::{CategoryId, OrderId, ProductId, UserId};
pub use status::{OrderStatus, OrderStatusError};
