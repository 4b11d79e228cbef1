//! Dashboard behaviors built on top of the gateway traits.

pub mod binder;
pub mod catalog;
pub mod dashboard;
pub mod form;
pub mod orders;
pub mod session;
