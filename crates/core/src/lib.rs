//! LUXE Admin Core - Shared types library.
//!
//! This crate provides the common types used across the LUXE admin dashboard
//! components:
//! - `admin` - The reactive/form core behind the dashboard UI
//! - `integration-tests` - Cross-component tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no document-store access,
//! no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and statuses
//! - [`entities`] - The persisted entities mirrored from the document store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entities;
pub mod types;

pub use entities::*;
pub use types::*;
