//! LUXE admin dashboard core.
//!
//! This crate provides the admin dashboard's behavior as a library: the auth
//! session gate, live collection subscriptions, product and category form
//! controllers, the dashboard stats aggregator, and the order-status
//! workflow. Rendering is left to the embedding shell; everything here is
//! UI-free and drives the views through streams and plain calls.
//!
//! # Gateways
//!
//! All remote access goes through traits: [`gateway::DataGateway`] for the
//! hosted document store, [`gateway::auth::AuthGateway`] for the identity
//! service, and [`imgbb::ImageHost`] for image uploads. In-memory
//! implementations of all three live in [`gateway::memory`] and back the
//! test suite.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod imgbb;
pub mod pages;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod theme;

pub use config::AdminConfig;
pub use error::AppError;
pub use state::AppState;
