//! Integration tests for the LUXE admin dashboard.
//!
//! Every test in `tests/` runs the real dashboard services against the
//! in-memory gateways from `luxe_admin::gateway::memory`; no network or
//! hosted store is involved.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p luxe-admin-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
