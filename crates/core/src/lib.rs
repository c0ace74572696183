//! Storeroom Core - Shared types library.
//!
//! This crate provides the domain types used across Storeroom components:
//! - `admin` - The store dashboard (inventory and user management)
//! - `integration-tests` - The mock backend and end-to-end tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Entities
//! here are read views of server-owned data; the REST backend is the
//! authority for every value.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, roles, variants, store users and the page envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
