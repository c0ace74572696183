//! Core types for Storeroom.
//!
//! This module provides type-safe wrappers for the dashboard's domain concepts.

pub mod id;
pub mod page;
pub mod role;
pub mod user;
pub mod variant;

pub use id::*;
pub use page::Page;
pub use role::Role;
pub use user::StoreUser;
pub use variant::{InventoryCount, InventoryCountError, TrackingType, Variant};
