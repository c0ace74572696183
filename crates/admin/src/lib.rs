//! Storeroom dashboard library.
//!
//! This crate provides the dashboard as a library, allowing it to be tested
//! and reused.
//!
//! # Architecture
//!
//! - Axum web framework, askama templates, htmx fragments
//! - REST backend reached through [`backend::BackendClient`]
//! - Shared response cache ([`fetch::FetchCache`]) keyed by session and query
//!
//! # Sessions
//!
//! The host control panel embeds the dashboard with an opaque `context`
//! token in the query string. The token is the only credential; it is read
//! per request and never stored server-side.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod components;
pub mod config;
pub mod edit;
pub mod error;
pub mod fetch;
pub mod middleware;
pub mod routes;
pub mod sdk;
pub mod sections;
pub mod state;
