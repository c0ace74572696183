//! Request extractors for the dashboard.
//!
//! The dashboard has no login of its own: the host control panel embeds it
//! with an opaque `context` token in the query string, and every request
//! (pages, fragments, form posts) carries that token forward.
//!
//! # Layer Order (outermost first, see `main.rs`)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. `Session` extractor (per handler)

pub mod session;

pub use session::{Session, SessionToken};
