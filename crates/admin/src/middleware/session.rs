//! Session token extraction.
//!
//! The token is read from the `context` query parameter on every request and
//! is never stored server-side. An empty token means "unauthenticated"; the
//! sections render that as an inline error instead of rejecting the request.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::{ExposeSecret, SecretString};
use url::form_urlencoded;

use crate::state::AppState;

/// Query parameter carrying the session token.
pub const CONTEXT_PARAM: &str = "context";

/// Opaque session token issued by the host platform.
///
/// Held as a secret so it never shows up in `Debug` output or traces.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The unauthenticated token.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Read the token from a raw query string (`a=1&context=...`).
    #[must_use]
    pub fn from_query(query: Option<&str>) -> Self {
        query
            .and_then(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .find(|(key, _)| key == CONTEXT_PARAM)
                    .map(|(_, value)| value.into_owned())
            })
            .map_or_else(Self::empty, Self::new)
    }

    /// Whether no token was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    /// The raw token, for backend calls and cache keys.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Build a same-origin link that carries the token forward.
    ///
    /// ```rust
    /// # use storeroom_admin::middleware::SessionToken;
    /// let token = SessionToken::new("stores/abc");
    /// assert_eq!(
    ///     token.href("/inventory", &[("page", "2")]),
    ///     "/inventory?context=stores%2Fabc&page=2"
    /// );
    /// ```
    #[must_use]
    pub fn href(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if !self.is_empty() {
            query.append_pair(CONTEXT_PARAM, self.expose());
        }
        query.extend_pairs(params.iter().copied());
        let query = query.finish();

        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("SessionToken(<empty>)")
        } else {
            f.write_str("SessionToken([REDACTED])")
        }
    }
}

/// Extractor for the session token of the current request.
///
/// Never rejects: a missing token yields [`SessionToken::empty`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Session(session): Session) -> impl IntoResponse {
///     if session.is_empty() {
///         return "no session";
///     }
///     "ok"
/// }
/// ```
pub struct Session(pub SessionToken);

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(SessionToken::from_query(parts.uri.query())))
    }
}
