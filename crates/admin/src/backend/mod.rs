//! REST backend client.
//!
//! # Architecture
//!
//! - The backend owns every value shown in the dashboard; this client is a
//!   thin JSON layer over its five endpoints
//! - Every request is scoped by the opaque `context` query token, no other
//!   credentials are sent
//! - Non-2xx responses carry a JSON body `{ "message": ... }`, surfaced as
//!   [`BackendError::Api`]
//!
//! # Endpoints
//!
//! ```text
//! GET /api/users/role?context=            -> { role }
//! GET /api/users?context=&page=&limit=&search=
//! PUT /api/users?context=                 { userId, role }
//! GET /api/variants?context=&page=&limit=&like=
//! PUT /api/variants?context=              { variantId, productId, trackingType, inventoryCount }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use storeroom_admin::backend::BackendClient;
//!
//! let client = BackendClient::new(&config.backend)?;
//! let page = client.list_variants("ctx-token", 1, 50, "shirt").await?;
//! ```

pub mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use storeroom_core::{Page, Role, StoreUser, UserId, Variant};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::BackendConfig;

const PERMISSIONS_PATH: &str = "api/users/role";
const USERS_PATH: &str = "api/users";
const VARIANTS_PATH: &str = "api/variants";

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Success response body did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// HTTP status reported by the backend, if it answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Parse(_) | Self::InvalidUrl(_) => None,
        }
    }
}

/// Client for the REST backend.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        // Relative API paths are joined onto the base, so it must end in '/'
        let mut base_url = config.api_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client: builder.build()?,
                base_url,
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch the role of the acting user.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx response.
    #[instrument(skip(self, context))]
    pub async fn get_permissions(&self, context: &str) -> Result<Permissions, BackendError> {
        let url = self.endpoint(PERMISSIONS_PATH, &[("context", context)])?;
        self.get(url).await
    }

    /// Fetch one page of store users, filtered by free-text `search`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, a non-2xx response or a
    /// malformed body.
    #[instrument(skip(self, context))]
    pub async fn list_users(
        &self,
        context: &str,
        page: u32,
        limit: u32,
        search: &str,
    ) -> Result<Page<StoreUser>, BackendError> {
        let (page_param, limit_param) = (page.to_string(), limit.to_string());
        let url = self.endpoint(
            USERS_PATH,
            &[
                ("context", context),
                ("page", page_param.as_str()),
                ("limit", limit_param.as_str()),
                ("search", search),
            ],
        )?;
        let response: UsersResponse = self.get(url).await?;
        Ok(response.into_page(limit))
    }

    /// Fetch one page of variants, filtered by a "like" match on SKU or name.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, a non-2xx response or a
    /// malformed body.
    #[instrument(skip(self, context))]
    pub async fn list_variants(
        &self,
        context: &str,
        page: u32,
        limit: u32,
        like: &str,
    ) -> Result<Page<Variant>, BackendError> {
        let (page_param, limit_param) = (page.to_string(), limit.to_string());
        let url = self.endpoint(
            VARIANTS_PATH,
            &[
                ("context", context),
                ("page", page_param.as_str()),
                ("limit", limit_param.as_str()),
                ("like", like),
            ],
        )?;
        let response: VariantsResponse = self.get(url).await?;
        Ok(response.into_page())
    }

    /// Change a store user's role.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx response.
    #[instrument(skip(self, context))]
    pub async fn update_user_role(
        &self,
        context: &str,
        user_id: UserId,
        role: Role,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(USERS_PATH, &[("context", context)])?;
        self.write(Method::PUT, url, &UpdateUserRoleRequest { user_id, role })
            .await
    }

    /// Update a variant's inventory count and, optionally, its tracking type.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure or a non-2xx response.
    #[instrument(skip(self, context))]
    pub async fn update_variant(
        &self,
        context: &str,
        request: &UpdateVariantRequest,
    ) -> Result<(), BackendError> {
        let url = self.endpoint(VARIANTS_PATH, &[("context", context)])?;
        self.write(Method::PUT, url, request).await
    }

    /// Build an endpoint URL with percent-encoded query parameters.
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.join(path)?;
        url.query_pairs_mut().extend_pairs(params.iter().copied());
        Ok(url)
    }

    /// Execute a GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a JSON write. The success body is ignored (it may be empty).
    async fn write<B: Serialize + Sync>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .request(method, url)
            .json(body)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        if response.status().is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|e| {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse backend response"
                );
                BackendError::Parse(e.to_string())
            });
        }

        Err(Self::parse_error(response).await)
    }

    /// Turn a non-success response into `BackendError::Api`.
    async fn parse_error(response: reqwest::Response) -> BackendError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        BackendError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        }
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Message from an error body, falling back to the status reason phrase.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(ToString::to_string))
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(&BackendConfig {
            api_url: Url::parse(base).unwrap(),
            timeout: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_encodes_query() {
        let client = client("http://localhost:8080");
        let url = client
            .endpoint(
                VARIANTS_PATH,
                &[("context", "stores/abc"), ("like", "red & blue")],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/variants?context=stores%2Fabc&like=red+%26+blue"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client = client("http://backend.internal/app");
        let url = client
            .endpoint(PERMISSIONS_PATH, &[("context", "c")])
            .unwrap();
        assert_eq!(url.as_str(), "http://backend.internal/app/api/users/role?context=c");
    }

    #[test]
    fn test_error_message_from_json_body() {
        let message = error_message(StatusCode::FORBIDDEN, r#"{"message":"Not allowed"}"#);
        assert_eq!(message, "Not allowed");
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Internal Server Error"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, r#"{"message":""}"#),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_backend_error_status() {
        let err = BackendError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "API error: 500 - boom");
        assert_eq!(BackendError::Parse("x".to_string()).status(), None);
    }
}
