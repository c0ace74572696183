//! Cache keys.

use crate::middleware::SessionToken;
use crate::sections::ListQuery;

/// Backend resource a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Permissions,
    Users,
    Variants,
}

/// Identity of one cached response.
///
/// Two keys are equal iff every component is equal; the session token is
/// part of the key so responses never leak across sessions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub resource: Resource,
    pub context: String,
    pub page: u32,
    pub limit: u32,
    pub filter: String,
}

impl FetchKey {
    /// Key for the acting user's permissions, `None` without a session.
    #[must_use]
    pub fn permissions(session: &SessionToken) -> Option<Self> {
        (!session.is_empty()).then(|| Self {
            resource: Resource::Permissions,
            context: session.expose().to_string(),
            page: 0,
            limit: 0,
            filter: String::new(),
        })
    }

    /// Key for one page of a list resource, `None` without a session.
    #[must_use]
    pub fn list(resource: Resource, session: &SessionToken, query: &ListQuery) -> Option<Self> {
        (!session.is_empty()).then(|| Self {
            resource,
            context: session.expose().to_string(),
            page: query.page,
            limit: query.limit,
            filter: query.filter.clone(),
        })
    }
}

impl std::fmt::Debug for FetchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchKey")
            .field("resource", &self.resource)
            .field("context", &"[REDACTED]")
            .field("page", &self.page)
            .field("limit", &self.limit)
            .field("filter", &self.filter)
            .finish()
    }
}
