//! List sections.
//!
//! Inventory and Users share one pattern: a search bar, a server-paginated
//! table and a section state machine resolved from two fetches
//! (permissions and the current page).
//!
//! # Rendering
//!
//! ```text
//! GET /inventory            page shell; section inline when cached,
//!                           else a placeholder that loads the fragment
//! GET /inventory/section    fragment; awaits both fetches, warms page N+1
//! ```
//!
//! Every link and form inside a section targets the fragment route and
//! replaces the section root, so only the section re-renders.

pub mod inventory;
pub mod pagination;
pub mod query;
pub mod state;
pub mod users;

pub use pagination::{PageLink, PaginationView, SizeLink};
pub use query::{
    INVENTORY_PAGE_SIZES, ListQuery, PageSizes, USERS_PAGE_SIZES, next_prefetch_page,
};
pub use state::{Resolved, SectionState};

use crate::middleware::SessionToken;
use crate::middleware::session::CONTEXT_PARAM;

/// Shown by every section without a session token.
pub const UNAUTHENTICATED_MESSAGE: &str =
    "Failed to authorize your session. Please try reloading the app.";

/// Inline error texts of one section.
#[derive(Debug, Clone, Copy)]
pub struct SectionMessages {
    pub failed: &'static str,
    pub empty: &'static str,
}

/// A hidden form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenField {
    pub name: &'static str,
    pub value: String,
}

/// Search bar of a section.
///
/// Submitting it requests page 1 of the fragment with the new filter; the
/// page size, the session token and any extra state ride along as hidden
/// fields.
#[derive(Debug, Clone)]
pub struct SearchView {
    pub action: &'static str,
    pub param: &'static str,
    pub placeholder: String,
    pub value: String,
    pub hidden: Vec<HiddenField>,
}

impl SearchView {
    #[must_use]
    pub fn new(
        session: &SessionToken,
        action: &'static str,
        param: &'static str,
        placeholder: &str,
        query: &ListQuery,
    ) -> Self {
        let mut hidden = Vec::new();
        if !session.is_empty() {
            hidden.push(HiddenField {
                name: CONTEXT_PARAM,
                value: session.expose().to_string(),
            });
        }
        hidden.push(HiddenField {
            name: "limit",
            value: query.limit.to_string(),
        });

        Self {
            action,
            param,
            placeholder: placeholder.to_string(),
            value: query.filter.clone(),
            hidden,
        }
    }

    /// Carry another parameter through a search.
    #[must_use]
    pub fn keep(mut self, name: &'static str, value: &str) -> Self {
        self.hidden.push(HiddenField {
            name,
            value: value.to_string(),
        });
        self
    }
}

/// Template data for a section root in any state.
#[derive(Debug)]
pub struct SectionView<T> {
    pub dom_id: &'static str,
    /// Fragment URL for the displayed query.
    pub refresh_href: String,
    /// Event that makes the section reload itself.
    pub refresh_on: Option<&'static str>,
    pub loading: bool,
    pub error: Option<&'static str>,
    pub table: Option<T>,
}

impl<T> SectionView<T> {
    /// Map a resolved state to its view; `build` renders the ready table.
    #[must_use]
    pub fn from_state<R>(
        state: SectionState<R>,
        messages: SectionMessages,
        dom_id: &'static str,
        refresh_href: String,
        build: impl FnOnce(Resolved<R>) -> T,
    ) -> Self {
        let mut view = Self {
            dom_id,
            refresh_href,
            refresh_on: None,
            loading: false,
            error: None,
            table: None,
        };
        match state {
            SectionState::Unauthenticated => view.error = Some(UNAUTHENTICATED_MESSAGE),
            SectionState::Loading => view.loading = true,
            SectionState::Failed(_) => view.error = Some(messages.failed),
            SectionState::Empty => view.error = Some(messages.empty),
            SectionState::Ready(resolved) => view.table = Some(build(resolved)),
        }
        view
    }

    /// Reload the section whenever `event` fires on the page.
    #[must_use]
    pub const fn refresh_on(mut self, event: &'static str) -> Self {
        self.refresh_on = Some(event);
        self
    }
}
