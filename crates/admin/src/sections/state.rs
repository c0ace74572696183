//! Section state machine.

use std::sync::Arc;

use storeroom_core::{Page, Role};

use crate::backend::Permissions;
use crate::fetch::{FetchError, FetchState};

/// What a list section shows for the current request.
#[derive(Debug)]
pub enum SectionState<R> {
    /// No session token. Terminal until a token is supplied.
    Unauthenticated,
    /// Permissions or the page are not available yet.
    Loading,
    /// Permissions or the page failed; no partial data is shown.
    Failed(FetchError),
    /// An unfiltered listing came back empty.
    Empty,
    /// Rows to render.
    Ready(Resolved<R>),
}

/// Data of a ready section.
#[derive(Debug)]
pub struct Resolved<R> {
    /// Role of the acting user.
    pub actor: Role,
    pub page: Arc<Page<R>>,
}

impl<R> SectionState<R> {
    /// Combine the permissions and page fetch states of one section.
    ///
    /// Loading wins over failure so a section never flashes an error for a
    /// key that is still being fetched. A filtered search with no results is
    /// a normal empty table, not an anomaly.
    #[must_use]
    pub fn resolve(
        permissions: &FetchState<Permissions>,
        page: &FetchState<Page<R>>,
        filtered: bool,
    ) -> Self {
        if matches!(permissions, FetchState::Idle) || matches!(page, FetchState::Idle) {
            return Self::Unauthenticated;
        }
        if permissions.is_loading() || page.is_loading() {
            return Self::Loading;
        }
        if let Some(e) = permissions.error().or_else(|| page.error()) {
            return Self::Failed(e.clone());
        }

        match (permissions.data(), page.data()) {
            (Some(permissions), Some(page)) => {
                if page.is_empty() && !filtered {
                    Self::Empty
                } else {
                    Self::Ready(Resolved {
                        actor: permissions.role,
                        page: Arc::clone(page),
                    })
                }
            }
            _ => Self::Loading,
        }
    }

    /// Whether the section should render a loading indicator.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
