//! Inline role editor.
//!
//! A role change is sent immediately (not applied first). The cell shows
//! the new role once the backend accepts it and snaps back to the last
//! known-good role otherwise. Writes to one row are serialised: while a
//! write is in flight further edits of that row are turned away.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Deserialize;
use storeroom_core::{Role, UserId};

use crate::middleware::SessionToken;
use crate::sections::users::role_selectable;

/// One option of the role select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Template data for one role cell.
#[derive(Debug, Clone)]
pub struct RoleCellView {
    pub dom_id: String,
    pub user_id: UserId,
    /// Role shown in the select.
    pub role: Role,
    /// Role the cell reverts to when a write fails.
    pub original: Role,
    pub options: Vec<RoleOption>,
    /// Shown instead of a selection for non-assignable roles.
    pub placeholder: Option<&'static str>,
    pub disabled: bool,
    /// Write endpoint, carrying the session token.
    pub action: String,
}

impl RoleCellView {
    #[must_use]
    pub fn new(
        session: &SessionToken,
        user_id: UserId,
        role: Role,
        original: Role,
        actor: Role,
    ) -> Self {
        let options = Role::ASSIGNABLE
            .iter()
            .map(|&r| RoleOption {
                value: r.as_str(),
                label: r.label(),
                selected: r == role,
            })
            .collect();

        Self {
            dom_id: format!("role-cell-{user_id}"),
            user_id,
            role,
            original,
            options,
            placeholder: (!role.is_assignable()).then(|| role.label()),
            disabled: !role_selectable(original, actor),
            action: session.href(&format!("/users/{user_id}/role"), &[]),
        }
    }
}

/// Role select submission.
#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: Role,
    pub original: Role,
}

/// Result of a role write as the cell displays it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleUpdateOutcome {
    /// The backend accepted the new role.
    Applied(Role),
    /// The write failed or was turned away; the cell keeps its original.
    Reverted(Role),
}

impl RoleUpdateOutcome {
    /// Role the cell shows, which is also its new known-good role.
    #[must_use]
    pub const fn displayed(self) -> Role {
        match self {
            Self::Applied(role) | Self::Reverted(role) => role,
        }
    }
}

type RowKey = (String, UserId);

/// Rows with a role write in flight, per session.
#[derive(Debug, Default)]
pub struct RowWriteLocks {
    rows: Mutex<HashSet<RowKey>>,
}

impl RowWriteLocks {
    /// Claim a row for one write. `None` while another write holds it.
    #[must_use]
    pub fn try_acquire(
        self: &Arc<Self>,
        session: &SessionToken,
        user_id: UserId,
    ) -> Option<RowWriteGuard> {
        let key = (session.expose().to_string(), user_id);
        let mut rows = self.rows.lock().unwrap_or_else(PoisonError::into_inner);
        rows.insert(key.clone()).then(|| RowWriteGuard {
            locks: Arc::clone(self),
            key,
        })
    }
}

/// Releases its row when dropped.
#[derive(Debug)]
pub struct RowWriteGuard {
    locks: Arc<RowWriteLocks>,
    key: RowKey,
}

impl Drop for RowWriteGuard {
    fn drop(&mut self) {
        self.locks
            .rows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}
