//! Store user roles.

use serde::{Deserialize, Serialize};

/// Role of a store user inside the app.
///
/// The owner is the store account holder and can never be reassigned from
/// the dashboard. New users start as viewers until an admin promotes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Can edit inventory and manage other users' roles.
    Admin,
    /// Read-only access.
    #[default]
    Viewer,
    /// Store owner. Shown, never assignable.
    Owner,
}

impl Role {
    /// Roles that can be picked in the role selector.
    pub const ASSIGNABLE: [Self; 2] = [Self::Admin, Self::Viewer];

    /// Wire value (`admin`, `viewer`, `owner`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
            Self::Owner => "owner",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Viewer => "Viewer",
            Self::Owner => "Owner",
        }
    }

    /// Whether this role may be set through the dashboard.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        matches!(self, Self::Admin | Self::Viewer)
    }

    /// Whether an actor with this role is restricted to reading.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Viewer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
