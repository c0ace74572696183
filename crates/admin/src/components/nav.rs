//! Page shell: navigation chrome and the SDK script tag.

use crate::middleware::SessionToken;
use crate::sdk::{SdkBootstrap, SdkScript};

/// Navigation entries in display order (label, path).
pub const NAV_ITEMS: [(&str, &str); 4] = [
    ("Getting Started", "/"),
    ("Inventory", "/inventory"),
    ("Users", "/users"),
    ("Help", "/help"),
];

/// A navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    /// Carries the session token.
    pub href: String,
    pub active: bool,
}

/// Data every full page needs.
#[derive(Debug, Clone)]
pub struct ShellView {
    pub title: &'static str,
    pub nav: Vec<NavItem>,
    /// Present only for authenticated sessions.
    pub sdk: Option<SdkScript>,
}

impl ShellView {
    #[must_use]
    pub fn new(
        sdk: &SdkBootstrap,
        session: &SessionToken,
        current_path: &str,
        title: &'static str,
    ) -> Self {
        let nav = NAV_ITEMS
            .iter()
            .map(|&(label, path)| NavItem {
                label,
                href: session.href(path, &[]),
                active: path == current_path,
            })
            .collect();

        Self {
            title,
            nav,
            sdk: sdk.script_for(session),
        }
    }
}
