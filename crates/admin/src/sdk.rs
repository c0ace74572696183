//! Embedding SDK bootstrap.
//!
//! The host control panel expects embedded apps to load its JS SDK so that
//! logout and navigation events reach the app. The script is only useful for
//! authenticated sessions, so it is injected into full-page renders when a
//! token is present and never into htmx fragments. The script id keeps a
//! browser from loading it twice.

use crate::middleware::SessionToken;

/// DOM id of the injected script tag, also used as the client-side guard.
pub const SDK_SCRIPT_ID: &str = "bc-sdk-js";

/// Where the SDK script is loaded from.
#[derive(Debug)]
pub struct SdkBootstrap {
    script_url: String,
}

/// Script tag data for the page layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkScript {
    pub id: &'static str,
    pub src: String,
}

impl SdkBootstrap {
    #[must_use]
    pub const fn new(script_url: String) -> Self {
        Self { script_url }
    }

    /// Script to inject into a full page, `None` for unauthenticated pages.
    #[must_use]
    pub fn script_for(&self, token: &SessionToken) -> Option<SdkScript> {
        (!token.is_empty()).then(|| SdkScript {
            id: SDK_SCRIPT_ID,
            src: self.script_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bootstrap() -> SdkBootstrap {
        SdkBootstrap::new("https://cdn.example.com/sdk.js".to_string())
    }

    #[test]
    fn test_script_only_for_sessions() {
        let sdk = bootstrap();
        assert!(sdk.script_for(&SessionToken::empty()).is_none());
        let script = sdk.script_for(&SessionToken::new("ctx"));
        assert_eq!(
            script,
            Some(SdkScript {
                id: SDK_SCRIPT_ID,
                src: "https://cdn.example.com/sdk.js".to_string(),
            })
        );
    }
}
