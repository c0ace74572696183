//! Static content pages.

use askama::Template;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse},
};

use super::render;
use crate::components::ShellView;
use crate::middleware::Session;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/getting_started.html")]
pub struct GettingStartedTemplate {
    pub shell: ShellView,
}

#[derive(Template)]
#[template(path = "pages/help.html")]
pub struct HelpTemplate {
    pub shell: ShellView,
}

#[derive(Template)]
#[template(path = "pages/not_found.html")]
pub struct NotFoundTemplate {
    pub shell: ShellView,
}

/// Getting Started page.
pub async fn getting_started(
    State(state): State<AppState>,
    Session(session): Session,
) -> Html<String> {
    render(&GettingStartedTemplate {
        shell: ShellView::new(state.sdk(), &session, "/", "Getting Started"),
    })
}

/// Help page.
pub async fn help(State(state): State<AppState>, Session(session): Session) -> Html<String> {
    render(&HelpTemplate {
        shell: ShellView::new(state.sdk(), &session, "/help", "Help"),
    })
}

/// Fallback for unknown paths.
pub async fn not_found(
    State(state): State<AppState>,
    Session(session): Session,
    uri: Uri,
) -> impl IntoResponse {
    tracing::debug!(path = %uri.path(), "No route");
    (
        StatusCode::NOT_FOUND,
        render(&NotFoundTemplate {
            shell: ShellView::new(state.sdk(), &session, uri.path(), "Not Found"),
        }),
    )
}
