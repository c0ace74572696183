//! Users route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Html,
};
use storeroom_core::{Role, StoreUser, UserId};
use tracing::instrument;

use super::render;
use crate::components::ShellView;
use crate::edit::{RoleCellView, RoleForm, RoleUpdateOutcome};
use crate::error::AppError;
use crate::middleware::{Session, SessionToken};
use crate::sections::users::{
    EMPTY_MESSAGE, FAILED_MESSAGE, PAGE_PATH, SECTION_ID, SECTION_PATH, UsersParams,
    UsersTableView, href,
};
use crate::sections::{ListQuery, SectionMessages, SectionState, SectionView, next_prefetch_page};
use crate::state::AppState;

const MESSAGES: SectionMessages = SectionMessages {
    failed: FAILED_MESSAGE,
    empty: EMPTY_MESSAGE,
};

/// Users page template.
#[derive(Template)]
#[template(path = "users/index.html")]
pub struct UsersPageTemplate {
    pub shell: ShellView,
    pub section: SectionView<UsersTableView>,
}

/// Users section partial template (for HTMX updates).
#[derive(Template)]
#[template(path = "users/_section.html")]
pub struct UsersSectionTemplate {
    pub section: SectionView<UsersTableView>,
}

/// Role cell partial template.
#[derive(Template)]
#[template(path = "users/_role_cell.html")]
pub struct RoleCellTemplate {
    pub cell: RoleCellView,
}

fn section_view(
    session: &SessionToken,
    state: SectionState<StoreUser>,
    query: &ListQuery,
) -> SectionView<UsersTableView> {
    SectionView::from_state(
        state,
        MESSAGES,
        SECTION_ID,
        href(SECTION_PATH, session, query),
        |ready| UsersTableView::build(session, ready.actor, &ready.page, query),
    )
}

fn prefetch_next(
    state: &AppState,
    session: &SessionToken,
    query: &ListQuery,
    section: &SectionState<StoreUser>,
) {
    if let SectionState::Ready(ready) = section {
        if let Some(next) = next_prefetch_page(query.page, ready.page.total_pages) {
            state
                .cache()
                .prefetch_users(session, query.clone().with_page(next));
        }
    }
}

/// Users page handler.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    Session(session): Session,
    Query(params): Query<UsersParams>,
) -> Html<String> {
    let query = params.into_query();
    let cache = state.cache();
    let (permissions, page) = tokio::join!(
        cache.permissions_state(&session),
        cache.users_state(&session, &query)
    );

    let resolved = SectionState::resolve(&permissions, &page, query.is_filtered());
    prefetch_next(&state, &session, &query, &resolved);

    render(&UsersPageTemplate {
        shell: ShellView::new(state.sdk(), &session, PAGE_PATH, "Users"),
        section: section_view(&session, resolved, &query),
    })
}

/// Users section fragment.
#[instrument(skip(state, session))]
pub async fn section(
    State(state): State<AppState>,
    Session(session): Session,
    Query(params): Query<UsersParams>,
) -> Html<String> {
    let query = params.into_query();
    let cache = state.cache();
    let (permissions, page) = tokio::join!(
        cache.permissions(&session),
        cache.users(&session, &query)
    );

    if let Some(e) = permissions.error().or_else(|| page.error()) {
        tracing::warn!(
            status = ?e.status(),
            error = %e,
            page = query.page,
            "Failed to load users section"
        );
    }

    let resolved = SectionState::resolve(&permissions, &page, query.is_filtered());
    prefetch_next(&state, &session, &query, &resolved);

    render(&UsersSectionTemplate {
        section: section_view(&session, resolved, &query),
    })
}

/// Change a user's role (HTMX handler), returning the re-rendered cell.
///
/// The cell shows the new role on success. On failure, or while another
/// write to the same row is in flight, it shows the role it had before the
/// edit; the failure is only logged. Without a session nothing is written
/// and the cell comes back locked.
#[instrument(skip(state, session, form))]
pub async fn update_role(
    State(state): State<AppState>,
    Session(session): Session,
    Path(user_id): Path<UserId>,
    Form(form): Form<RoleForm>,
) -> Result<Html<String>, AppError> {
    if session.is_empty() {
        tracing::info!(user_id = %user_id, "Role change without a session ignored");
        return Ok(render(&RoleCellTemplate {
            cell: RoleCellView::new(&session, user_id, form.original, form.original, Role::Viewer),
        }));
    }

    if !form.role.is_assignable() {
        return Err(AppError::BadRequest(format!(
            "role {} cannot be assigned",
            form.role
        )));
    }

    let outcome = match state.role_writes().try_acquire(&session, user_id) {
        None => {
            tracing::info!(user_id = %user_id, "Role write already in flight for this user");
            RoleUpdateOutcome::Reverted(form.original)
        }
        Some(guard) => {
            let write = {
                let state = state.clone();
                let session = session.clone();
                let role = form.role;
                tokio::spawn(async move {
                    let _guard = guard;
                    let result = state
                        .backend()
                        .update_user_role(session.expose(), user_id, role)
                        .await;
                    if result.is_ok() {
                        state.cache().invalidate_users(&session).await;
                    }
                    result
                })
            };

            match write.await? {
                Ok(()) => {
                    tracing::info!(user_id = %user_id, role = %form.role, "User role updated");
                    RoleUpdateOutcome::Applied(form.role)
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %user_id,
                        role = %form.role,
                        status = ?e.status(),
                        error = %e,
                        "Failed to update user role"
                    );
                    RoleUpdateOutcome::Reverted(form.original)
                }
            }
        }
    };

    let actor = state
        .cache()
        .permissions(&session)
        .await
        .data()
        .map_or(Role::Viewer, |p| p.role);
    let role = outcome.displayed();

    Ok(render(&RoleCellTemplate {
        cell: RoleCellView::new(&session, user_id, role, role, actor),
    }))
}
