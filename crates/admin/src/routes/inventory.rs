//! Inventory route handlers.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use storeroom_core::{Variant, VariantId};
use tracing::instrument;

use super::render;
use crate::components::ShellView;
use crate::edit::{
    ModalView, SAVE_FAILED_MESSAGE, SaveAction, VariantDraft, VariantForm, VariantSnapshot,
    save_action,
};
use crate::error::AppError;
use crate::middleware::{Session, SessionToken};
use crate::sections::inventory::{
    EMPTY_MESSAGE, FAILED_MESSAGE, InventoryParams, InventoryTableView, PAGE_PATH, SECTION_ID,
    SECTION_PATH, UPDATED_EVENT, VariantSort, href,
};
use crate::sections::{
    ListQuery, SectionMessages, SectionState, SectionView, UNAUTHENTICATED_MESSAGE,
    next_prefetch_page,
};
use crate::state::AppState;

const MESSAGES: SectionMessages = SectionMessages {
    failed: FAILED_MESSAGE,
    empty: EMPTY_MESSAGE,
};

/// Inventory page template.
#[derive(Template)]
#[template(path = "inventory/index.html")]
pub struct InventoryPageTemplate {
    pub shell: ShellView,
    pub section: SectionView<InventoryTableView>,
}

/// Inventory section partial template (for HTMX updates).
#[derive(Template)]
#[template(path = "inventory/_section.html")]
pub struct InventorySectionTemplate {
    pub section: SectionView<InventoryTableView>,
}

/// Variant edit modal partial template.
#[derive(Template)]
#[template(path = "inventory/_modal.html")]
pub struct VariantModalTemplate {
    pub modal: ModalView,
}

fn section_view(
    session: &SessionToken,
    state: SectionState<Variant>,
    query: &ListQuery,
    sort: Option<VariantSort>,
) -> SectionView<InventoryTableView> {
    SectionView::from_state(
        state,
        MESSAGES,
        SECTION_ID,
        href(SECTION_PATH, session, query, sort),
        |ready| InventoryTableView::build(session, ready.actor, &ready.page, query, sort),
    )
    .refresh_on(UPDATED_EVENT)
}

/// Warm the next page of a ready section.
fn prefetch_next(
    state: &AppState,
    session: &SessionToken,
    query: &ListQuery,
    section: &SectionState<Variant>,
) {
    if let SectionState::Ready(ready) = section {
        if let Some(next) = next_prefetch_page(query.page, ready.page.total_pages) {
            state
                .cache()
                .prefetch_variants(session, query.clone().with_page(next));
        }
    }
}

/// Inventory page handler.
///
/// Renders the section inline when both fetches are cached, otherwise a
/// placeholder that loads the section fragment.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    Session(session): Session,
    Query(params): Query<InventoryParams>,
) -> Html<String> {
    let (query, sort) = params.into_parts();
    let cache = state.cache();
    let (permissions, page) = tokio::join!(
        cache.permissions_state(&session),
        cache.variants_state(&session, &query)
    );

    let resolved = SectionState::resolve(&permissions, &page, query.is_filtered());
    prefetch_next(&state, &session, &query, &resolved);

    render(&InventoryPageTemplate {
        shell: ShellView::new(state.sdk(), &session, PAGE_PATH, "Inventory"),
        section: section_view(&session, resolved, &query, sort),
    })
}

/// Inventory section fragment.
#[instrument(skip(state, session))]
pub async fn section(
    State(state): State<AppState>,
    Session(session): Session,
    Query(params): Query<InventoryParams>,
) -> Html<String> {
    let (query, sort) = params.into_parts();
    let cache = state.cache();
    let (permissions, page) = tokio::join!(
        cache.permissions(&session),
        cache.variants(&session, &query)
    );

    if let Some(e) = permissions.error().or_else(|| page.error()) {
        tracing::warn!(
            status = ?e.status(),
            error = %e,
            page = query.page,
            "Failed to load inventory section"
        );
    }

    let resolved = SectionState::resolve(&permissions, &page, query.is_filtered());
    prefetch_next(&state, &session, &query, &resolved);

    render(&InventorySectionTemplate {
        section: section_view(&session, resolved, &query, sort),
    })
}

/// Variant edit modal, opened with a snapshot of the row.
#[instrument(skip(session, snapshot))]
pub async fn edit(
    Session(session): Session,
    Path(id): Path<VariantId>,
    Query(snapshot): Query<VariantSnapshot>,
) -> Html<String> {
    let draft = VariantDraft::from_snapshot(&snapshot);
    render(&VariantModalTemplate {
        modal: ModalView::editing(&session, id, snapshot, draft, None),
    })
}

/// Save a variant draft (HTMX handler).
///
/// - No session: modal with the unauthenticated message, nothing is written
/// - Unchanged draft: empty body, the modal closes without a request
/// - Invalid count: modal with the validation message
/// - Success: empty body plus `HX-Trigger: variants-updated`
/// - Failure: modal with the draft kept and an inline error
///
/// The write runs in its own task so it completes even if the client goes
/// away; the cache is invalidated inside that task.
#[instrument(skip(state, session, form))]
pub async fn save(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<VariantId>,
    Form(form): Form<VariantForm>,
) -> Result<Response, AppError> {
    let (snapshot, draft) = form.into_parts();

    if session.is_empty() {
        tracing::info!(variant_id = %id, "Variant save without a session ignored");
        let modal = ModalView::editing(
            &session,
            id,
            snapshot,
            draft,
            Some(UNAUTHENTICATED_MESSAGE.to_string()),
        );
        return Ok(render(&VariantModalTemplate { modal }).into_response());
    }

    let request = match save_action(id, &snapshot, &draft) {
        Ok(SaveAction::Close) => return Ok(Html(String::new()).into_response()),
        Ok(SaveAction::Write(request)) => request,
        Err(e) => {
            let modal = ModalView::editing(&session, id, snapshot, draft, Some(e.to_string()));
            return Ok(render(&VariantModalTemplate { modal }).into_response());
        }
    };

    let write = {
        let state = state.clone();
        let session = session.clone();
        tokio::spawn(async move {
            let result = state
                .backend()
                .update_variant(session.expose(), &request)
                .await;
            if result.is_ok() {
                state.cache().invalidate_variants(&session).await;
            }
            result
        })
    };

    match write.await? {
        Ok(()) => {
            tracing::info!(
                variant_id = %id,
                inventory = %request.inventory_count,
                tracking_changed = request.tracking_type.is_some(),
                "Variant updated"
            );
            Ok(([("HX-Trigger", UPDATED_EVENT)], Html(String::new())).into_response())
        }
        Err(e) => {
            tracing::warn!(
                variant_id = %id,
                status = ?e.status(),
                error = %e,
                "Failed to update variant"
            );
            let modal = ModalView::editing(
                &session,
                id,
                snapshot,
                draft,
                Some(SAVE_FAILED_MESSAGE.to_string()),
            );
            Ok(render(&VariantModalTemplate { modal }).into_response())
        }
    }
}
