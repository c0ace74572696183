//! Users section: store users with inline role editing.

use serde::Deserialize;
use storeroom_core::{Page, Role, StoreUser};

use super::{ListQuery, PaginationView, SearchView, USERS_PAGE_SIZES};
use crate::components::data_table::{DataTableConfig, HeaderCell, TableColumn};
use crate::edit::RoleCellView;
use crate::middleware::SessionToken;

pub const PAGE_PATH: &str = "/users";
pub const SECTION_PATH: &str = "/users/section";
pub const FILTER_PARAM: &str = "search";
pub const SECTION_ID: &str = "users-section";

pub const FAILED_MESSAGE: &str =
    "There was an error loading the users data. Please try again or reload the app.";
pub const EMPTY_MESSAGE: &str =
    "There are no users to display. This indicates a problem, please try reloading the app.";

/// Query parameters of the users page and fragment.
#[derive(Debug, Default, Deserialize)]
pub struct UsersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl UsersParams {
    #[must_use]
    pub fn into_query(self) -> ListQuery {
        ListQuery::from_params(&USERS_PAGE_SIZES, self.page, self.limit, self.search)
    }
}

/// Link to the users page or fragment for a query.
#[must_use]
pub fn href(path: &str, session: &SessionToken, query: &ListQuery) -> String {
    let (page, limit) = query.page_params();
    let mut params = vec![("page", page.as_str()), ("limit", limit.as_str())];
    if query.is_filtered() {
        params.push((FILTER_PARAM, query.filter.as_str()));
    }
    session.href(path, &params)
}

/// Whether the role of a row may be changed by `actor`.
///
/// The owner's role is fixed, and viewers cannot change anyone's role.
#[must_use]
pub const fn role_selectable(row: Role, actor: Role) -> bool {
    !matches!(row, Role::Owner) && !actor.is_read_only()
}

/// Last login as shown in the table, empty when the timestamp is invalid.
#[must_use]
pub fn format_last_login(user: &StoreUser) -> String {
    user.last_login()
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default()
}

/// One table row.
#[derive(Debug, Clone)]
pub struct UserRowView {
    pub email: String,
    pub role_cell: RoleCellView,
    pub last_login: String,
}

/// Ready users table.
#[derive(Debug, Clone)]
pub struct UsersTableView {
    pub search: SearchView,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<UserRowView>,
    pub pagination: PaginationView,
    pub empty_title: String,
    pub column_count: usize,
}

/// Column layout of the users table.
#[must_use]
pub fn table_config() -> DataTableConfig {
    DataTableConfig::new(SECTION_ID)
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("role", "Role"))
        .column(TableColumn::new("lastLogin", "Last Login"))
        .search_placeholder("Search by email")
        .empty_state("No users match your search")
}

impl UsersTableView {
    #[must_use]
    pub fn build(
        session: &SessionToken,
        actor: Role,
        page: &Page<StoreUser>,
        query: &ListQuery,
    ) -> Self {
        let config = table_config();
        let rows = page
            .items
            .iter()
            .map(|user| UserRowView {
                email: user.email.clone(),
                role_cell: RoleCellView::new(session, user.user_id, user.role, user.role, actor),
                last_login: format_last_login(user),
            })
            .collect();

        Self {
            search: SearchView::new(
                session,
                SECTION_PATH,
                FILTER_PARAM,
                &config.search_placeholder,
                query,
            ),
            headers: HeaderCell::plain(&config),
            rows,
            pagination: PaginationView::build(page, query, &USERS_PAGE_SIZES, |q| {
                href(SECTION_PATH, session, q)
            }),
            empty_title: config.empty_title.clone(),
            column_count: config.column_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use storeroom_core::UserId;

    use super::*;

    fn user(id: i64, role: Role) -> StoreUser {
        StoreUser {
            user_id: UserId::new(id),
            email: format!("user{id}@example.com"),
            role,
            last_login_epoch_seconds: 1_700_000_000,
        }
    }

    #[test]
    fn test_role_gating() {
        assert!(role_selectable(Role::Viewer, Role::Admin));
        assert!(role_selectable(Role::Admin, Role::Owner));
        assert!(!role_selectable(Role::Owner, Role::Admin));
        assert!(!role_selectable(Role::Admin, Role::Viewer));
    }

    #[test]
    fn test_params_default_page_size() {
        let query = UsersParams::default().into_query();
        assert_eq!(query.limit, 10);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_href_uses_search_param() {
        let query = ListQuery::new(&USERS_PAGE_SIZES).with_filter("ann");
        assert_eq!(
            href(SECTION_PATH, &SessionToken::new("ctx"), &query),
            "/users/section?context=ctx&page=1&limit=10&search=ann"
        );
    }

    #[test]
    fn test_format_last_login() {
        assert_eq!(format_last_login(&user(1, Role::Admin)), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_table_rows_gate_role_cells() {
        let page = Page {
            items: vec![user(1, Role::Owner), user(2, Role::Viewer)],
            current_page: 1,
            total_pages: 3,
            total_items: 25,
            items_per_page: 10,
        };
        let query = ListQuery::new(&USERS_PAGE_SIZES);
        let table = UsersTableView::build(&SessionToken::new("ctx"), Role::Admin, &page, &query);

        assert!(table.rows[0].role_cell.disabled);
        assert!(!table.rows[1].role_cell.disabled);
        assert!(table.pagination.visible);
        assert_eq!(table.headers.len(), 3);
    }
}
