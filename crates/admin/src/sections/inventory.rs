//! Inventory section: variants table with search, sort and pagination.

use std::cmp::Ordering;

use serde::Deserialize;
use storeroom_core::{Page, Role, Variant, VariantId};

use super::{ListQuery, PaginationView, SearchView, INVENTORY_PAGE_SIZES};
use crate::components::data_table::{DataTableConfig, HeaderCell, TableColumn};
use crate::middleware::SessionToken;

/// Full page route.
pub const PAGE_PATH: &str = "/inventory";

/// Fragment route.
pub const SECTION_PATH: &str = "/inventory/section";

/// Query parameter carrying the search text.
pub const FILTER_PARAM: &str = "like";

/// DOM id of the section root.
pub const SECTION_ID: &str = "inventory-section";

/// Event emitted after a successful variant write.
pub const UPDATED_EVENT: &str = "variants-updated";

pub const FAILED_MESSAGE: &str = concat!(
    "Failed to authorize the request for the variants data. ",
    "Please try reloading or reinstalling the app."
);
pub const EMPTY_MESSAGE: &str =
    "There are no variants to display. This indicates a problem, please try reloading the app.";

// =============================================================================
// Sorting
// =============================================================================

/// Sortable variant columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Sku,
    InventoryLevel,
}

impl SortColumn {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sku => "sku",
            Self::InventoryLevel => "inventory_level",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Client-side sort of the loaded page. Never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl VariantSort {
    /// Sort a header click on `column` switches to: flips the direction
    /// when `column` is already active, ascending otherwise.
    #[must_use]
    pub fn toggle(current: Option<Self>, column: SortColumn) -> Self {
        match current {
            Some(sort) if sort.column == column => Self {
                column,
                direction: sort.direction.flipped(),
            },
            _ => Self {
                column,
                direction: SortDirection::Asc,
            },
        }
    }
}

/// SKU collation: case-insensitive, lowercase first among equals.
fn compare_sku(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Sort a page of variants. Stable, so equal keys keep server order, and
/// idempotent for a fixed `sort`.
#[must_use]
pub fn sort_variants(rows: &[Variant], sort: VariantSort) -> Vec<Variant> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = match sort.column {
            SortColumn::InventoryLevel => a.inventory_level.cmp(&b.inventory_level),
            SortColumn::Sku => compare_sku(&a.sku, &b.sku),
        };
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    sorted
}

// =============================================================================
// Request parameters
// =============================================================================

/// Query parameters of the inventory page and fragment.
#[derive(Debug, Default, Deserialize)]
pub struct InventoryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub like: Option<String>,
    pub sort: Option<SortColumn>,
    pub dir: Option<SortDirection>,
}

impl InventoryParams {
    /// Split into the fetch query and the display sort.
    #[must_use]
    pub fn into_parts(self) -> (ListQuery, Option<VariantSort>) {
        let sort = self.sort.map(|column| VariantSort {
            column,
            direction: self.dir.unwrap_or_default(),
        });
        let query = ListQuery::from_params(&INVENTORY_PAGE_SIZES, self.page, self.limit, self.like);
        (query, sort)
    }
}

/// Link to the section fragment (or the full page) for a query and sort.
#[must_use]
pub fn href(
    path: &str,
    session: &SessionToken,
    query: &ListQuery,
    sort: Option<VariantSort>,
) -> String {
    let (page, limit) = query.page_params();
    let mut params = vec![("page", page.as_str()), ("limit", limit.as_str())];
    if query.is_filtered() {
        params.push((FILTER_PARAM, query.filter.as_str()));
    }
    if let Some(sort) = sort {
        params.push(("sort", sort.column.as_str()));
        params.push(("dir", sort.direction.as_str()));
    }
    session.href(path, &params)
}

/// Whether the acting user may open the variant editor.
#[must_use]
pub const fn can_edit_variant(actor: Role) -> bool {
    !actor.is_read_only()
}

/// Link that opens the edit modal with a snapshot of the row.
#[must_use]
pub fn edit_href(session: &SessionToken, variant: &Variant) -> String {
    let product_id = variant.product_id.to_string();
    let inventory = variant.inventory_level.to_string();
    session.href(
        &format!("/inventory/variants/{}/edit", variant.id),
        &[
            ("product_id", product_id.as_str()),
            ("sku", variant.sku.as_str()),
            ("tracking", variant.tracking_type.as_str()),
            ("inventory", inventory.as_str()),
        ],
    )
}

// =============================================================================
// Views
// =============================================================================

/// One table row.
#[derive(Debug, Clone)]
pub struct VariantRowView {
    pub id: VariantId,
    pub product_name: String,
    pub tracking: &'static str,
    pub sku: String,
    pub inventory_level: u32,
    pub edit_href: String,
    pub can_edit: bool,
}

/// Ready inventory table.
#[derive(Debug, Clone)]
pub struct InventoryTableView {
    pub search: SearchView,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<VariantRowView>,
    pub pagination: PaginationView,
    pub empty_title: String,
    pub column_count: usize,
}

/// Column layout of the variants table.
#[must_use]
pub fn table_config() -> DataTableConfig {
    DataTableConfig::new(SECTION_ID)
        .column(TableColumn::new("product_name", "Product Name"))
        .column(TableColumn::new("inventory_tracking", "Tracking Type"))
        .column(TableColumn::sortable(SortColumn::Sku.as_str(), "SKU"))
        .column(TableColumn::sortable(
            SortColumn::InventoryLevel.as_str(),
            "Inventory Count",
        ))
        .column(TableColumn::new("action", "Action").hidden_header())
        .search_placeholder("Search by SKU or product name")
        .empty_state("No results!")
}

impl InventoryTableView {
    /// Build the table for a ready page.
    #[must_use]
    pub fn build(
        session: &SessionToken,
        actor: Role,
        page: &Page<Variant>,
        query: &ListQuery,
        sort: Option<VariantSort>,
    ) -> Self {
        let config = table_config();
        let can_edit = can_edit_variant(actor);

        let variants = match sort {
            Some(sort) => sort_variants(&page.items, sort),
            None => page.items.clone(),
        };
        let rows = variants
            .iter()
            .map(|v| VariantRowView {
                id: v.id,
                product_name: v.product_name.clone(),
                tracking: v.tracking_type.label(),
                sku: v.sku.clone(),
                inventory_level: v.inventory_level,
                edit_href: edit_href(session, v),
                can_edit,
            })
            .collect();

        let headers = config
            .columns
            .iter()
            .map(|column| {
                let column_sort = match column.key.as_str() {
                    "sku" => Some(SortColumn::Sku),
                    "inventory_level" => Some(SortColumn::InventoryLevel),
                    _ => None,
                };
                let active = column_sort
                    .zip(sort)
                    .filter(|(c, s)| *c == s.column)
                    .map(|(_, s)| s.direction);
                let toggle_href = column_sort.map(|c| {
                    href(
                        SECTION_PATH,
                        session,
                        query,
                        Some(VariantSort::toggle(sort, c)),
                    )
                });
                HeaderCell::new(column, toggle_href, active.map(SortDirection::as_str))
            })
            .collect();

        let mut search = SearchView::new(
            session,
            SECTION_PATH,
            FILTER_PARAM,
            &config.search_placeholder,
            query,
        );
        if let Some(sort) = sort {
            search = search
                .keep("sort", sort.column.as_str())
                .keep("dir", sort.direction.as_str());
        }

        Self {
            search,
            headers,
            rows,
            pagination: PaginationView::build(page, query, &INVENTORY_PAGE_SIZES, |q| {
                href(SECTION_PATH, session, q, sort)
            }),
            empty_title: config.empty_title.clone(),
            column_count: config.column_count(),
        }
    }
}
