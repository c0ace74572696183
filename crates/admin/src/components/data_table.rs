//! Data table component types.
//!
//! These types define the column layout shared by the list sections and the
//! header cells rendered for it.

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is sortable.
    pub sortable: bool,
    /// Whether the header label is visually hidden.
    pub hide_header: bool,
}

impl TableColumn {
    /// Create a new sortable column.
    #[must_use]
    pub fn sortable(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: true,
            hide_header: false,
        }
    }

    /// Create a new non-sortable column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            sortable: false,
            hide_header: false,
        }
    }

    /// Keep the label for screen readers only.
    #[must_use]
    pub const fn hidden_header(mut self) -> Self {
        self.hide_header = true;
        self
    }
}

/// Rendered header cell.
#[derive(Debug, Clone)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub hidden: bool,
    /// Sort toggle link, `None` for non-sortable columns.
    pub href: Option<String>,
    /// Direction (`asc`/`desc`) when this column is the active sort.
    pub active: Option<&'static str>,
}

impl HeaderCell {
    #[must_use]
    pub fn new(column: &TableColumn, href: Option<String>, active: Option<&'static str>) -> Self {
        Self {
            key: column.key.clone(),
            label: column.label.clone(),
            hidden: column.hide_header,
            href: href.filter(|_| column.sortable),
            active,
        }
    }

    /// Header cells for a table without sorting.
    #[must_use]
    pub fn plain(config: &DataTableConfig) -> Vec<Self> {
        config
            .columns
            .iter()
            .map(|column| Self::new(column, None, None))
            .collect()
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Title for a filtered search without results.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            search_placeholder: "Search...".to_string(),
            empty_title: "No items found".to_string(),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state title.
    #[must_use]
    pub fn empty_state(mut self, title: &str) -> Self {
        self.empty_title = title.to_string();
        self
    }

    /// Number of columns, for full-width cells.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
