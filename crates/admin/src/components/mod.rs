//! Reusable view components.

pub mod data_table;
pub mod nav;

pub use data_table::{DataTableConfig, HeaderCell, TableColumn};
pub use nav::{NavItem, ShellView};
