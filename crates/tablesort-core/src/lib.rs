pub mod columns;
pub mod config;
pub mod controls;
pub mod dom;
pub mod engine;
pub mod error;
pub mod locate;
pub mod reorder;
pub mod state;
pub mod table;
pub mod value;

use config::SorterConfig;
use dom::Document;
use engine::{TableSorter, TableSummary};
use error::TableSortError;
use reorder::ReorderOutcome;
use serde::Serialize;
use state::{SortState, TableId};

pub use controls::SortControl;
pub use state::Direction;
pub use value::{classify, Value};

/// Sortable tables of an HTML document, plus how many candidates were seen.
#[derive(Debug, Clone, Serialize)]
pub struct TableListing {
    pub candidates: usize,
    pub tables: Vec<TableSummary>,
}

/// Result of sorting one table of an HTML document.
#[derive(Debug, Clone, Serialize)]
pub struct SortedDocument {
    pub table: TableId,
    pub state: SortState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder: Option<ReorderOutcome>,
    #[serde(skip)]
    pub html: String,
}

/// Options for [`sort_html`].
#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    /// Leave the rendered controls and style sheet in the output.
    pub keep_controls: bool,
}

/// List the sortable tables of an HTML document.
pub fn list_tables(html: &str, config: &SorterConfig) -> Result<TableListing, TableSortError> {
    let mut doc = Document::parse_html(html)?;
    let candidates = locate::candidates(&doc).len();
    let mut sorter = TableSorter::new(config.clone());
    sorter.init_document(&mut doc);

    Ok(TableListing {
        candidates,
        tables: sorter.summaries(&doc),
    })
}

/// Main API entry point: apply column activations to one table of an HTML
/// document and return the rewritten document.
///
/// Activations run in order through the same state machine a page would use,
/// so `[1, 1]` sorts column 1 twice (toggling direction).
pub fn sort_html(
    html: &str,
    table: TableId,
    activations: &[usize],
    config: &SorterConfig,
    options: &SortOptions,
) -> Result<SortedDocument, TableSortError> {
    let mut doc = Document::parse_html(html)?;
    let mut sorter = TableSorter::new(config.clone());
    sorter.init_document(&mut doc);

    let columns = sorter
        .columns(table)
        .map(<[_]>::len)
        .ok_or_else(|| TableSortError::TableNotFound(table.to_string()))?;

    for &column in activations {
        if column >= columns {
            return Err(TableSortError::ColumnOutOfRange {
                table: table.to_string(),
                column,
                columns,
            });
        }
        sorter.activate(&mut doc, table, column);
    }

    if !options.keep_controls {
        controls::strip(&mut doc);
    }

    Ok(SortedDocument {
        table,
        state: sorter.state(table).unwrap_or_default(),
        reorder: sorter.last_reorder(table),
        html: doc.to_html(),
    })
}

/// Classify the visible text of every data cell in one column.
pub fn column_values(
    html: &str,
    table: TableId,
    column: usize,
    config: &SorterConfig,
) -> Result<Vec<Value>, TableSortError> {
    let mut doc = Document::parse_html(html)?;
    let mut sorter = TableSorter::new(config.clone());
    sorter.init_document(&mut doc);

    let root = sorter
        .root(table)
        .ok_or_else(|| TableSortError::TableNotFound(table.to_string()))?;
    let body = crate::table::body_region(&doc, root);

    Ok(crate::table::rows(&doc, body)
        .into_iter()
        .filter(|row| !crate::table::is_header_row(&doc, *row))
        .filter_map(|row| crate::table::data_cells(&doc, row).get(column).copied())
        .map(|cell| classify(&crate::table::cell_text(&doc, cell)))
        .collect())
}
