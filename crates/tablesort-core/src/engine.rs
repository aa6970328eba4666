use crate::columns;
use crate::config::SorterConfig;
use crate::controls::{self, SortControl};
use crate::dom::HostTree;
use crate::locate;
use crate::reorder::{reorder, ReorderOutcome};
use crate::state::{SortRegistry, SortState, TableId};
use crate::table;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

#[derive(Debug)]
struct Registration<N> {
    root: N,
    columns: Vec<N>,
    /// Header text captured before any control was added.
    labels: Vec<String>,
    controls: Vec<N>,
    last_reorder: Option<ReorderOutcome>,
}

/// Read-only view of a registered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSummary {
    pub id: TableId,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub columns: Vec<String>,
    pub data_rows: usize,
    pub state: SortState,
}

/// Sorting engine for the tables of one host tree.
///
/// Owns the sort registry and, per table, the header cells and the controls
/// currently rendered into them. Every mutating call takes the tree by
/// `&mut`, so activations on a document are serialized by construction.
#[derive(Debug)]
pub struct TableSorter<N> {
    config: SorterConfig,
    registry: SortRegistry,
    tables: BTreeMap<TableId, Registration<N>>,
    next_id: usize,
}

impl<N> TableSorter<N>
where
    N: Copy + Eq + Hash + fmt::Debug,
{
    pub fn new(config: SorterConfig) -> Self {
        TableSorter {
            config,
            registry: SortRegistry::new(),
            tables: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    pub fn registry(&self) -> &SortRegistry {
        &self.registry
    }

    /// Locate and register every sortable table of the document.
    ///
    /// A document without sortable tables is left untouched.
    pub fn init_document<T>(&mut self, tree: &mut T) -> Vec<TableId>
    where
        T: HostTree<Node = N>,
    {
        let ids: Vec<TableId> = locate::locate(tree)
            .into_iter()
            .filter_map(|root| self.initialize(tree, root))
            .collect();

        if !ids.is_empty() && self.config.inject_styles {
            controls::install_styles(tree, &self.config.controls);
        }

        log::info!("[engine] {} sortable table(s) registered", ids.len());
        ids
    }

    /// Register one table and render its unsorted controls.
    ///
    /// Returns `None` when the table has too few columns. Registering the
    /// same root twice returns the existing id.
    pub fn initialize<T>(&mut self, tree: &mut T, root: N) -> Option<TableId>
    where
        T: HostTree<Node = N>,
    {
        if let Some((id, _)) = self.tables.iter().find(|(_, r)| r.root == root) {
            return Some(*id);
        }

        let columns = columns::discover(tree, root, self.config.min_columns)?;
        let labels = columns
            .iter()
            .map(|c| tree.text_content(*c).trim().to_string())
            .collect();

        let id = TableId(self.next_id);
        self.next_id += 1;

        let state = *self.registry.get_or_create(id);
        let controls = controls::render(tree, id, &columns, state, &self.config.controls);

        log::debug!("[engine] {id}: {} column(s) at {:?}", columns.len(), root);
        self.tables.insert(
            id,
            Registration {
                root,
                columns,
                labels,
                controls,
                last_reorder: None,
            },
        );
        Some(id)
    }

    /// Activate a column: transition, restyle controls, reorder rows.
    ///
    /// Unknown tables and out-of-range columns have no effect.
    pub fn activate<T>(&mut self, tree: &mut T, table: TableId, column: usize) -> Option<SortState>
    where
        T: HostTree<Node = N>,
    {
        let Some(registration) = self.tables.get_mut(&table) else {
            log::debug!("[engine] activation for unregistered {table} ignored");
            return None;
        };
        if column >= registration.columns.len() {
            log::debug!(
                "[engine] {table}: column {column} out of range ({} column(s))",
                registration.columns.len()
            );
            return None;
        }

        let state = self.registry.get_or_create(table);
        *state = state.activate(column);
        let state = *state;

        controls::update(tree, &registration.controls, state, &self.config.controls);

        if let SortState::Sorted { column, direction } = state {
            registration.last_reorder = Some(reorder(tree, registration.root, column, direction));
        }

        log::info!("[engine] {table}: sorted by {state}");
        Some(state)
    }

    /// Single entry point for control activations.
    pub fn dispatch<T>(&mut self, tree: &mut T, control: SortControl) -> Option<SortState>
    where
        T: HostTree<Node = N>,
    {
        self.activate(tree, control.table, control.column)
    }

    /// Tear a table down: controls removed, registry entry dropped.
    pub fn remove<T>(&mut self, tree: &mut T, table: TableId) -> bool
    where
        T: HostTree<Node = N>,
    {
        let Some(mut registration) = self.tables.remove(&table) else {
            return false;
        };
        controls::clear(tree, &mut registration.controls);
        self.registry.remove(table);
        log::debug!("[engine] {table} removed");
        true
    }

    pub fn state(&self, table: TableId) -> Option<SortState> {
        self.registry.get(table)
    }

    pub fn table_ids(&self) -> Vec<TableId> {
        self.tables.keys().copied().collect()
    }

    pub fn root(&self, table: TableId) -> Option<N> {
        self.tables.get(&table).map(|r| r.root)
    }

    pub fn columns(&self, table: TableId) -> Option<&[N]> {
        self.tables.get(&table).map(|r| r.columns.as_slice())
    }

    /// Header labels as they read before controls were added.
    pub fn labels(&self, table: TableId) -> Option<&[String]> {
        self.tables.get(&table).map(|r| r.labels.as_slice())
    }

    pub fn last_reorder(&self, table: TableId) -> Option<ReorderOutcome> {
        self.tables.get(&table).and_then(|r| r.last_reorder)
    }

    pub fn summaries<T>(&self, tree: &T) -> Vec<TableSummary>
    where
        T: HostTree<Node = N>,
    {
        self.tables
            .iter()
            .map(|(id, registration)| {
                let body = table::body_region(tree, registration.root);
                let data_rows = table::rows(tree, body)
                    .into_iter()
                    .filter(|row| !table::is_header_row(tree, *row))
                    .count();
                TableSummary {
                    id: *id,
                    tag: tree.tag_name(registration.root).to_string(),
                    role: tree.attribute(registration.root, "role").map(str::to_string),
                    columns: registration.labels.clone(),
                    data_rows,
                    state: self.registry.get(*id).unwrap_or_default(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use crate::state::Direction;

    const PAGE: &str = "<html><head></head><body>\
        <table id=\"t\"><thead><tr><th>Name</th><th>Size</th></tr></thead>\
        <tbody><tr><td>b</td><td>3</td></tr><tr><td>a</td><td>1</td></tr><tr><td>c</td><td>2</td></tr></tbody></table>\
        <table id=\"single\"><tr><th>Only</th></tr><tr><td>1</td></tr></table>\
        </body></html>";

    fn setup() -> (Document, TableSorter<NodeId>, TableId) {
        let mut doc = Document::parse_html(PAGE).unwrap();
        let mut sorter = TableSorter::new(SorterConfig::default());
        let ids = sorter.init_document(&mut doc);
        assert_eq!(ids, vec![TableId(0)]);
        (doc, sorter, ids[0])
    }

    fn names(doc: &Document) -> Vec<String> {
        let tbody = doc.find_tag("tbody").unwrap();
        doc.children(tbody)
            .into_iter()
            .map(|row| doc.text_content(doc.children(row)[0]))
            .collect()
    }

    #[test]
    fn test_single_column_table_not_registered() {
        let (_, sorter, _) = setup();
        assert_eq!(sorter.table_ids().len(), 1);
        assert_eq!(sorter.registry().len(), 1);
    }

    #[test]
    fn test_initial_state_unset_with_controls() {
        let (doc, sorter, id) = setup();
        assert_eq!(sorter.state(id), Some(SortState::Unset));
        let buttons = doc.query_all(doc.root(), |d, n| d.is_tag(n, "button"));
        assert_eq!(buttons.len(), 2);
        assert_eq!(sorter.labels(id).unwrap(), ["Name", "Size"]);
    }

    #[test]
    fn test_activation_toggles_and_sorts() {
        let (mut doc, mut sorter, id) = setup();

        let state = sorter.activate(&mut doc, id, 1).unwrap();
        assert_eq!(
            state,
            SortState::Sorted {
                column: 1,
                direction: Direction::Ascending
            }
        );
        assert_eq!(names(&doc), vec!["b", "c", "a"]);

        sorter.activate(&mut doc, id, 1).unwrap();
        assert_eq!(names(&doc), vec!["a", "c", "b"]);

        let state = sorter.activate(&mut doc, id, 0).unwrap();
        assert_eq!(
            state,
            SortState::Sorted {
                column: 0,
                direction: Direction::Ascending
            }
        );
        assert_eq!(names(&doc), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_controls_rerendered_not_duplicated() {
        let (mut doc, mut sorter, id) = setup();
        sorter.activate(&mut doc, id, 0);
        sorter.activate(&mut doc, id, 0);
        let buttons = doc.query_all(doc.root(), |d, n| d.is_tag(n, "button"));
        assert_eq!(buttons.len(), 2);
        let active: Vec<_> = buttons
            .iter()
            .filter(|b| doc.attribute(**b, "class") == Some("sort-button active"))
            .collect();
        assert_eq!(active.len(), 1);
    }

    #[test]
    fn test_repeated_activations_do_not_grow_document() {
        let (mut doc, mut sorter, id) = setup();
        sorter.activate(&mut doc, id, 0);
        let allocated = doc.node_count();
        for column in [0, 1, 1, 0, 1, 0, 0, 1] {
            sorter.activate(&mut doc, id, column);
        }
        assert_eq!(doc.node_count(), allocated);
    }

    #[test]
    fn test_dispatch_from_control_element() {
        let (mut doc, mut sorter, id) = setup();
        let buttons = doc.query_all(doc.root(), |d, n| d.is_tag(n, "button"));
        let control = SortControl::from_element(&doc, buttons[1]).unwrap();
        assert_eq!(control, SortControl { table: id, column: 1 });
        assert!(sorter.dispatch(&mut doc, control).is_some());
        assert_eq!(sorter.last_reorder(id).unwrap().sorted, 3);
    }

    #[test]
    fn test_invalid_activation_is_noop() {
        let (mut doc, mut sorter, id) = setup();
        let before = doc.to_html();
        assert!(sorter.activate(&mut doc, id, 5).is_none());
        assert!(sorter.activate(&mut doc, TableId(9), 0).is_none());
        assert_eq!(doc.to_html(), before);
        assert_eq!(sorter.state(id), Some(SortState::Unset));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (mut doc, mut sorter, id) = setup();
        let root = sorter.root(id).unwrap();
        assert_eq!(sorter.initialize(&mut doc, root), Some(id));
        assert_eq!(sorter.table_ids().len(), 1);
    }

    #[test]
    fn test_remove_tears_down() {
        let (mut doc, mut sorter, id) = setup();
        assert!(sorter.remove(&mut doc, id));
        assert!(!sorter.remove(&mut doc, id));
        assert!(sorter.registry().is_empty());
        assert!(doc.query_all(doc.root(), |d, n| d.is_tag(n, "button")).is_empty());
        assert!(sorter.activate(&mut doc, id, 0).is_none());
    }

    #[test]
    fn test_styles_installed_with_tables() {
        let (doc, _, _) = setup();
        let head = doc.find_tag("head").unwrap();
        assert_eq!(doc.children(head).len(), 1);
    }

    #[test]
    fn test_no_tables_no_mutation() {
        let html = "<html><head></head><body><p>1</p></body></html>";
        let mut doc = Document::parse_html(html).unwrap();
        let mut sorter = TableSorter::new(SorterConfig::default());
        assert!(sorter.init_document(&mut doc).is_empty());
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_summaries() {
        let (mut doc, mut sorter, id) = setup();
        sorter.activate(&mut doc, id, 0);
        let summaries = sorter.summaries(&doc);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].tag, "table");
        assert_eq!(summaries[0].columns, vec!["Name", "Size"]);
        assert_eq!(summaries[0].data_rows, 3);
        assert_eq!(summaries[0].state.sorted_column(), Some(0));
    }
}
