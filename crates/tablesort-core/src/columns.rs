use crate::dom::HostTree;
use crate::table::{body_region, is_class_header, is_header_cell, scoped_descendants};
use std::collections::HashSet;

/// Minimum number of header cells for a table to be sortable.
pub const MIN_COLUMNS: usize = 2;

/// Find the column header cells of a table, in encounter order.
///
/// Merges `thead th` cells, header cells of the body region and class-name
/// grid headers (`[class*="row"] [class*="head"]`). Returns `None` when fewer
/// than `min_columns` distinct cells turn up: the table is not sortable.
pub fn discover<T: HostTree>(tree: &T, table: T::Node, min_columns: usize) -> Option<Vec<T::Node>> {
    let body = body_region(tree, table);
    let in_table = scoped_descendants(tree, table);
    let in_body = scoped_descendants(tree, body);

    let head_cells = in_table
        .iter()
        .copied()
        .filter(|n| tree.is_tag(*n, "th") && tree.has_ancestor(*n, |t, a| t.is_tag(a, "thead")));
    let body_cells = in_body
        .iter()
        .copied()
        .filter(|n| is_header_cell(tree, *n));
    let grid_cells = in_body
        .iter()
        .copied()
        .filter(|n| is_class_header(tree, *n));

    let mut seen = HashSet::new();
    let columns: Vec<T::Node> = head_cells
        .chain(body_cells)
        .chain(grid_cells)
        .filter(|n| seen.insert(*n))
        .collect();

    if columns.len() < min_columns {
        log::debug!(
            "[columns] {:?}: {} header cell(s), not sortable",
            table,
            columns.len()
        );
        return None;
    }

    log::trace!("[columns] {:?}: {} column(s)", table, columns.len());
    Some(columns)
}
