use crate::dom::HostTree;
use crate::state::Direction;
use crate::table::{body_region, cell_text, data_cells, is_header_row, rows};
use crate::value::{classify, compare, Value};
use serde::Serialize;

/// What a reorder did to a table body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReorderOutcome {
    /// Data rows put back in sorted order.
    pub sorted: usize,
    /// Data rows without a cell for the column, removed from the body.
    pub dropped: usize,
    /// Header rows found in the body and put back ahead of the data.
    pub header_rows: usize,
}

/// Reorder a table's data rows by one column.
///
/// The body region is cleared like an `innerHTML = ''`: header rows that
/// lived in it come back first, then the sorted data rows. Row nodes are
/// reused, anything else the body held is gone afterwards. The sort is
/// stable.
pub fn reorder<T: HostTree>(
    tree: &mut T,
    table: T::Node,
    column: usize,
    direction: Direction,
) -> ReorderOutcome {
    let view: &T = tree;
    let body = body_region(view, table);
    let (header_rows, data_rows): (Vec<_>, Vec<_>) = rows(view, body)
        .into_iter()
        .partition(|row| is_header_row(view, *row));

    let mut keyed: Vec<(T::Node, Value)> = Vec::with_capacity(data_rows.len());
    let mut dropped = 0;
    for row in data_rows {
        match data_cells(view, row).get(column) {
            Some(cell) => keyed.push((row, classify(&cell_text(view, *cell)))),
            None => dropped += 1,
        }
    }

    keyed.sort_by(|(_, a), (_, b)| compare(a, b, direction));

    tree.clear_children(body);
    for row in &header_rows {
        tree.append_child(body, *row);
    }
    for (row, _) in &keyed {
        tree.append_child(body, *row);
    }

    let outcome = ReorderOutcome {
        sorted: keyed.len(),
        dropped,
        header_rows: header_rows.len(),
    };
    log::debug!(
        "[reorder] {:?} column {} ({}): {} sorted, {} dropped",
        table,
        column,
        direction,
        outcome.sorted,
        outcome.dropped
    );
    outcome
}
