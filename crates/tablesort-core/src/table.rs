//! Structure of a single table: body region, rows, cells, headers.
//!
//! Native tables, ARIA tables and nested-div grids are all read through the
//! same few rules so the rest of the engine never looks at markup directly.

use crate::dom::HostTree;

/// `table` elements and anything with a `role` starting with "table".
pub fn is_table_like<T: HostTree>(tree: &T, node: T::Node) -> bool {
    tree.is_tag(node, "table") || tree.attribute_starts_with(node, "role", "table")
}

/// Descend while the node has exactly one element child.
pub fn last_parent<T: HostTree>(tree: &T, node: T::Node) -> T::Node {
    let mut current = node;
    loop {
        let children = tree.children(current);
        match children.as_slice() {
            [only] => current = *only,
            _ => return current,
        }
    }
}

/// Region holding the table's rows: the first `tbody`, else the last parent.
pub fn body_region<T: HostTree>(tree: &T, table: T::Node) -> T::Node {
    scoped_descendants(tree, table)
        .into_iter()
        .find(|n| tree.is_tag(*n, "tbody"))
        .unwrap_or_else(|| last_parent(tree, table))
}

/// Pre-order element descendants of `scope`, not entering nested tables.
pub fn scoped_descendants<T: HostTree>(tree: &T, scope: T::Node) -> Vec<T::Node> {
    let mut out = Vec::new();
    let mut stack: Vec<T::Node> = tree.children(scope).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if is_table_like(tree, node) {
            continue;
        }
        out.push(node);
        stack.extend(tree.children(node).into_iter().rev());
    }
    out
}

/// `th` or `role="columnheader"`.
pub fn is_header_cell<T: HostTree>(tree: &T, node: T::Node) -> bool {
    tree.is_tag(node, "th") || tree.attribute(node, "role") == Some("columnheader")
}

/// Class-name grid header: `[class*="row"] [class*="head"]`.
pub fn is_class_header<T: HostTree>(tree: &T, node: T::Node) -> bool {
    tree.attribute_contains(node, "class", "head")
        && tree.has_ancestor(node, |t, n| t.attribute_contains(n, "class", "row"))
}

/// Rows of a body region.
///
/// `tr` elements first; without any, `role="row"` elements; without any of
/// those, the region's element children (div grids).
pub fn rows<T: HostTree>(tree: &T, body: T::Node) -> Vec<T::Node> {
    let scoped = scoped_descendants(tree, body);

    let native: Vec<_> = scoped
        .iter()
        .copied()
        .filter(|n| tree.is_tag(*n, "tr"))
        .collect();
    if !native.is_empty() {
        return native;
    }

    let aria: Vec<_> = scoped
        .iter()
        .copied()
        .filter(|n| tree.attribute(*n, "role") == Some("row"))
        .collect();
    if !aria.is_empty() {
        return aria;
    }

    tree.children(body)
}

/// A row holding at least one header cell.
pub fn is_header_row<T: HostTree>(tree: &T, row: T::Node) -> bool {
    scoped_descendants(tree, row)
        .into_iter()
        .any(|n| is_header_cell(tree, n) || is_class_header(tree, n))
}

/// Data cells of a row in document order.
pub fn data_cells<T: HostTree>(tree: &T, row: T::Node) -> Vec<T::Node> {
    let cells: Vec<_> = scoped_descendants(tree, row)
        .into_iter()
        .filter(|n| {
            tree.is_tag(*n, "td")
                || matches!(tree.attribute(*n, "role"), Some("cell") | Some("gridcell"))
        })
        .collect();

    if cells.is_empty() {
        tree.children(row)
    } else {
        cells
    }
}

/// Visible text of a cell: its first `span`/`a` if it has one.
pub fn cell_text<T: HostTree>(tree: &T, cell: T::Node) -> String {
    let target = tree
        .query_first(cell, |t, n| t.is_tag(n, "span") || t.is_tag(n, "a"))
        .unwrap_or(cell);
    tree.text_content(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn parse(html: &str) -> Document {
        Document::parse_html(html).unwrap()
    }

    #[test]
    fn test_last_parent_descends_single_children() {
        let doc = parse("<div id=a><div id=b><div id=c><p>1</p><p>2</p></div></div></div>");
        let a = doc.find_tag("div").unwrap();
        let resolved = last_parent(&doc, a);
        assert_eq!(doc.attribute(resolved, "id"), Some("c"));
    }

    #[test]
    fn test_last_parent_stops_at_leaf() {
        let doc = parse("<div><span>x</span></div>");
        let div = doc.find_tag("div").unwrap();
        let span = doc.find_tag("span").unwrap();
        assert_eq!(last_parent(&doc, div), span);
    }

    #[test]
    fn test_body_prefers_tbody() {
        let doc = parse(
            "<table><thead><tr><th>a</th></tr></thead><tbody><tr><td>1</td></tr></tbody></table>",
        );
        let table = doc.find_tag("table").unwrap();
        let tbody = doc.find_tag("tbody").unwrap();
        assert_eq!(body_region(&doc, table), tbody);
    }

    #[test]
    fn test_rows_skip_nested_tables() {
        let doc = parse(
            "<table><tr><td>1</td></tr><tr><td><table><tr><td>x</td></tr></table></td></tr></table>",
        );
        let table = doc.find_tag("table").unwrap();
        let body = body_region(&doc, table);
        assert_eq!(rows(&doc, body).len(), 2);
    }

    #[test]
    fn test_div_grid_rows_and_cells() {
        let doc = parse(
            r#"<div class="grid"><div class="row"><div class="head">A</div><div class="head">B</div></div><div class="row"><div>1</div><div>2</div></div></div>"#,
        );
        let grid = doc.find_tag("div").unwrap();
        let body = body_region(&doc, grid);
        let found = rows(&doc, body);
        assert_eq!(found.len(), 2);
        assert!(is_header_row(&doc, found[0]));
        assert!(!is_header_row(&doc, found[1]));
        assert_eq!(data_cells(&doc, found[1]).len(), 2);
    }

    #[test]
    fn test_row_class_alone_is_not_header() {
        let doc = parse(
            r#"<table><tr class="ahead"><td>1</td><td>2</td></tr><tr class="thead-like"><th>a</th></tr></table>"#,
        );
        let table = doc.find_tag("table").unwrap();
        let found = rows(&doc, body_region(&doc, table));
        assert!(!is_header_row(&doc, found[0]));
        assert!(is_header_row(&doc, found[1]));
    }

    #[test]
    fn test_cell_text_prefers_span() {
        let doc = parse("<table><tr><td>ignored <span>12</span> <a>3</a></td></tr></table>");
        let td = doc.find_tag("td").unwrap();
        assert_eq!(cell_text(&doc, td), "12");
    }

    #[test]
    fn test_aria_cells() {
        let doc = parse(
            r#"<div role="row"><div role="cell">1</div><span>x</span><div role="gridcell">2</div></div>"#,
        );
        let row = doc.find_tag("div").unwrap();
        assert_eq!(data_cells(&doc, row).len(), 2);
    }
}
