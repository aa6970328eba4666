use crate::config::ControlConfig;
use crate::dom::HostTree;
use crate::state::{Direction, SortState, TableId};

/// Attribute naming the table a control belongs to.
pub const TABLE_ATTR: &str = "data-sort-table";
/// Attribute naming the column a control sorts.
pub const COLUMN_ATTR: &str = "data-sort-column";
/// Marker attribute of the injected style sheet.
pub const STYLE_ATTR: &str = "data-tablesort";

/// Handler for one rendered control: which table, which column.
///
/// Hosts deliver an activation by recovering the control from the element
/// that received the input and passing it to `TableSorter::dispatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortControl {
    pub table: TableId,
    pub column: usize,
}

impl SortControl {
    /// Find the control owning `node` (the button or anything inside it).
    pub fn from_element<T: HostTree>(tree: &T, node: T::Node) -> Option<SortControl> {
        let mut current = Some(node);
        while let Some(n) = current {
            if let (Some(table), Some(column)) =
                (tree.attribute(n, TABLE_ATTR), tree.attribute(n, COLUMN_ATTR))
            {
                return Some(SortControl {
                    table: table.parse().ok()?,
                    column: column.parse().ok()?,
                });
            }
            current = tree.parent(n);
        }
        None
    }
}

/// Class list and icon of the control for `column` under `state`.
fn appearance<'c>(state: SortState, column: usize, config: &'c ControlConfig) -> (String, &'c str) {
    match state.direction_of(column) {
        Some(direction) => {
            let icon = match direction {
                Direction::Ascending => &config.arrow_up,
                Direction::Descending => &config.arrow_down,
            };
            (format!("{} {}", config.class_name, config.active_class), icon.as_str())
        }
        None => (config.class_name.clone(), config.arrow_down.as_str()),
    }
}

/// Append one control per header cell reflecting `state`.
///
/// Returns the created control nodes so later states can be applied to them
/// with [`update`].
pub fn render<T: HostTree>(
    tree: &mut T,
    table: TableId,
    headers: &[T::Node],
    state: SortState,
    config: &ControlConfig,
) -> Vec<T::Node> {
    let table_attr = table.to_string();
    let mut controls = Vec::with_capacity(headers.len());

    for (column, header) in headers.iter().enumerate() {
        let (class, icon) = appearance(state, column, config);
        let column_attr = column.to_string();

        let button = tree.create_element(
            "button",
            &[
                ("type", "button"),
                ("class", class.as_str()),
                (TABLE_ATTR, table_attr.as_str()),
                (COLUMN_ATTR, column_attr.as_str()),
            ],
            None,
        );
        let span = tree.create_element("span", &[], Some(icon));
        tree.append_child(button, span);
        tree.append_child(*header, button);
        controls.push(button);
    }

    log::trace!("[controls] {table}: rendered {} control(s)", controls.len());
    controls
}

/// Restyle rendered controls for a new state without allocating nodes.
pub fn update<T: HostTree>(
    tree: &mut T,
    controls: &[T::Node],
    state: SortState,
    config: &ControlConfig,
) {
    for (column, button) in controls.iter().enumerate() {
        let (class, icon) = appearance(state, column, config);
        tree.set_attribute(*button, "class", &class);
        match tree.children(*button).first() {
            Some(span) => tree.set_text(*span, icon),
            None => tree.set_text(*button, icon),
        }
    }
}

/// Detach previously rendered controls.
pub fn clear<T: HostTree>(tree: &mut T, controls: &mut Vec<T::Node>) {
    for control in controls.drain(..) {
        tree.remove(control);
    }
}

/// CSS for the controls.
pub fn stylesheet(config: &ControlConfig) -> String {
    format!(
        "\n.{class} {{\n  padding: 0.1em;\n  margin-left: 0.3em;\n  appearance: none;\n  border: none;\n  border-radius: 0.5em;\n}}\n\
         .{class}.{active} {{\n  color: {active_color};\n}}\n\
         .{class}:hover {{\n  background-color: {hover_color};\n}}\n",
        class = config.class_name,
        active = config.active_class,
        active_color = config.active_color,
        hover_color = config.hover_color,
    )
}

/// Append the style sheet to `head`, creating a `head` when there is none.
///
/// Returns `None` when the sheet is already installed.
pub fn install_styles<T: HostTree>(tree: &mut T, config: &ControlConfig) -> Option<T::Node> {
    let root = tree.document_root();
    if tree
        .query_first(root, |t, n| t.is_tag(n, "style") && t.attribute(n, STYLE_ATTR).is_some())
        .is_some()
    {
        return None;
    }

    let head = match tree.query_first(root, |t, n| t.is_tag(n, "head")) {
        Some(head) => head,
        None => {
            let parent = tree
                .query_first(root, |t, n| t.is_tag(n, "body"))
                .or_else(|| tree.query_first(root, |t, n| t.is_tag(n, "html")))
                .unwrap_or(root);
            let head = tree.create_element("head", &[], None);
            tree.append_child(parent, head);
            head
        }
    };

    let css = stylesheet(config);
    let style = tree.create_element("style", &[(STYLE_ATTR, "")], Some(css.as_str()));
    tree.append_child(head, style);
    log::debug!("[controls] style sheet installed");
    Some(style)
}

/// Remove every control and the style sheet from a document.
pub fn strip<T: HostTree>(tree: &mut T) -> usize {
    let root = tree.document_root();
    let nodes = tree.query_all(root, |t, n| {
        (t.is_tag(n, "button") && t.attribute(n, TABLE_ATTR).is_some())
            || (t.is_tag(n, "style") && t.attribute(n, STYLE_ATTR).is_some())
    });
    let count = nodes.len();
    for node in nodes {
        tree.remove(node);
    }
    count
}
