use super::HostTree;
use std::fmt;

/// Index of a node inside a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree.
///
/// Detached nodes stay in the arena, so ids remain valid after `remove`
/// and can be re-attached later.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Document {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    /// All child nodes, text and comments included.
    pub fn child_nodes(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Comment(text.to_string()))
    }

    pub fn create_doctype(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Doctype(text.to_string()))
    }

    /// Create a detached element with owned attributes.
    pub fn create_element_owned(&mut self, tag: &str, attributes: Vec<(String, String)>) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes,
        })
    }

    /// Number of nodes ever allocated in the arena, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// First element in document order with the given tag.
    pub fn find_tag(&self, tag: &str) -> Option<NodeId> {
        self.query_first(self.root(), |d, n| d.is_tag(n, tag))
    }

    /// Whether `node` is reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root(), node)
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { tag, .. } if tag == "script" || tag == "style" => {}
            NodeKind::Comment(_) | NodeKind::Doctype(_) => {}
            _ => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }
}

impl HostTree for Document {
    type Node = NodeId;

    fn document_root(&self) -> NodeId {
        self.root()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|c| matches!(self.nodes[c.0].kind, NodeKind::Element { .. }))
            .collect()
    }

    fn tag_name(&self, node: NodeId) -> &str {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => tag,
            _ => "",
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.attributes(node)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn create_element(
        &mut self,
        tag: &str,
        attributes: &[(&str, &str)],
        text: Option<&str>,
    ) -> NodeId {
        let attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let element = self.create_element_owned(tag, attributes);
        if let Some(text) = text {
            let text = self.create_text(text);
            self.append_child(element, text);
        }
        element
    }

    /// No-op on non-element nodes.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.nodes[node.0].kind {
            match attributes.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    /// Reuses a lone text child instead of allocating a new one.
    fn set_text(&mut self, node: NodeId, text: &str) {
        if let [only] = self.nodes[node.0].children[..] {
            if let NodeKind::Text(existing) = &mut self.nodes[only.0].kind {
                existing.clear();
                existing.push_str(text);
                return;
            }
        }
        self.clear_children(node);
        let child = self.create_text(text);
        self.append_child(node, child);
    }

    fn clear_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        // Appending an ancestor under its own descendant would create a cycle.
        if self.contains(child, parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let table = doc.create_element("TABLE", &[("class", "data")], None);
        let row = doc.create_element("tr", &[], None);
        let cell = doc.create_element("td", &[], Some("42"));
        doc.append_child(root, table);
        doc.append_child(table, row);
        doc.append_child(row, cell);
        (doc, table, row, cell)
    }

    #[test]
    fn test_tags_are_lowercased() {
        let (doc, table, _, _) = sample();
        assert_eq!(doc.tag_name(table), "table");
        assert_eq!(doc.attribute(table, "CLASS"), Some("data"));
    }

    #[test]
    fn test_children_skip_text_nodes() {
        let (doc, _, row, cell) = sample();
        assert_eq!(doc.children(row), vec![cell]);
        assert!(doc.children(cell).is_empty());
        assert_eq!(doc.child_nodes(cell).len(), 1);
    }

    #[test]
    fn test_contains_and_descendants() {
        let (doc, table, row, cell) = sample();
        assert!(doc.contains(table, cell));
        assert!(doc.contains(table, table));
        assert!(!doc.contains(cell, table));
        assert_eq!(doc.descendants(table), vec![row, cell]);
    }

    #[test]
    fn test_append_moves_node() {
        let (mut doc, table, row, cell) = sample();
        doc.append_child(table, cell);
        assert!(doc.children(row).is_empty());
        assert_eq!(doc.children(table), vec![row, cell]);
        assert_eq!(doc.parent(cell), Some(table));
    }

    #[test]
    fn test_append_refuses_cycles() {
        let (mut doc, table, row, _) = sample();
        doc.append_child(row, table);
        assert_eq!(doc.parent(row), Some(table));
        assert_eq!(doc.parent(table), Some(doc.root()));
    }

    #[test]
    fn test_clear_and_remove() {
        let (mut doc, table, row, cell) = sample();
        doc.clear_children(row);
        assert!(doc.parent(cell).is_none());
        assert_eq!(doc.text_content(table), "");

        doc.remove(row);
        assert!(doc.children(table).is_empty());
        assert!(!doc.is_attached(row));
    }

    #[test]
    fn test_set_text_reuses_text_node() {
        let mut doc = Document::new();
        let span = doc.create_element("span", &[("class", "a")], Some("x"));
        let allocated = doc.node_count();
        doc.set_text(span, "y");
        doc.set_attribute(span, "class", "b");
        assert_eq!(doc.node_count(), allocated);
        assert_eq!(doc.text_content(span), "y");
        assert_eq!(doc.attribute(span, "class"), Some("b"));

        let empty = doc.create_element("span", &[], None);
        doc.set_text(empty, "z");
        assert_eq!(doc.text_content(empty), "z");
    }

    #[test]
    fn test_text_content_skips_style() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element("div", &[], Some("a"));
        let style = doc.create_element("style", &[], Some(".x{}"));
        let span = doc.create_element("span", &[], Some("b"));
        doc.append_child(root, div);
        doc.append_child(div, style);
        doc.append_child(div, span);
        assert_eq!(doc.text_content(div), "ab");
    }
}
