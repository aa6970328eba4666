pub mod document;
pub mod html;

pub use document::{Document, NodeId};

use std::fmt;
use std::hash::Hash;

/// Tree capabilities the engine needs from its host.
///
/// `children` and every query only ever yield element nodes; text is reached
/// through `text_content`.
pub trait HostTree {
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// Node whose descendants make up the whole document.
    fn document_root(&self) -> Self::Node;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Element children of `node`, in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Lower-case tag name; empty for non-element nodes.
    fn tag_name(&self, node: Self::Node) -> &str;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Concatenated text of every text node below `node`.
    fn text_content(&self, node: Self::Node) -> String;

    /// Create a detached element, optionally holding a single text child.
    fn create_element(
        &mut self,
        tag: &str,
        attributes: &[(&str, &str)],
        text: Option<&str>,
    ) -> Self::Node;

    /// Set or replace an attribute of an element.
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Make `text` the only content of `node`.
    fn set_text(&mut self, node: Self::Node, text: &str);

    /// Detach every child node of `node`, text included.
    fn clear_children(&mut self, node: Self::Node);

    /// Append `child` as last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Detach `node` from its parent.
    fn remove(&mut self, node: Self::Node);

    /// Whether `node` is `ancestor` or lies below it.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Element descendants of `node` in pre-order, `node` excluded.
    fn descendants(&self, node: Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(node).into_iter().rev().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).into_iter().rev());
        }
        out
    }

    /// Descendants of `scope` matching `predicate`, in document order.
    fn query_all<F>(&self, scope: Self::Node, predicate: F) -> Vec<Self::Node>
    where
        F: Fn(&Self, Self::Node) -> bool,
    {
        self.descendants(scope)
            .into_iter()
            .filter(|n| predicate(self, *n))
            .collect()
    }

    fn query_first<F>(&self, scope: Self::Node, predicate: F) -> Option<Self::Node>
    where
        F: Fn(&Self, Self::Node) -> bool,
    {
        self.descendants(scope)
            .into_iter()
            .find(|n| predicate(self, *n))
    }

    /// Whether some proper ancestor of `node` matches `predicate`.
    fn has_ancestor<F>(&self, node: Self::Node, predicate: F) -> bool
    where
        F: Fn(&Self, Self::Node) -> bool,
    {
        let mut current = self.parent(node);
        while let Some(n) = current {
            if predicate(self, n) {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn is_tag(&self, node: Self::Node, tag: &str) -> bool {
        self.tag_name(node) == tag
    }

    /// `[name*="needle"]`
    fn attribute_contains(&self, node: Self::Node, name: &str, needle: &str) -> bool {
        self.attribute(node, name)
            .is_some_and(|value| value.contains(needle))
    }

    /// `[name^="prefix"]`
    fn attribute_starts_with(&self, node: Self::Node, name: &str, prefix: &str) -> bool {
        self.attribute(node, name)
            .is_some_and(|value| value.starts_with(prefix))
    }
}
