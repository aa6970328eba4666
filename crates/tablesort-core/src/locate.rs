use crate::dom::HostTree;
use crate::table::is_table_like;
use std::collections::HashSet;

/// Find the independent tables of a document.
///
/// Candidates are every `table` element and every element whose `role`
/// starts with "table". A candidate lying inside another candidate is
/// dropped, so no returned table contains another one.
pub fn locate<T: HostTree>(tree: &T) -> Vec<T::Node> {
    let candidates = candidates(tree);
    let tables = dedup_nested(tree, &candidates);

    log::debug!(
        "[locate] {} candidate(s), {} independent table(s)",
        candidates.len(),
        tables.len()
    );
    tables
}

/// Table-like elements in document order, each at most once.
pub fn candidates<T: HostTree>(tree: &T) -> Vec<T::Node> {
    let mut seen = HashSet::new();
    tree.query_all(tree.document_root(), |t, n| is_table_like(t, n))
        .into_iter()
        .filter(|n| seen.insert(*n))
        .collect()
}

/// Keep only the candidates not contained in another candidate.
pub fn dedup_nested<T: HostTree>(tree: &T, candidates: &[T::Node]) -> Vec<T::Node> {
    candidates
        .iter()
        .copied()
        .filter(|node| {
            !candidates
                .iter()
                .any(|other| other != node && tree.contains(*other, *node))
        })
        .collect()
}
