#![forbid(unsafe_code)]

//! Flat views of a nested ordering, as stored alongside a saved menu.

use indexmap::IndexMap;
use navmenu_core::MenuTree;
use serde_json::json;

use crate::definition::{OrderingNode, child_path};

/// Extension attribute holding the per-group child counts of an item.
pub const COLUMNS_COUNT: &str = "columns_count";

/// Number every item of `node` depth first, starting at 1.
///
/// Children come right after their parent. Group lists add no path
/// segment and are not numbered themselves. An alias listed in several
/// groups of one list counts only in the first, and when a path appears
/// twice the first position wins.
#[must_use]
pub fn flatten_ordering(node: &OrderingNode) -> IndexMap<String, usize> {
    let mut positions = IndexMap::new();
    let mut counter = 0;
    number(node, "", &mut counter, &mut positions);
    positions
}

fn number(node: &OrderingNode, parent: &str, counter: &mut usize, out: &mut IndexMap<String, usize>) {
    match node {
        OrderingNode::Children(map) => {
            for (alias, child) in map {
                let path = child_path(parent, alias);
                *counter += 1;
                out.entry(path.clone()).or_insert(*counter);
                number(child, &path, counter, out);
            }
        }
        OrderingNode::Groups(groups) => {
            for group in OrderingNode::claim_groups(groups) {
                number(&group, parent, counter, out);
            }
        }
        OrderingNode::Leaf => {}
    }
}

/// Child counts per column group, keyed by the path of the grouped item.
#[must_use]
pub fn column_counts(node: &OrderingNode) -> IndexMap<String, Vec<usize>> {
    let mut counts = IndexMap::new();
    collect_counts(node, "", &mut counts);
    counts
}

fn collect_counts(node: &OrderingNode, parent: &str, out: &mut IndexMap<String, Vec<usize>>) {
    match node {
        OrderingNode::Children(map) => {
            for (alias, child) in map {
                collect_counts(child, &child_path(parent, alias), out);
            }
        }
        OrderingNode::Groups(groups) => {
            let groups = OrderingNode::claim_groups(groups);
            out.insert(parent.to_owned(), groups.iter().map(OrderingNode::len).collect());
            for group in &groups {
                collect_counts(group, parent, out);
            }
        }
        OrderingNode::Leaf => {}
    }
}

/// Store [`column_counts`] on the matching items of `tree` as the
/// [`COLUMNS_COUNT`] attribute. Returns how many items were updated.
pub fn embed_column_counts(tree: &mut MenuTree, node: &OrderingNode) -> usize {
    let mut embedded = 0;
    for (path, counts) in column_counts(node) {
        if let Some(item) = tree.get_mut(&path) {
            item.set(COLUMNS_COUNT, json!(counts));
            embedded += 1;
        }
    }
    embedded
}
