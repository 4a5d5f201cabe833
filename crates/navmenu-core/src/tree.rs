#![forbid(unsafe_code)]

//! The path-keyed item directory.
//!
//! [`MenuTree`] is an arena: it exclusively owns every [`Item`], keyed by
//! path, and items refer to each other by path only. It holds no ordering
//! or grouping logic of its own; the operations here exist because they
//! touch two items at once (a parent and its child), which the borrow rules
//! do not allow through `Item` methods alone while both live in the tree.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

use crate::error::{MenuError, MenuResult};
use crate::item::Item;
use crate::ordering::{ChildOrdering, GroupSpec};

/// Path of the root item.
const ROOT: &str = "";

/// Path resolution used by items to reach their relatives.
pub trait MenuStore {
    /// Look up an item by path.
    fn resolve(&self, path: &str) -> Option<&Item>;

    /// Look up an item by path for mutation.
    fn resolve_mut(&mut self, path: &str) -> Option<&mut Item>;

    /// Register `item` under its path, returning any item it replaced.
    fn register(&mut self, item: Item) -> Option<Item>;

    /// Every registered path, in registration order.
    fn paths(&self) -> Vec<&str>;
}

/// An invariant violation reported by [`MenuTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A child path that does not resolve.
    DanglingChild { parent: String, child: String },
    /// A child whose level is not its parent's level + 1.
    LevelMismatch {
        path: String,
        expected: usize,
        found: usize,
    },
    /// A child whose `parent_id` is not its parent's path.
    ParentMismatch {
        path: String,
        expected: String,
        found: String,
    },
    /// A non-empty partition that does not hold exactly the children.
    PartitionMismatch { path: String },
    /// A registered item whose parent does not list it.
    UnlistedChild { parent: String, path: String },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingChild { parent, child } => {
                write!(f, "{parent:?} lists missing child {child:?}")
            }
            Self::LevelMismatch {
                path,
                expected,
                found,
            } => write!(f, "{path:?} has level {found}, expected {expected}"),
            Self::ParentMismatch {
                path,
                expected,
                found,
            } => write!(f, "{path:?} has parent {found:?}, expected {expected:?}"),
            Self::PartitionMismatch { path } => {
                write!(f, "{path:?} has groups that do not match its children")
            }
            Self::UnlistedChild { parent, path } => {
                write!(f, "{path:?} is not listed by its parent {parent:?}")
            }
        }
    }
}

/// Owning table of menu items keyed by path.
///
/// A new tree holds the root item at the empty path.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuTree {
    items: IndexMap<String, Item>,
}

impl Default for MenuTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MenuTree {
    /// Create a tree holding only the root item.
    #[must_use]
    pub fn new() -> Self {
        let mut items = IndexMap::new();
        items.insert(ROOT.to_owned(), Item::new(ROOT));
        Self { items }
    }

    /// The root item.
    #[must_use]
    pub fn root(&self) -> &Item {
        // Inserted by `new`; `remove` refuses the root path.
        &self.items[ROOT]
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Item> {
        self.items.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Item> {
        self.items.get_mut(path)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.items.contains_key(path)
    }

    /// Number of items, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.values()
    }

    /// Register `item` under its path without linking it to a parent.
    pub fn insert(&mut self, item: Item) -> Option<Item> {
        self.items.insert(item.path().to_owned(), item)
    }

    /// Link two registered items as parent and child.
    ///
    /// Same effect as [`Item::add_child`] for items that already live in
    /// the tree.
    pub fn attach(&mut self, parent: &str, child: &str) -> MenuResult<()> {
        let (level, parent_path) = {
            let parent = self.lookup(parent)?;
            (parent.level(), parent.path().to_owned())
        };
        let (alias, path) = {
            let child = self.lookup_mut(child)?;
            child.adopt(level, &parent_path);
            (child.alias().to_owned(), child.path().to_owned())
        };
        let group = self.lookup_mut(parent)?.link_child(alias, path.clone());
        self.lookup_mut(&path)?.attributes_mut().group = group;
        Ok(())
    }

    /// Add `child` under `parent` and register it.
    pub fn add_child(&mut self, parent: &str, mut child: Item) -> MenuResult<()> {
        self.lookup_mut(parent)?.add_child(&mut child);
        self.insert(child);
        Ok(())
    }

    /// Unregister the item at `path` and unlink it from its parent.
    ///
    /// Descendants stay registered; they become unreachable from the root
    /// but keep their own links. The root cannot be removed.
    pub fn remove(&mut self, path: &str) -> Option<Item> {
        if path == ROOT {
            return None;
        }
        let item = self.items.shift_remove(path)?;
        if let Some(parent) = self.items.get_mut(item.parent_id())
            && parent.children_order().get(item.alias()).map(String::as_str) == Some(path)
        {
            parent.unlink_child(item.alias());
        }
        Some(item)
    }

    /// Reorder the children of the item at `path`.
    pub fn sort_children(&mut self, path: &str, ordering: &ChildOrdering) -> MenuResult<()> {
        self.lookup_mut(path)?.sort_children(ordering);
        Ok(())
    }

    /// Reverse the children and groups of the item at `path` and record
    /// each child's new group index.
    pub fn reverse(&mut self, path: &str) -> MenuResult<()> {
        let assignments = self.lookup_mut(path)?.reverse();
        assignments.apply(self);
        Ok(())
    }

    /// Group the children of the item at `path` and record each child's
    /// group index. Returns the number of children updated.
    pub fn group_children(&mut self, path: &str, specs: &[GroupSpec]) -> MenuResult<usize> {
        let assignments = self.lookup_mut(path)?.group_children(specs);
        Ok(assignments.apply(self))
    }

    /// The item at `path` followed by its descendants, depth first, in
    /// child order.
    #[must_use]
    pub fn descendants(&self, path: &str) -> Vec<&Item> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack: Vec<&Item> = self.items.get(path).into_iter().collect();
        while let Some(item) = stack.pop() {
            if !seen.insert(item.path()) {
                continue;
            }
            out.push(item);
            let children: Vec<&Item> = item.children(self);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Check the parent/child and grouping invariants of every item.
    ///
    /// Items whose parent is not registered are not reported; removing an
    /// item leaves its descendants that way.
    #[must_use]
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for parent in self.items.values() {
            if parent.path() != ROOT
                && let Some(owner) = self.items.get(parent.parent_id())
                && owner.children_order().get(parent.alias()).map(String::as_str)
                    != Some(parent.path())
            {
                violations.push(Violation::UnlistedChild {
                    parent: owner.path().to_owned(),
                    path: parent.path().to_owned(),
                });
            }

            for path in parent.children_order().values() {
                let Some(child) = self.items.get(path) else {
                    violations.push(Violation::DanglingChild {
                        parent: parent.path().to_owned(),
                        child: path.clone(),
                    });
                    continue;
                };
                if child.level() != parent.level() + 1 {
                    violations.push(Violation::LevelMismatch {
                        path: path.clone(),
                        expected: parent.level() + 1,
                        found: child.level(),
                    });
                }
                if child.parent_id() != parent.path() {
                    violations.push(Violation::ParentMismatch {
                        path: path.clone(),
                        expected: parent.path().to_owned(),
                        found: child.parent_id().to_owned(),
                    });
                }
            }

            let partition = parent.group_partition();
            if !partition.is_empty() {
                let grouped: HashSet<&str> = partition.iter().flatten().map(String::as_str).collect();
                let children: HashSet<&str> =
                    parent.children_order().values().map(String::as_str).collect();
                if grouped != children {
                    violations.push(Violation::PartitionMismatch {
                        path: parent.path().to_owned(),
                    });
                }
            }
        }
        violations
    }

    fn lookup(&self, path: &str) -> MenuResult<&Item> {
        self.items
            .get(path)
            .ok_or_else(|| MenuError::UnknownPath(path.to_owned()))
    }

    fn lookup_mut(&mut self, path: &str) -> MenuResult<&mut Item> {
        self.items
            .get_mut(path)
            .ok_or_else(|| MenuError::UnknownPath(path.to_owned()))
    }
}

impl MenuStore for MenuTree {
    fn resolve(&self, path: &str) -> Option<&Item> {
        self.items.get(path)
    }

    fn resolve_mut(&mut self, path: &str) -> Option<&mut Item> {
        self.items.get_mut(path)
    }

    fn register(&mut self, item: Item) -> Option<Item> {
        self.insert(item)
    }

    fn paths(&self) -> Vec<&str> {
        self.items.keys().map(String::as_str).collect()
    }
}

impl FromIterator<Item> for MenuTree {
    /// Register every item, keeping the root when none of them replaces it.
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        let mut tree = Self::new();
        for item in iter {
            tree.insert(item);
        }
        tree
    }
}
