#![forbid(unsafe_code)]

//! Menu definitions: the `{items, ordering}` mapping a menu is stored as.
//!
//! `items` maps item paths to attribute overrides. `ordering` is a nested
//! mapping of aliases giving the tree shape and child order. A list in the
//! ordering stands for column groups: each element is one group, holding
//! the aliases of the children it claims.
//!
//! ```text
//! ordering:
//!   main:
//!     home: ~
//!     about:
//!       - { team: ~, contact: ~ }
//!       - { history: ~ }
//! ```

use std::collections::HashSet;

use indexmap::IndexMap;
use navmenu_core::item::split_path;
use navmenu_core::{AttributeMap, GroupSpec, Item, MenuResult, MenuTree};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::normalize::{ExportConfig, export_items};

/// Join a parent path and an alias.
pub(crate) fn child_path(parent: &str, alias: &str) -> String {
    if parent.is_empty() {
        alias.to_owned()
    } else {
        format!("{parent}/{alias}")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordering
// ─────────────────────────────────────────────────────────────────────────────

/// One level of a nested menu ordering.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OrderingNode {
    /// Ordered `alias -> subtree` map.
    Children(IndexMap<String, OrderingNode>),
    /// Column groups; each element is the ordering of one group.
    Groups(Vec<OrderingNode>),
    /// No children.
    #[default]
    Leaf,
}

impl OrderingNode {
    /// Interpret parsed ordering data. Objects are child maps, lists are
    /// column groups, anything else is a leaf.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Children(
                map.iter()
                    .map(|(alias, node)| (alias.clone(), Self::from_value(node)))
                    .collect(),
            ),
            Value::Array(groups) => Self::Groups(groups.iter().map(Self::from_value).collect()),
            _ => Self::Leaf,
        }
    }

    /// Leaves are written as `null`.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Children(map) => Value::Object(
                map.iter()
                    .map(|(alias, node)| (alias.clone(), node.to_value()))
                    .collect(),
            ),
            Self::Groups(groups) => Value::Array(groups.iter().map(Self::to_value).collect()),
            Self::Leaf => Value::Null,
        }
    }

    /// Reproduce the ordering below the item at `path`.
    ///
    /// An item with a non-empty group partition is written as a group list;
    /// an unknown or childless item is a leaf.
    #[must_use]
    pub fn from_tree(tree: &MenuTree, path: &str) -> Self {
        let Some(item) = tree.get(path) else {
            return Self::Leaf;
        };
        if !item.has_children() {
            return Self::Leaf;
        }
        let subtree = |child: &str| (split_path(child).1.to_owned(), Self::from_tree(tree, child));
        if item.group_partition().is_empty() {
            Self::Children(item.children_order().values().map(|p| subtree(p.as_str())).collect())
        } else {
            Self::Groups(
                item.group_partition()
                    .iter()
                    .map(|group| Self::Children(group.iter().map(|p| subtree(p.as_str())).collect()))
                    .collect(),
            )
        }
    }

    /// Number of entries at this level; a leaf has none.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Children(map) => map.len(),
            Self::Groups(groups) => groups.len(),
            Self::Leaf => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The groups of a group list with every alias kept only in the first
    /// group that lists it.
    pub(crate) fn claim_groups(groups: &[Self]) -> Vec<Self> {
        let mut claimed = HashSet::new();
        groups
            .iter()
            .map(|group| match group {
                Self::Children(map) => Self::Children(
                    map.iter()
                        .filter(|&(alias, _)| claimed.insert(alias.as_str()))
                        .map(|(alias, node)| (alias.clone(), node.clone()))
                        .collect(),
                ),
                other => other.clone(),
            })
            .collect()
    }

    /// Aliases a group claims; only a child map claims any.
    fn group_spec(&self) -> GroupSpec {
        match self {
            Self::Children(map) => GroupSpec::aliases(map.keys().cloned()),
            Self::Groups(_) | Self::Leaf => GroupSpec::Skip,
        }
    }
}

impl Serialize for OrderingNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OrderingNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// What to do with items listed in `items` but absent from `ordering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrphanPolicy {
    /// Attach under their parent when it exists, after the ordered children.
    #[default]
    Append,
    /// Leave them out of the tree.
    Drop,
}

/// Configuration for building a tree from a [`MenuDefinition`].
#[derive(Debug, Clone, Default)]
pub struct DefinitionConfig {
    pub orphans: OrphanPolicy,
}

impl DefinitionConfig {
    #[must_use]
    pub fn orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Definition
// ─────────────────────────────────────────────────────────────────────────────

/// A stored menu: per-path attribute overrides plus the nested ordering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuDefinition {
    pub items: IndexMap<String, AttributeMap>,
    pub ordering: OrderingNode,
}

impl MenuDefinition {
    /// Parse a definition from JSON text.
    pub fn from_json(data: &str) -> MenuResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Capture `tree` as a definition: exported item attributes plus the
    /// ordering below the root.
    #[must_use]
    pub fn from_tree(tree: &MenuTree, config: &ExportConfig) -> Self {
        Self {
            items: export_items(tree, config),
            ordering: OrderingNode::from_tree(tree, ""),
        }
    }

    /// Build a tree with the default configuration.
    pub fn build(&self) -> MenuResult<MenuTree> {
        self.build_with(&DefinitionConfig::default())
    }

    /// Build a tree: one item per ordering path, created with its `items`
    /// overrides and attached under its parent, then grouped wherever the
    /// ordering lists column groups.
    pub fn build_with(&self, config: &DefinitionConfig) -> MenuResult<MenuTree> {
        let mut tree = MenuTree::new();
        self.attach_node(&mut tree, "", &self.ordering)?;

        let mut orphans = 0;
        if config.orphans == OrphanPolicy::Append {
            orphans = self.attach_orphans(&mut tree)?;
        }

        tracing::debug!(
            items = tree.len(),
            orphans,
            "built menu tree from definition"
        );
        Ok(tree)
    }

    fn item_for(&self, path: &str) -> Item {
        match self.items.get(path) {
            Some(overrides) => Item::with_attributes(path, overrides),
            None => Item::new(path),
        }
    }

    fn attach_node(&self, tree: &mut MenuTree, parent: &str, node: &OrderingNode) -> MenuResult<()> {
        match node {
            OrderingNode::Children(map) => {
                for (alias, child) in map {
                    let path = child_path(parent, alias);
                    tree.add_child(parent, self.item_for(&path))?;
                    self.attach_node(tree, &path, child)?;
                }
            }
            OrderingNode::Groups(groups) => {
                let groups = OrderingNode::claim_groups(groups);
                for group in &groups {
                    self.attach_node(tree, parent, group)?;
                }
                let specs: Vec<GroupSpec> = groups.iter().map(OrderingNode::group_spec).collect();
                tree.group_children(parent, &specs)?;
            }
            OrderingNode::Leaf => {}
        }
        Ok(())
    }

    /// Attach unordered items, shallowest first so nested orphans find
    /// their parents. Returns how many were attached.
    fn attach_orphans(&self, tree: &mut MenuTree) -> MenuResult<usize> {
        let mut pending: Vec<&str> = self
            .items
            .keys()
            .map(String::as_str)
            .filter(|path| !path.is_empty() && !tree.contains(path))
            .collect();
        pending.sort_by_key(|path| path.matches('/').count());

        let mut attached = 0;
        for path in pending {
            let (parent, _) = split_path(path);
            if tree.contains(parent) {
                tree.add_child(parent, self.item_for(path))?;
                attached += 1;
            } else {
                tracing::debug!(path, parent, "skipping menu item without a parent");
            }
        }
        Ok(attached)
    }
}
