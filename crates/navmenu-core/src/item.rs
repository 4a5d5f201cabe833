#![forbid(unsafe_code)]

//! A single menu node.
//!
//! An [`Item`] owns its attributes, the ordered `alias -> path` map of its
//! direct children, and the column partition computed by
//! [`Item::group_children`]. Relationships are stored as paths only; reads
//! that need the related items take the owning [`MenuStore`] and resolve
//! through it.
//!
//! # Invariants
//!
//! 1. A child's `level` is its parent's `level + 1` and its `parent_id` is the
//!    parent's path. Both are enforced by [`Item::add_child`].
//! 2. When the group partition is non-empty, the paths it holds are exactly
//!    the paths of the child ordering. Children that no group claims live in
//!    group 0.
//! 3. `parent_id` is always derived from the path at construction; input
//!    data cannot supply a stale parent.

use indexmap::IndexMap;
use serde_json::Value;

use crate::attributes::{AttributeMap, Attributes, Columns};
use crate::cursor::ChildCursor;
use crate::ordering::{self, ChildOrdering, GroupSpec, natural_cmp};
use crate::tree::MenuStore;

/// Dropdown style used when a grouped item has more than one column.
pub const DROPDOWN_FULLWIDTH: &str = "fullwidth";
/// Dropdown style used for single-column items.
pub const DROPDOWN_STANDARD: &str = "standard";

/// A navigation menu node addressed by its `/`-joined path.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    attrs: Attributes,
    children: IndexMap<String, String>,
    partition: Vec<Vec<String>>,
    url: Option<String>,
}

impl Item {
    /// Create an item for `name` with no attribute overrides.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_attributes(name, &AttributeMap::new())
    }

    /// Create an item for `name`, applying `overrides` on top of the derived
    /// attributes.
    ///
    /// `id`, `path`, `alias`, `title` and `link` are derived from `name` and
    /// may be overridden. `parent_id` is always derived and any value in
    /// `overrides` is ignored.
    #[must_use]
    pub fn with_attributes(name: &str, overrides: &AttributeMap) -> Self {
        let (parent, alias) = split_path(name);

        let mut attrs = Attributes {
            id: derive_id(name),
            path: name.to_owned(),
            alias: alias.to_owned(),
            title: Some(capitalize(alias)),
            link: Some(name.to_owned()),
            ..Attributes::default()
        };
        for (key, value) in overrides {
            if key != "parent_id" {
                attrs.set(key, value.clone());
            }
        }
        attrs.parent_id = parent.to_owned();

        Self {
            attrs,
            children: IndexMap::new(),
            partition: Vec::new(),
            url: None,
        }
    }

    pub(crate) fn from_parts(
        attrs: Attributes,
        children: IndexMap<String, String>,
        partition: Vec<Vec<String>>,
        url: Option<String>,
    ) -> Self {
        Self {
            attrs,
            children,
            partition,
            url,
        }
    }

    // ── Attributes ──────────────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> &str {
        &self.attrs.id
    }

    /// The item type tag (`"link"`, `"particle"`, ...).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.attrs.kind
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.attrs.path
    }

    #[must_use]
    pub fn alias(&self) -> &str {
        &self.attrs.alias
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.attrs.title.as_deref()
    }

    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.attrs.link.as_deref()
    }

    /// Path of the parent item; empty for root-level items.
    #[must_use]
    pub fn parent_id(&self) -> &str {
        &self.attrs.parent_id
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.attrs.level
    }

    /// Column group this item was assigned to by its parent.
    #[must_use]
    pub fn group(&self) -> usize {
        self.attrs.group
    }

    #[must_use]
    pub fn columns(&self) -> &Columns {
        &self.attrs.columns
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.attrs.visible
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.attrs.enabled
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    /// Read an attribute by key. Unknown, unset keys read as `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.attrs.get(key)
    }

    /// Write an attribute by key.
    pub fn set(&mut self, key: &str, value: Value) -> &mut Self {
        self.attrs.set(key, value);
        self
    }

    /// Merge `data` into the attributes, overwriting matching keys.
    pub fn update(&mut self, data: &AttributeMap) -> &mut Self {
        self.attrs.merge(data);
        self
    }

    /// Export the attributes. See [`Attributes::to_map`].
    #[must_use]
    pub fn to_map(&self, with_defaults: bool) -> AttributeMap {
        self.attrs.to_map(with_defaults)
    }

    /// The resolved URL, when one has been computed.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: Option<String>) -> &mut Self {
        self.url = url;
        self
    }

    // ── Relationships ───────────────────────────────────────────────────

    /// Resolve the parent through `store`.
    ///
    /// The root item (empty path) has no parent; a dangling `parent_id`
    /// resolves to `None` as well.
    #[must_use]
    pub fn parent<'s, S: MenuStore + ?Sized>(&self, store: &'s S) -> Option<&'s Item> {
        if self.attrs.path.is_empty() || self.attrs.parent_id == self.attrs.path {
            return None;
        }
        store.resolve(&self.attrs.parent_id)
    }

    /// Make `child` a direct child of this item.
    ///
    /// Sets the child's `level`, `parent_id` and `group` and records it under
    /// its alias, replacing any previous child with the same alias. A
    /// replacement takes over the column of the child it replaces; a new
    /// child joins column 0. The child is not registered anywhere; that is
    /// the caller's job.
    pub fn add_child(&mut self, child: &mut Item) -> &mut Self {
        child.adopt(self.attrs.level, &self.attrs.path);
        child.attrs.group = self.link_child(child.alias().to_owned(), child.path().to_owned());
        self
    }

    /// Forget `child`. No-op when it is not a child of this item.
    pub fn remove_child(&mut self, child: &Item) -> &mut Self {
        self.unlink_child(child.alias());
        self
    }

    pub(crate) fn adopt(&mut self, parent_level: usize, parent_path: &str) {
        self.attrs.level = parent_level + 1;
        parent_path.clone_into(&mut self.attrs.parent_id);
    }

    /// Record `path` under `alias` and return the column it lands in.
    pub(crate) fn link_child(&mut self, alias: String, path: String) -> usize {
        match self.children.insert(alias, path.clone()) {
            Some(previous) => {
                for group in &mut self.partition {
                    for entry in group.iter_mut().filter(|entry| **entry == previous) {
                        entry.clone_from(&path);
                    }
                }
            }
            None => {
                if let Some(first) = self.partition.first_mut() {
                    first.push(path.clone());
                }
            }
        }
        self.column_of(&path).unwrap_or(0)
    }

    fn column_of(&self, path: &str) -> Option<usize> {
        self.partition
            .iter()
            .position(|group| group.iter().any(|entry| entry == path))
    }

    pub(crate) fn unlink_child(&mut self, alias: &str) -> Option<String> {
        let path = self.children.shift_remove(alias)?;
        for group in &mut self.partition {
            group.retain(|entry| *entry != path);
        }
        Some(path)
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// The `alias -> path` map of direct children, in display order.
    #[must_use]
    pub fn children_order(&self) -> &IndexMap<String, String> {
        &self.children
    }

    /// The column partition; empty when the children are ungrouped.
    #[must_use]
    pub fn group_partition(&self) -> &[Vec<String>] {
        &self.partition
    }

    /// Direct children resolved through `store`, in display order.
    ///
    /// Paths that do not resolve are skipped.
    #[must_use]
    pub fn children<'s, S: MenuStore + ?Sized>(&self, store: &'s S) -> Vec<&'s Item> {
        self.children
            .values()
            .filter_map(|path| store.resolve(path))
            .collect()
    }

    /// Iterate `(alias, child)` pairs in display order.
    pub fn iter<'a, S: MenuStore + ?Sized>(
        &'a self,
        store: &'a S,
    ) -> impl Iterator<Item = (&'a str, &'a Item)> + 'a {
        self.children
            .iter()
            .filter_map(|(alias, path)| store.resolve(path).map(|item| (alias.as_str(), item)))
    }

    /// A stateful cursor over the children. See [`ChildCursor`].
    #[must_use]
    pub fn cursor<'a, S: MenuStore + ?Sized>(&'a self, store: &'a S) -> ChildCursor<'a, S> {
        ChildCursor::new(self, store)
    }

    // ── Ordering ────────────────────────────────────────────────────────

    /// Reorder the direct children.
    ///
    /// The group partition is left as is.
    pub fn sort_children(&mut self, ordering: &ChildOrdering) -> &mut Self {
        if self.children.is_empty() {
            return self;
        }
        match ordering {
            ChildOrdering::Explicit(order) => {
                self.children = ordering::merge_explicit(order, &self.children);
            }
            ChildOrdering::Alphabetical => {
                self.children.sort_by(|a, _, b, _| natural_cmp(a, b));
            }
            ChildOrdering::ReverseAlphabetical => {
                self.children.sort_by(|a, _, b, _| natural_cmp(b, a));
            }
            ChildOrdering::Unrecognized(_tag) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(path = %self.attrs.path, tag = %_tag, "unrecognized ordering tag");
            }
        }
        self
    }

    /// Reverse the child order and the order of the column groups in place.
    ///
    /// Column widths move with their groups. The children's `group`
    /// attributes live in the store, so the new indices come back as
    /// [`GroupAssignments`]; an ungrouped item returns none.
    #[must_use = "group assignments must be applied to the store holding the children"]
    pub fn reverse(&mut self) -> GroupAssignments {
        self.children.reverse();
        self.partition.reverse();
        self.attrs.columns.reverse_within(self.partition.len());
        GroupAssignments(
            self.partition
                .iter()
                .enumerate()
                .flat_map(|(index, group)| group.iter().map(move |path| (path.clone(), index)))
                .collect(),
        )
    }

    // ── Grouping ────────────────────────────────────────────────────────

    /// Partition the children into column groups.
    ///
    /// The partition starts as `max(1, columns)` empty groups. Each
    /// [`GroupSpec::Aliases`] at index `i` claims the listed children still
    /// unclaimed, in spec order, and becomes group `i` (growing the partition
    /// when `i` is past the configured columns). Unclaimed children are
    /// appended to group 0. The child order is rewritten to the concatenation
    /// of the groups in spec order followed by the unclaimed children.
    ///
    /// Children live in the store, so their `group` attribute is not touched
    /// here: the returned [`GroupAssignments`] must be applied to the store
    /// (see [`MenuTree::group_children`](crate::tree::MenuTree::group_children)).
    ///
    /// An item without children is left unchanged.
    #[must_use = "group assignments must be applied to the store holding the children"]
    pub fn group_children(&mut self, specs: &[GroupSpec]) -> GroupAssignments {
        if self.children.is_empty() {
            return GroupAssignments::default();
        }

        let mut remaining = std::mem::take(&mut self.children);
        let mut partition = vec![Vec::new(); self.attrs.columns.len().max(1)];
        let mut ordered = IndexMap::with_capacity(remaining.len());
        let mut assignments = Vec::with_capacity(remaining.len());

        for (index, spec) in specs.iter().enumerate() {
            let GroupSpec::Aliases(order) = spec else {
                continue;
            };
            let group = ordering::select(order, &remaining);
            for alias in group.keys() {
                remaining.shift_remove(alias);
            }
            if partition.len() <= index {
                partition.resize(index + 1, Vec::new());
            }
            partition[index] = group.values().cloned().collect();
            assignments.extend(group.values().map(|path| (path.clone(), index)));
            ordered.extend(group);
        }

        if !remaining.is_empty() {
            partition[0].extend(remaining.values().cloned());
            assignments.extend(remaining.values().map(|path| (path.clone(), 0)));
            ordered.extend(remaining);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            path = %self.attrs.path,
            groups = partition.len(),
            children = ordered.len(),
            "grouped menu children"
        );

        self.children = ordered;
        self.partition = partition;
        GroupAssignments(assignments)
    }

    /// Number of column groups; an ungrouped item has one.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.partition.len().max(1)
    }

    /// Children resolved per column group.
    ///
    /// Without a partition, a single group holds every child in order.
    #[must_use]
    pub fn groups<'s, S: MenuStore + ?Sized>(&self, store: &'s S) -> Vec<Vec<&'s Item>> {
        if self.partition.is_empty() {
            return vec![self.children(store)];
        }
        self.partition
            .iter()
            .map(|group| group.iter().filter_map(|path| store.resolve(path)).collect())
            .collect()
    }

    /// Children of column group `index`; empty when out of range.
    #[must_use]
    pub fn get_group<'s, S: MenuStore + ?Sized>(&self, index: usize, store: &'s S) -> Vec<&'s Item> {
        self.groups(store).into_iter().nth(index).unwrap_or_default()
    }

    /// Width of column `index`: the configured width, or an even share of
    /// 100 across the groups.
    #[must_use]
    pub fn column_width(&self, index: usize) -> f64 {
        self.attrs
            .columns
            .get(index)
            .unwrap_or_else(|| 100.0 / self.group_count() as f64)
    }

    /// The explicit dropdown style, or one derived from the group count.
    #[must_use]
    pub fn dropdown(&self) -> &str {
        if !self.attrs.dropdown.is_empty() {
            &self.attrs.dropdown
        } else if self.group_count() > 1 {
            DROPDOWN_FULLWIDTH
        } else {
            DROPDOWN_STANDARD
        }
    }
}

/// `group` attribute updates produced by [`Item::group_children`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupAssignments(Vec<(String, usize)>);

impl GroupAssignments {
    /// `(child path, group index)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.0.iter().map(|(path, group)| (path.as_str(), *group))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Write the group indices into the children held by `store`.
    ///
    /// Returns how many children were found and updated.
    pub fn apply<S: MenuStore + ?Sized>(self, store: &mut S) -> usize {
        let mut applied = 0;
        for (path, group) in self.0 {
            if let Some(child) = store.resolve_mut(&path) {
                child.attrs.group = group;
                applied += 1;
            }
        }
        applied
    }
}

/// Split `name` into `(parent path, alias)`.
///
/// A parent of `"."` is treated as the top level.
#[must_use]
pub fn split_path(name: &str) -> (&str, &str) {
    match name.rsplit_once('/') {
        Some((".", alias)) => ("", alias),
        Some((parent, alias)) => (parent, alias),
        None => ("", name),
    }
}

/// `name` with every non-alphanumeric character replaced by `-`; `"root"`
/// for the empty path.
fn derive_id(name: &str) -> String {
    if name.is_empty() {
        return "root".to_owned();
    }
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

fn capitalize(alias: &str) -> String {
    let mut chars = alias.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
