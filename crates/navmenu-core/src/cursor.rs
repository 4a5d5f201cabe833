//! Explicit, position-based iteration over an item's children.
//!
//! Most callers want [`Item::children`] or [`Item::iter`], which are pure
//! and restartable. [`ChildCursor`] exists for renderers that drive the
//! traversal step by step (rewind, advance, inspect).
//!
//! A cursor keeps its own position. Two traversals of the same item need
//! two cursors; a single cursor must not be shared between them.

use crate::item::Item;
use crate::tree::MenuStore;

/// Stateful cursor over the direct children of an [`Item`].
///
/// The item and the store are borrowed for the lifetime of the cursor, so
/// the child order cannot change under it.
pub struct ChildCursor<'a, S: MenuStore + ?Sized> {
    item: &'a Item,
    store: &'a S,
    position: usize,
}

impl<'a, S: MenuStore + ?Sized> ChildCursor<'a, S> {
    /// Create a cursor positioned on the first child.
    #[must_use]
    pub fn new(item: &'a Item, store: &'a S) -> Self {
        Self {
            item,
            store,
            position: 0,
        }
    }

    /// Move back to the first child.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Move to the next child. Advancing past the end is harmless.
    pub fn advance(&mut self) {
        if self.valid() {
            self.position += 1;
        }
    }

    /// Whether the cursor points at a child.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.position < self.item.child_count()
    }

    /// Alias of the current child.
    #[must_use]
    pub fn key(&self) -> Option<&'a str> {
        self.item
            .children_order()
            .get_index(self.position)
            .map(|(alias, _)| alias.as_str())
    }

    /// The current child, resolved through the store.
    ///
    /// `None` past the end, or when the current path does not resolve.
    #[must_use]
    pub fn current(&self) -> Option<&'a Item> {
        let (_, path) = self.item.children_order().get_index(self.position)?;
        self.store.resolve(path)
    }

    /// Zero-based position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of children under the cursor.
    #[must_use]
    pub fn count(&self) -> usize {
        self.item.child_count()
    }
}
