#![forbid(unsafe_code)]

//! Core: navigation menu items, the path-keyed menu tree, child ordering,
//! column grouping and the versioned serialized item form.
//!
//! # Example
//!
//! ```
//! use navmenu_core::{GroupSpec, Item, MenuTree};
//!
//! let mut tree = MenuTree::new();
//! tree.add_child("", Item::new("main")).unwrap();
//! for alias in ["team", "history", "contact"] {
//!     tree.add_child("main", Item::new(&format!("main/{alias}"))).unwrap();
//! }
//!
//! tree.group_children("main", &[GroupSpec::aliases(["team"]), GroupSpec::aliases(["history"])])
//!     .unwrap();
//!
//! let main = tree.get("main").unwrap();
//! let groups: Vec<Vec<&str>> = main
//!     .groups(&tree)
//!     .into_iter()
//!     .map(|group| group.into_iter().map(Item::alias).collect())
//!     .collect();
//! assert_eq!(groups, [vec!["team", "contact"], vec!["history"]]);
//! assert_eq!(main.dropdown(), "fullwidth");
//! ```

pub mod attributes;
pub mod codec;
pub mod cursor;
pub mod defaults;
pub mod error;
pub mod item;
pub mod ordering;
pub mod tree;

pub use attributes::{AttributeMap, Attributes, Columns};
pub use codec::{SerializedItem, VERSION};
pub use cursor::ChildCursor;
pub use error::{MenuError, MenuResult};
pub use item::{GroupAssignments, Item};
pub use ordering::{ChildOrdering, GroupSpec};
pub use tree::{MenuStore, MenuTree, Violation};
