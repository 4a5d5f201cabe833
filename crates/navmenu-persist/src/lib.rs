#![forbid(unsafe_code)]

//! Persistence helpers for navmenu trees.
//!
//! - [`definition`]: build a [`MenuTree`](navmenu_core::MenuTree) from a
//!   stored `{items, ordering}` definition and capture one back.
//! - [`flatten`]: flat positions and per-group column counts of an ordering.
//! - [`normalize`]: strip defaults and derived keys before storing items.
//! - [`cache`]: versioned item cache over a pluggable backend.

pub mod cache;
pub mod definition;
pub mod flatten;
pub mod normalize;

pub use cache::{CacheBackend, CacheConfig, CacheError, CacheResult, MemoryCache, MenuCache};
pub use definition::{DefinitionConfig, MenuDefinition, OrderingNode, OrphanPolicy};
pub use flatten::{COLUMNS_COUNT, column_counts, embed_column_counts, flatten_ordering};
pub use normalize::{ExportConfig, export_items, normalize_item};
