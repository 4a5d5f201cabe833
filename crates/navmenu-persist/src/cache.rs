#![forbid(unsafe_code)]

//! Versioned item cache.
//!
//! [`MenuCache`] stores each item in its serialized form under
//! `<prefix>::<path>` in a pluggable [`CacheBackend`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `CacheError::Backend` | Backend unavailable, lock poisoned | Returns error, nothing applied |
//! | `CacheError::Menu` | Stale version, malformed payload | Returns error, entry never applied |
//! | Missing entry | First run, evicted, new path | `Ok(None)` |

use std::fmt;
use std::sync::RwLock;

use indexmap::IndexMap;
use navmenu_core::{Item, MenuError, MenuTree};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from cache operations.
#[derive(Debug)]
pub enum CacheError {
    /// The backend failed to read or write.
    Backend(String),
    /// A cached entry could not be encoded or decoded.
    Menu(MenuError),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Backend(msg) => write!(f, "cache backend error: {msg}"),
            CacheError::Menu(e) => write!(f, "cached menu item rejected: {e}"),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Backend(_) => None,
            CacheError::Menu(e) => Some(e),
        }
    }
}

impl From<MenuError> for CacheError {
    fn from(e: MenuError) -> Self {
        CacheError::Menu(e)
    }
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

// ─────────────────────────────────────────────────────────────────────────────
// Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Key/value storage for serialized items.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait CacheBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// The payload stored under `key`, if any.
    fn load(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `payload` under `key`, replacing any previous entry.
    fn store(&self, key: &str, payload: String) -> CacheResult<()>;

    /// Remove the entry under `key`. Returns whether one existed.
    fn remove(&self, key: &str) -> CacheResult<bool>;

    /// Remove every entry.
    fn clear(&self) -> CacheResult<()>;

    /// Every stored key, in insertion order where the backend keeps one.
    fn keys(&self) -> CacheResult<Vec<String>>;
}

/// In-memory backend. Entries are lost when the process exits.
#[derive(Default)]
pub struct MemoryCache {
    data: RwLock<IndexMap<String, String>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> CacheError {
    CacheError::Backend("lock poisoned".into())
}

impl CacheBackend for MemoryCache {
    fn name(&self) -> &str {
        "MemoryCache"
    }

    fn load(&self, key: &str) -> CacheResult<Option<String>> {
        let guard = self.data.read().map_err(|_| poisoned())?;
        Ok(guard.get(key).cloned())
    }

    fn store(&self, key: &str, payload: String) -> CacheResult<()> {
        let mut guard = self.data.write().map_err(|_| poisoned())?;
        guard.insert(key.to_owned(), payload);
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<bool> {
        let mut guard = self.data.write().map_err(|_| poisoned())?;
        Ok(guard.shift_remove(key).is_some())
    }

    fn clear(&self) -> CacheResult<()> {
        let mut guard = self.data.write().map_err(|_| poisoned())?;
        guard.clear();
        Ok(())
    }

    fn keys(&self) -> CacheResult<Vec<String>> {
        let guard = self.data.read().map_err(|_| poisoned())?;
        Ok(guard.keys().cloned().collect())
    }
}

impl fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryCache")
            .field("entries", &count)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Menu Cache
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for [`MenuCache`].
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Namespace prepended to every item path.
    pub prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: "menu".into(),
        }
    }
}

impl CacheConfig {
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Stores menu items in their versioned serialized form.
pub struct MenuCache<B: CacheBackend> {
    backend: B,
    config: CacheConfig,
}

impl<B: CacheBackend> MenuCache<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, CacheConfig::default())
    }

    #[must_use]
    pub fn with_config(backend: B, config: CacheConfig) -> Self {
        Self { backend, config }
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The backend key for the item at `path`.
    #[must_use]
    pub fn key(&self, path: &str) -> String {
        format!("{}::{path}", self.config.prefix)
    }

    /// Encode and store `item` under its path.
    pub fn save(&self, item: &Item) -> CacheResult<()> {
        let payload = item.encode()?;
        self.backend.store(&self.key(item.path()), payload)?;
        tracing::debug!(backend = %self.backend.name(), path = item.path(), "cached menu item");
        Ok(())
    }

    /// The cached item at `path`.
    ///
    /// A missing entry is `Ok(None)`. An entry written at another version
    /// or otherwise invalid is an error and is left in place.
    pub fn restore(&self, path: &str) -> CacheResult<Option<Item>> {
        let key = self.key(path);
        let Some(payload) = self.backend.load(&key)? else {
            return Ok(None);
        };
        Item::decode(&payload).map(Some).map_err(|e| {
            tracing::warn!(key = %key, error = %e, "rejected cached menu item");
            CacheError::Menu(e)
        })
    }

    /// Drop the cached item at `path`. Returns whether one existed.
    pub fn invalidate(&self, path: &str) -> CacheResult<bool> {
        self.backend.remove(&self.key(path))
    }

    /// Cache every item of `tree`. Returns how many were stored.
    pub fn save_tree(&self, tree: &MenuTree) -> CacheResult<usize> {
        let mut saved = 0;
        for item in tree.iter() {
            self.save(item)?;
            saved += 1;
        }
        tracing::debug!(backend = %self.backend.name(), items = saved, "cached menu tree");
        Ok(saved)
    }

    /// Rebuild a tree from every item cached under this prefix.
    ///
    /// `Ok(None)` when nothing is cached. Any rejected entry fails the
    /// whole restore.
    pub fn restore_tree(&self) -> CacheResult<Option<MenuTree>> {
        let namespace = format!("{}::", self.config.prefix);
        let mut items = Vec::new();
        for key in self.backend.keys()? {
            let Some(path) = key.strip_prefix(&namespace) else {
                continue;
            };
            if let Some(item) = self.restore(path)? {
                items.push(item);
            }
        }
        if items.is_empty() {
            return Ok(None);
        }
        tracing::debug!(backend = %self.backend.name(), items = items.len(), "restored menu tree");
        Ok(Some(items.into_iter().collect()))
    }
}

impl<B: CacheBackend> fmt::Debug for MenuCache<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuCache")
            .field("backend", &self.backend.name())
            .field("prefix", &self.config.prefix)
            .finish()
    }
}
