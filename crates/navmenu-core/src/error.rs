//! Error types for menu operations.

use std::fmt;

/// Errors surfaced by the menu core.
///
/// Construction and attribute coercion never fail; these errors come from
/// decoding serialized items and from tree operations naming a path that is
/// not registered.
#[derive(Debug)]
pub enum MenuError {
    /// Serialized data is missing its version tag, carries a different
    /// version, or does not have the expected shape.
    Format { reason: String },
    /// The payload is not valid JSON.
    Json(serde_json::Error),
    /// No item is registered under this path.
    UnknownPath(String),
}

impl MenuError {
    pub(crate) fn format(reason: impl Into<String>) -> Self {
        Self::Format {
            reason: reason.into(),
        }
    }

    /// Whether this is a format (stale or malformed payload) error.
    #[must_use]
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::Json(_))
    }
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::Format { reason } => write!(f, "serialized data is not valid: {reason}"),
            MenuError::Json(e) => write!(f, "serialized data is not valid: {e}"),
            MenuError::UnknownPath(path) => write!(f, "no menu item at path {path:?}"),
        }
    }
}

impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MenuError::Json(e) => Some(e),
            MenuError::Format { .. } | MenuError::UnknownPath(_) => None,
        }
    }
}

impl From<serde_json::Error> for MenuError {
    fn from(e: serde_json::Error) -> Self {
        MenuError::Json(e)
    }
}

/// Result type for menu operations.
pub type MenuResult<T> = Result<T, MenuError>;
