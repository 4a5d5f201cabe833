#![forbid(unsafe_code)]

//! Save-side normalization of item attributes.
//!
//! Stored menus keep only what differs from the defaults. Comparison with
//! the defaults is loose, the way hand-edited or form-submitted data needs
//! it: `"0"`, `0`, `false` and `""` all count as "off", and numeric strings
//! compare as numbers.

use indexmap::IndexMap;
use navmenu_core::defaults::{DEFAULTS, DefaultValue};
use navmenu_core::{AttributeMap, MenuTree};
use serde_json::Value;

/// Keys dropped from link items unless configured otherwise.
pub const DEFAULT_IGNORE: &[&str] = &["title", "link", "class", "target", "id"];

/// Keys derived from the path or the tree position; never stored.
pub const DERIVED_KEYS: &[&str] = &[
    "id",
    "path",
    "route",
    "alias",
    "parent_id",
    "level",
    "group",
    "current",
    "yaml_path",
    "yaml_alias",
    "tree",
];

/// Host keys carried by imported items but not used by menus.
pub const UNUSED_HOST_KEYS: &[&str] = &["rel", "attr_title"];

/// Configuration for [`export_items`].
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Keys dropped from non-particle items.
    pub ignore: Vec<String>,
    /// Export items whose normalized attributes carry no useful data.
    pub keep_empty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|key| (*key).to_owned()).collect(),
            keep_empty: false,
        }
    }
}

impl ExportConfig {
    #[must_use]
    pub fn ignore<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn keep_empty(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }
}

/// Reduce an attribute map to what needs storing.
///
/// - `link_title` is trimmed.
/// - `ignore` keys are dropped.
/// - Non-null values of boolean-defaulted keys become booleans, then any
///   value loosely equal to its default is dropped.
/// - `object_id` is cast to an integer.
/// - Derived and unused host keys are dropped.
/// - Particles lose `link`; other items lose `title`, `link` and `type`.
#[must_use]
pub fn normalize_item<S: AsRef<str>>(attrs: &AttributeMap, ignore: &[S]) -> AttributeMap {
    let mut item = attrs.clone();

    if let Some(Value::String(title)) = item.get_mut("link_title") {
        *title = title.trim().to_owned();
    }

    for key in ignore {
        item.shift_remove(key.as_ref());
    }

    for (key, default) in DEFAULTS {
        let Some(value) = item.get_mut(*key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        if matches!(default, DefaultValue::Bool(_)) {
            *value = Value::Bool(truthy(value));
        }
        if loosely_equal(value, *default) {
            item.shift_remove(*key);
        }
    }

    if let Some(object_id) = item.get_mut("object_id")
        && !object_id.is_null()
    {
        *object_id = Value::from(cast_int(object_id));
    }

    for key in DERIVED_KEYS.iter().chain(UNUSED_HOST_KEYS) {
        item.shift_remove(*key);
    }

    if item.get("type").and_then(Value::as_str) == Some("particle") {
        item.shift_remove("link");
    } else {
        for key in ["title", "link", "type"] {
            item.shift_remove(key);
        }
    }

    item
}

/// Normalized attributes of every non-root item in `tree`, keyed by path.
///
/// Particles are normalized without the ignore list. An item is exported
/// when it keeps more than one key, or a single key other than
/// `object_id`, unless [`ExportConfig::keep_empty`] is set. A non-empty
/// `yaml_path` attribute replaces the item path as the key.
#[must_use]
pub fn export_items(tree: &MenuTree, config: &ExportConfig) -> IndexMap<String, AttributeMap> {
    let mut items = IndexMap::new();
    for item in tree.iter().filter(|item| !item.path().is_empty()) {
        let attrs = item.to_map(true);
        let meta = if item.kind() == "particle" {
            normalize_item::<&str>(&attrs, &[])
        } else {
            normalize_item(&attrs, config.ignore.as_slice())
        };

        let useful = meta.len() > 1 || (meta.len() == 1 && !meta.contains_key("object_id"));
        if !useful && !config.keep_empty {
            continue;
        }

        let key = match attrs.get("yaml_path").and_then(Value::as_str) {
            Some(path) if !path.is_empty() => path.to_owned(),
            _ => item.path().to_owned(),
        };
        items.insert(key, meta);
    }

    tracing::debug!(exported = items.len(), total = tree.len(), "exported menu items");
    items
}

// ─────────────────────────────────────────────────────────────────────────────
// Loose comparison
// ─────────────────────────────────────────────────────────────────────────────

/// Whether `value` counts as "on".
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// The numeric value of a string that is entirely a decimal number.
fn numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty()
        || !s
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    s.parse().ok()
}

fn loosely_equal(value: &Value, default: DefaultValue) -> bool {
    match default {
        DefaultValue::Null => !truthy(value) && !matches!(value, Value::String(s) if s == "0"),
        DefaultValue::Bool(b) => truthy(value) == b,
        DefaultValue::Int(n) => match value {
            Value::Null => n == 0,
            Value::Bool(b) => *b == (n != 0),
            Value::Number(m) => m.as_f64() == Some(n as f64),
            Value::String(s) => match numeric(s) {
                Some(m) => m == n as f64,
                None => *s == n.to_string(),
            },
            Value::Array(_) | Value::Object(_) => false,
        },
        DefaultValue::Str(d) => match value {
            Value::Null => d.is_empty(),
            Value::Bool(b) => *b == truthy(&Value::String(d.to_owned())),
            Value::Number(m) => numeric(d).is_some_and(|d| m.as_f64() == Some(d)),
            Value::String(s) => match (numeric(s), numeric(d)) {
                (Some(a), Some(b)) => a == b,
                _ => s == d,
            },
            Value::Array(_) | Value::Object(_) => false,
        },
        DefaultValue::EmptyList => match value {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            Value::Number(_) | Value::String(_) => false,
        },
    }
}

/// Integer cast: leading digits of a string, truncation of a float.
fn cast_int(value: &Value) -> i64 {
    match value {
        Value::Null => 0,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim_start();
            let digits = s
                .char_indices()
                .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && matches!(c, '+' | '-')))
                .count();
            s[..digits].parse().unwrap_or(0)
        }
        Value::Array(items) => i64::from(!items.is_empty()),
        Value::Object(map) => i64::from(!map.is_empty()),
    }
}
