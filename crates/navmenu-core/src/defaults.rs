#![forbid(unsafe_code)]

//! The global attribute default table.
//!
//! Every [`Item`](crate::item::Item) falls back to this table for attributes
//! that were never set. The table is a `const` slice and is never mutated;
//! `to_map(false)` strips any attribute whose exported value is exactly equal
//! to the entry listed here.

use serde_json::Value;

use crate::attributes::AttributeMap;

/// A default attribute value.
///
/// Kept as a small enum so the table can live in a `const`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Null,
    Bool(bool),
    Int(i64),
    Str(&'static str),
    /// An empty list (`columns`).
    EmptyList,
}

impl DefaultValue {
    /// Materialize the default as a JSON value.
    #[must_use]
    pub fn to_value(self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(b),
            Self::Int(n) => Value::from(n),
            Self::Str(s) => Value::String(s.to_owned()),
            Self::EmptyList => Value::Array(Vec::new()),
        }
    }

    /// Strict equality against an exported value.
    ///
    /// `0` does not match `0.0`, `"0"` or `false`.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Null, Value::Null) => true,
            (Self::Bool(a), Value::Bool(b)) => a == *b,
            (Self::Int(a), Value::Number(n)) => n.as_i64() == Some(a) && !n.is_f64(),
            (Self::Str(a), Value::String(b)) => a == b,
            (Self::EmptyList, Value::Array(items)) => items.is_empty(),
            _ => false,
        }
    }
}

/// Attribute defaults, in export order.
pub const DEFAULTS: &[(&str, DefaultValue)] = &[
    ("id", DefaultValue::Int(0)),
    ("type", DefaultValue::Str("link")),
    ("path", DefaultValue::Null),
    ("alias", DefaultValue::Null),
    ("title", DefaultValue::Null),
    ("link", DefaultValue::Null),
    ("parent_id", DefaultValue::Null),
    ("layout", DefaultValue::Str("list")),
    ("target", DefaultValue::Str("_self")),
    ("dropdown", DefaultValue::Str("")),
    ("icon", DefaultValue::Str("")),
    ("image", DefaultValue::Str("")),
    ("subtitle", DefaultValue::Str("")),
    ("hash", DefaultValue::Str("")),
    ("class", DefaultValue::Str("")),
    ("icon_only", DefaultValue::Bool(false)),
    ("enabled", DefaultValue::Bool(true)),
    ("visible", DefaultValue::Bool(true)),
    ("group", DefaultValue::Int(0)),
    ("columns", DefaultValue::EmptyList),
    ("level", DefaultValue::Int(0)),
    ("link_title", DefaultValue::Str("")),
    ("anchor_class", DefaultValue::Str("")),
];

/// Look up the default for `key`, if the key is part of the table.
#[must_use]
pub fn default_for(key: &str) -> Option<DefaultValue> {
    DEFAULTS
        .iter()
        .find_map(|(name, value)| (*name == key).then_some(*value))
}

/// Whether `key` is one of the known attribute keys.
#[must_use]
pub fn is_known(key: &str) -> bool {
    default_for(key).is_some()
}

/// Fill every key missing from `map` with its default.
///
/// Keys already present are left untouched. Missing defaults are appended
/// in table order after the existing keys.
#[must_use]
pub fn with_defaults(mut map: AttributeMap) -> AttributeMap {
    for (key, value) in DEFAULTS {
        if !map.contains_key(*key) {
            map.insert((*key).to_owned(), value.to_value());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn table_has_unique_keys() {
        for (i, (a, _)) in DEFAULTS.iter().enumerate() {
            for (b, _) in &DEFAULTS[i + 1..] {
                assert_ne!(a, b, "duplicate default key {a}");
            }
        }
    }

    #[test]
    fn strict_matching() {
        assert!(DefaultValue::Int(0).matches(&json!(0)));
        assert!(!DefaultValue::Int(0).matches(&json!(0.0)));
        assert!(!DefaultValue::Int(0).matches(&json!("0")));
        assert!(!DefaultValue::Null.matches(&json!("")));
        assert!(DefaultValue::Str("").matches(&json!("")));
        assert!(!DefaultValue::Bool(false).matches(&json!(0)));
        assert!(DefaultValue::EmptyList.matches(&json!([])));
        assert!(!DefaultValue::EmptyList.matches(&json!({})));
    }

    #[test]
    fn with_defaults_keeps_existing() {
        let mut map = AttributeMap::new();
        map.insert("layout".into(), json!("grid"));
        let merged = with_defaults(map);
        assert_eq!(merged["layout"], json!("grid"));
        assert_eq!(merged["target"], json!("_self"));
        assert_eq!(merged.len(), DEFAULTS.len());
    }

    #[test]
    fn lookup() {
        assert_eq!(default_for("visible"), Some(DefaultValue::Bool(true)));
        assert_eq!(default_for("nope"), None);
        assert!(is_known("anchor_class"));
    }
}
