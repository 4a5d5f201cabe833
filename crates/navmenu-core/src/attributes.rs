#![forbid(unsafe_code)]

//! Typed menu item attributes with an open extension map.
//!
//! Known keys (those listed in [`DEFAULTS`](crate::defaults::DEFAULTS)) are
//! stored as typed fields. Any other key is kept verbatim in
//! [`Attributes::extra`] so configuration written for newer layouts passes
//! through untouched.
//!
//! Values arriving through [`Attributes::set`] are coerced best-effort: a
//! menu must always render something, so a value that cannot be coerced is
//! ignored and the previous value stays in place.

use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::defaults::{DEFAULTS, default_for};

/// An ordered attribute bag, as produced by configuration parsing.
pub type AttributeMap = IndexMap<String, Value>;

/// Column widths keyed by column index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Columns(IndexMap<usize, f64>);

impl Columns {
    /// Create an empty column table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(index, width)` pairs.
    #[must_use]
    pub fn from_widths(widths: impl IntoIterator<Item = (usize, f64)>) -> Self {
        Self(widths.into_iter().collect())
    }

    /// Number of configured columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Explicit width of column `index`, if configured.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(&index).copied()
    }

    /// Set the width of column `index`.
    pub fn set(&mut self, index: usize, width: f64) {
        self.0.insert(index, width);
    }

    /// Mirror the widths of columns `0..count` so column `i` takes the width
    /// of column `count - 1 - i`. Columns at `count` and beyond keep their
    /// index.
    pub fn reverse_within(&mut self, count: usize) {
        self.0 = self
            .0
            .iter()
            .rev()
            .map(|(index, width)| {
                let index = if *index < count { count - 1 - index } else { *index };
                (index, *width)
            })
            .collect();
    }

    /// Iterate `(index, width)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().map(|(i, w)| (*i, *w))
    }

    /// Parse a list (`[50, 50]`) or an index-keyed object (`{"0": 50}`).
    ///
    /// Entries whose index or width cannot be read are skipped.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::new()),
            Value::Array(items) => Some(Self(
                items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, w)| number_as_f64(w).map(|w| (i, w)))
                    .collect(),
            )),
            Value::Object(map) => Some(Self(
                map.iter()
                    .filter_map(|(k, w)| {
                        let index = k.trim().parse::<usize>().ok()?;
                        Some((index, number_as_f64(w)?))
                    })
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Export as a list when the indices are `0..n` in order, otherwise as
    /// an object keyed by index.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let sequential = self.0.keys().enumerate().all(|(pos, index)| pos == *index);
        if sequential {
            Value::Array(self.0.values().map(|w| width_value(*w)).collect())
        } else {
            let map: Map<String, Value> = self
                .0
                .iter()
                .map(|(i, w)| (i.to_string(), width_value(*w)))
                .collect();
            Value::Object(map)
        }
    }
}

/// Widths that are whole numbers export as integers so `50` survives a
/// round trip as `50`, not `50.0`.
fn width_value(width: f64) -> Value {
    if width.fract() == 0.0 && width.abs() < i64::MAX as f64 {
        Value::from(width as i64)
    } else {
        Number::from_f64(width).map_or(Value::Null, Value::Number)
    }
}

/// A usable column width: finite and not negative.
fn number_as_f64(value: &Value) -> Option<f64> {
    let width = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }?;
    (width.is_finite() && width >= 0.0).then_some(width)
}

/// The attribute record of a single menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct Attributes {
    pub id: String,
    /// The item type tag (`"link"`, `"particle"`, ...), exported as `type`.
    pub kind: String,
    pub path: String,
    pub alias: String,
    pub title: Option<String>,
    pub link: Option<String>,
    pub parent_id: String,
    pub layout: String,
    pub target: String,
    pub dropdown: String,
    pub icon: String,
    pub image: String,
    pub subtitle: String,
    pub hash: String,
    pub class: String,
    pub icon_only: bool,
    pub enabled: bool,
    pub visible: bool,
    pub group: usize,
    pub columns: Columns,
    pub level: usize,
    pub link_title: String,
    pub anchor_class: String,
    /// Keys outside the default table, in insertion order.
    pub extra: AttributeMap,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: "link".to_owned(),
            path: String::new(),
            alias: String::new(),
            title: None,
            link: None,
            parent_id: String::new(),
            layout: "list".to_owned(),
            target: "_self".to_owned(),
            dropdown: String::new(),
            icon: String::new(),
            image: String::new(),
            subtitle: String::new(),
            hash: String::new(),
            class: String::new(),
            icon_only: false,
            enabled: true,
            visible: true,
            group: 0,
            columns: Columns::new(),
            level: 0,
            link_title: String::new(),
            anchor_class: String::new(),
            extra: AttributeMap::new(),
        }
    }
}

impl Attributes {
    /// Build a record from a full attribute map, including `parent_id`.
    #[must_use]
    pub fn from_map(map: &AttributeMap) -> Self {
        let mut attrs = Self::default();
        attrs.merge(map);
        attrs
    }

    /// Read an attribute by key.
    ///
    /// Known keys always resolve; unknown keys resolve only when present in
    /// the extension map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.known_value(key).or_else(|| self.extra.get(key).cloned())
    }

    /// Write an attribute by key.
    ///
    /// Returns `false` when `key` is known but `value` cannot be coerced to
    /// its type; the previous value is kept in that case.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        let accepted = match key {
            "id" => assign(&mut self.id, coerce_string(&value)),
            "type" => assign(&mut self.kind, coerce_string(&value)),
            "path" => assign(&mut self.path, coerce_string(&value)),
            "alias" => assign(&mut self.alias, coerce_string(&value)),
            "title" => assign(&mut self.title, coerce_opt_string(&value)),
            "link" => assign(&mut self.link, coerce_opt_string(&value)),
            "parent_id" => assign(&mut self.parent_id, coerce_string(&value)),
            "layout" => assign(&mut self.layout, coerce_string(&value)),
            "target" => assign(&mut self.target, coerce_string(&value)),
            "dropdown" => assign(&mut self.dropdown, coerce_string(&value)),
            "icon" => assign(&mut self.icon, coerce_string(&value)),
            "image" => assign(&mut self.image, coerce_string(&value)),
            "subtitle" => assign(&mut self.subtitle, coerce_string(&value)),
            "hash" => assign(&mut self.hash, coerce_string(&value)),
            "class" => assign(&mut self.class, coerce_string(&value)),
            "icon_only" => assign(&mut self.icon_only, Some(coerce_bool(&value))),
            "enabled" => assign(&mut self.enabled, Some(coerce_bool(&value))),
            "visible" => assign(&mut self.visible, Some(coerce_bool(&value))),
            "group" => assign(&mut self.group, coerce_usize(&value)),
            "columns" => assign(&mut self.columns, Columns::from_value(&value)),
            "level" => assign(&mut self.level, coerce_usize(&value)),
            "link_title" => assign(&mut self.link_title, coerce_string(&value)),
            "anchor_class" => assign(&mut self.anchor_class, coerce_string(&value)),
            _ => {
                self.extra.insert(key.to_owned(), value);
                true
            }
        };

        #[cfg(feature = "tracing")]
        if !accepted {
            tracing::warn!(key, path = %self.path, "ignoring attribute value of unexpected type");
        }

        accepted
    }

    /// Merge `data` into the record, overwriting matching keys.
    pub fn merge(&mut self, data: &AttributeMap) {
        for (key, value) in data {
            self.set(key, value.clone());
        }
    }

    /// Export the record as an attribute map.
    ///
    /// With `with_defaults == false`, every known key whose value is exactly
    /// equal to its default is omitted.
    #[must_use]
    pub fn to_map(&self, with_defaults: bool) -> AttributeMap {
        let mut map = AttributeMap::with_capacity(DEFAULTS.len() + self.extra.len());
        for (key, default) in DEFAULTS {
            let Some(value) = self.known_value(key) else {
                continue;
            };
            if !with_defaults && default.matches(&value) {
                continue;
            }
            map.insert((*key).to_owned(), value);
        }
        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }
        map
    }

    fn known_value(&self, key: &str) -> Option<Value> {
        let value = match key {
            "id" => Value::from(self.id.as_str()),
            "type" => Value::from(self.kind.as_str()),
            "path" => Value::from(self.path.as_str()),
            "alias" => Value::from(self.alias.as_str()),
            "title" => self.title.as_deref().map_or(Value::Null, Value::from),
            "link" => self.link.as_deref().map_or(Value::Null, Value::from),
            "parent_id" => Value::from(self.parent_id.as_str()),
            "layout" => Value::from(self.layout.as_str()),
            "target" => Value::from(self.target.as_str()),
            "dropdown" => Value::from(self.dropdown.as_str()),
            "icon" => Value::from(self.icon.as_str()),
            "image" => Value::from(self.image.as_str()),
            "subtitle" => Value::from(self.subtitle.as_str()),
            "hash" => Value::from(self.hash.as_str()),
            "class" => Value::from(self.class.as_str()),
            "icon_only" => Value::Bool(self.icon_only),
            "enabled" => Value::Bool(self.enabled),
            "visible" => Value::Bool(self.visible),
            "group" => Value::from(self.group),
            "columns" => self.columns.to_value(),
            "level" => Value::from(self.level),
            "link_title" => Value::from(self.link_title.as_str()),
            "anchor_class" => Value::from(self.anchor_class.as_str()),
            _ => {
                debug_assert!(default_for(key).is_none(), "unhandled known key {key}");
                return None;
            }
        };
        Some(value)
    }
}

fn assign<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_owned()),
        Value::Bool(false) | Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn coerce_opt_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        other => coerce_string(other).map(Some),
    }
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn coerce_usize(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
            .and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(usize::from(*b)),
        Value::Null => Some(0),
        Value::Array(_) | Value::Object(_) => None,
    }
}
