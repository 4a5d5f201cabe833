#![forbid(unsafe_code)]

//! Child ordering and column grouping specifications.
//!
//! # Merge rule
//!
//! Explicit orderings never add or drop children. Given the current
//! `alias -> path` map, an explicit alias list produces:
//!
//! 1. the listed aliases that exist, in list order (duplicates collapse to
//!    their first position), then
//! 2. every unlisted child, in its original order.
//!
//! Grouping uses only the first half of the rule per group and leaves the
//! rest in the pool for later groups.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde_json::Value;

/// How to reorder an item's direct children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildOrdering {
    /// Listed aliases first, in this order; unlisted children keep their order.
    Explicit(Vec<String>),
    /// The `abc` tag: natural ascending order by alias.
    Alphabetical,
    /// The `cba` tag: natural descending order by alias.
    ReverseAlphabetical,
    /// Any other tag. Sorting with it is a no-op.
    Unrecognized(String),
}

impl ChildOrdering {
    /// Build an explicit ordering from a list of aliases.
    #[must_use]
    pub fn explicit<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(aliases.into_iter().map(Into::into).collect())
    }

    /// Interpret a symbolic tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "abc" => Self::Alphabetical,
            "cba" => Self::ReverseAlphabetical,
            other => Self::Unrecognized(other.to_owned()),
        }
    }

    /// Interpret parsed configuration data.
    ///
    /// An object is an `alias -> path` mapping (keys give the order), a list
    /// of strings is a plain alias order, and a string is a tag.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Explicit(map.keys().cloned().collect()),
            Value::Array(items) => Self::Explicit(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect(),
            ),
            Value::String(tag) => Self::from_tag(tag),
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

impl From<&str> for ChildOrdering {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

/// The ordering of one column group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSpec {
    /// Aliases assigned to this group, in display order.
    Aliases(Vec<String>),
    /// Not an ordering; the group index stays empty.
    Skip,
}

impl GroupSpec {
    #[must_use]
    pub fn aliases<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Aliases(aliases.into_iter().map(Into::into).collect())
    }

    /// Only an `alias -> path` object is a group ordering; anything else is
    /// skipped.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Aliases(map.keys().cloned().collect()),
            _ => Self::Skip,
        }
    }
}

/// The children of `pool` named in `order`, in `order`'s order.
///
/// Paths come from `pool`; names missing from `pool` are dropped.
pub(crate) fn select(order: &[String], pool: &IndexMap<String, String>) -> IndexMap<String, String> {
    let mut selected = IndexMap::with_capacity(order.len().min(pool.len()));
    for alias in order {
        if selected.contains_key(alias) {
            continue;
        }
        if let Some(path) = pool.get(alias) {
            selected.insert(alias.clone(), path.clone());
        }
    }
    selected
}

/// Apply the explicit merge rule: selected entries first, then the rest.
pub(crate) fn merge_explicit(
    order: &[String],
    pool: &IndexMap<String, String>,
) -> IndexMap<String, String> {
    let mut merged = select(order, pool);
    for (alias, path) in pool {
        if !merged.contains_key(alias) {
            merged.insert(alias.clone(), path.clone());
        }
    }
    merged
}

/// Natural string comparison: digit runs compare by numeric value.
///
/// `item2` sorts before `item10`. Runs with equal numeric value but
/// different spelling (`a01` / `a1`) fall back to a bytewise comparison, so
/// the result is a total order and two distinct strings never compare equal.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);
    for (x, y) in left.iter().zip(&right) {
        let ord = if is_digits(x) && is_digits(y) {
            cmp_digits(x, y)
        } else {
            x.cmp(y)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}

fn is_digits(chunk: &str) -> bool {
    chunk.bytes().all(|b| b.is_ascii_digit())
}

fn cmp_digits(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Split into alternating digit / non-digit runs.
fn chunks(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        if let Some(was_digit) = prev
            && was_digit != digit
        {
            out.push(&s[start..i]);
            start = i;
        }
        prev = Some(digit);
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pool(aliases: &[&str]) -> IndexMap<String, String> {
        aliases
            .iter()
            .map(|a| ((*a).to_owned(), format!("menu/{a}")))
            .collect()
    }

    #[test]
    fn natural_order() {
        let mut names = vec!["item10", "item2", "Item1", "item1", "a01", "a1"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, ["Item1", "a01", "a1", "item1", "item2", "item10"]);
    }

    #[test]
    fn natural_cmp_is_total() {
        assert_eq!(natural_cmp("x", "x"), Ordering::Equal);
        assert_ne!(natural_cmp("a01", "a1"), Ordering::Equal);
        assert_eq!(natural_cmp("a01", "a1"), natural_cmp("a1", "a01").reverse());
    }

    #[test]
    fn merge_keeps_unlisted_children() {
        let merged = merge_explicit(
            &["c".into(), "ghost".into(), "a".into(), "c".into()],
            &pool(&["a", "b", "c"]),
        );
        let order: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(order, ["c", "a", "b"]);
        assert_eq!(merged["c"], "menu/c");
    }

    #[test]
    fn select_drops_unknown() {
        let picked = select(&["z".into(), "b".into()], &pool(&["a", "b"]));
        assert_eq!(picked.len(), 1);
        assert_eq!(picked["b"], "menu/b");
    }

    #[test]
    fn ordering_from_value() {
        assert_eq!(
            ChildOrdering::from_value(&json!({"b": "m/b", "a": "m/a"})),
            ChildOrdering::explicit(["b", "a"])
        );
        assert_eq!(
            ChildOrdering::from_value(&json!(["x", 1, "y"])),
            ChildOrdering::explicit(["x", "y"])
        );
        assert_eq!(ChildOrdering::from("cba"), ChildOrdering::ReverseAlphabetical);
        assert!(matches!(
            ChildOrdering::from_value(&json!("zyx")),
            ChildOrdering::Unrecognized(tag) if tag == "zyx"
        ));
    }

    #[test]
    fn group_spec_from_value() {
        assert_eq!(
            GroupSpec::from_value(&json!({"team": "about/team"})),
            GroupSpec::aliases(["team"])
        );
        assert_eq!(GroupSpec::from_value(&json!(["team"])), GroupSpec::Skip);
        assert_eq!(GroupSpec::from_value(&Value::Null), GroupSpec::Skip);
    }
}
