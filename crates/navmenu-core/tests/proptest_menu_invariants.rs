//! Property-based invariant tests for menu items.
//!
//! 1. Path splitting: alias is the last segment, parent the rest.
//! 2. `add_child` then `remove_child` restores the child order.
//! 3. Exporting without defaults and re-filling defaults is lossless.
//! 4. Grouping never drops or duplicates a child.
//! 5. `abc` followed by `cba` yields the exact reverse.
//! 6. Grouping and reversing keep the tree valid and each child's group
//!    index equal to its column.

use std::collections::HashSet;

use navmenu_core::defaults::with_defaults;
use navmenu_core::{ChildOrdering, Columns, GroupSpec, Item, MenuTree};
use proptest::prelude::*;
use serde_json::{Value, json};

// ── Helpers ─────────────────────────────────────────────────────────────

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9_-]{0,8}"
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 1..5).prop_map(|segments| segments.join("/"))
}

fn alias_set() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(segment(), 0..12).prop_map(|set| set.into_iter().collect())
}

fn attribute_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (0u32..5).prop_map(|n| json!(n)),
        "[a-z_]{0,6}".prop_map(Value::String),
    ]
}

fn attribute_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("layout".to_owned()),
        Just("target".to_owned()),
        Just("visible".to_owned()),
        Just("enabled".to_owned()),
        Just("icon".to_owned()),
        Just("group".to_owned()),
        Just("title".to_owned()),
        Just("dropdown".to_owned()),
        "x_[a-z]{1,5}",
    ]
}

fn parent_with(aliases: &[String]) -> Item {
    let mut parent = Item::new("menu");
    for alias in aliases {
        let mut child = Item::new(&format!("menu/{alias}"));
        parent.add_child(&mut child);
    }
    parent
}

fn group_specs(aliases: Vec<String>) -> impl Strategy<Value = Vec<GroupSpec>> {
    let choices = if aliases.is_empty() {
        vec!["ghost".to_owned()]
    } else {
        let mut choices = aliases;
        choices.push("ghost".to_owned());
        choices
    };
    prop::collection::vec(
        prop_oneof![
            1 => Just(GroupSpec::Skip),
            4 => prop::collection::vec(prop::sample::select(choices), 0..6)
                .prop_map(GroupSpec::Aliases),
        ],
        0..5,
    )
}

fn aliases_with_specs() -> impl Strategy<Value = (Vec<String>, Vec<GroupSpec>, usize)> {
    alias_set().prop_flat_map(|aliases| {
        let specs = group_specs(aliases.clone());
        (Just(aliases), specs, 0usize..4)
    })
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Path splitting
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn alias_and_parent_from_path(path in path_strategy()) {
        let item = Item::new(&path);
        let segments: Vec<&str> = path.split('/').collect();
        prop_assert_eq!(item.alias(), *segments.last().unwrap());
        let parent = segments[..segments.len() - 1].join("/");
        prop_assert_eq!(item.parent_id(), parent.as_str());
        prop_assert_eq!(item.path(), path.as_str());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. add/remove pair
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn add_then_remove_restores_order(aliases in alias_set(), extra in "new[.][a-z]{1,4}") {
        let mut parent = parent_with(&aliases);
        let before = parent.children_order().clone();

        let mut child = Item::new(&format!("menu/{extra}"));
        parent.add_child(&mut child);
        prop_assert_eq!(child.level(), parent.level() + 1);
        prop_assert_eq!(child.parent_id(), "menu");

        parent.remove_child(&child);
        let after: Vec<_> = parent.children_order().iter().collect();
        let expected: Vec<_> = before.iter().collect();
        prop_assert_eq!(after, expected);
        // The child keeps its adopted level and parent.
        prop_assert_eq!(child.level(), 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Defaults round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stripped_export_refills_to_full_export(
        path in path_strategy(),
        updates in prop::collection::vec((attribute_key(), attribute_value()), 0..8),
    ) {
        let mut item = Item::new(&path);
        for (key, value) in updates {
            item.set(&key, value);
        }
        let full = item.to_map(true);
        let refilled = with_defaults(item.to_map(false));
        prop_assert_eq!(refilled.len(), full.len());
        for (key, value) in &full {
            prop_assert_eq!(refilled.get(key), Some(value), "key {}", key);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Grouping never drops a child
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grouping_keeps_every_child((aliases, specs, columns) in aliases_with_specs()) {
        let mut parent = parent_with(&aliases);
        parent.attributes_mut().columns = Columns::from_widths((0..columns).map(|i| (i, 25.0)));
        let before: HashSet<String> = parent.children_order().values().cloned().collect();

        let assignments = parent.group_children(&specs);

        let order: Vec<String> = parent.children_order().values().cloned().collect();
        let ordered: HashSet<String> = order.iter().cloned().collect();
        prop_assert_eq!(order.len(), before.len());
        prop_assert_eq!(&ordered, &before);

        if before.is_empty() {
            prop_assert!(parent.group_partition().is_empty());
            prop_assert!(assignments.is_empty());
        } else {
            let grouped: Vec<String> = parent.group_partition().iter().flatten().cloned().collect();
            prop_assert_eq!(grouped.len(), before.len(), "no duplicates across groups");
            let grouped: HashSet<String> = grouped.into_iter().collect();
            prop_assert_eq!(&grouped, &before);
            prop_assert!(parent.group_count() >= columns.max(1));
            prop_assert_eq!(assignments.len(), before.len());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. abc / cba are exact reverses
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn abc_then_cba_reverses(aliases in alias_set()) {
        let mut parent = parent_with(&aliases);
        parent.sort_children(&ChildOrdering::Alphabetical);
        let ascending: Vec<String> = parent.children_order().keys().cloned().collect();
        parent.sort_children(&ChildOrdering::ReverseAlphabetical);
        let mut descending: Vec<String> = parent.children_order().keys().cloned().collect();
        descending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    #[test]
    fn reverse_twice_is_identity(aliases in alias_set()) {
        let mut parent = parent_with(&aliases);
        let before = parent.clone();
        let _ = parent.reverse();
        let _ = parent.reverse();
        prop_assert_eq!(parent, before);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Grouping inside a tree stays valid
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grouped_tree_validates(
        (aliases, specs, columns) in aliases_with_specs(),
        reversed in any::<bool>(),
    ) {
        let mut tree = MenuTree::new();
        let mut menu = Item::new("menu");
        menu.attributes_mut().columns = Columns::from_widths((0..columns).map(|i| (i, 10.0)));
        tree.add_child("", menu).unwrap();
        for alias in &aliases {
            tree.add_child("menu", Item::new(&format!("menu/{alias}"))).unwrap();
        }
        tree.group_children("menu", &specs).unwrap();
        if reversed {
            tree.reverse("menu").unwrap();
        }
        prop_assert!(tree.validate().is_empty(), "{:?}", tree.validate());

        let menu = tree.get("menu").unwrap();
        for (index, group) in menu.groups(&tree).iter().enumerate() {
            for child in group {
                prop_assert_eq!(child.group(), index);
            }
        }
    }
}
