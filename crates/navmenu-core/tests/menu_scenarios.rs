#![forbid(unsafe_code)]

//! End-to-end menu scenarios.
//!
//! ```sh
//! cargo test -p navmenu-core --test menu_scenarios
//! ```

use navmenu_core::{
    AttributeMap, ChildOrdering, GroupSpec, Item, MenuError, MenuStore, MenuTree, SerializedItem,
    VERSION,
};
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn about_tree() -> MenuTree {
    let mut tree = MenuTree::new();
    tree.add_child("", Item::new("main")).unwrap();

    let mut about = Item::new("main/about");
    about.set("columns", json!({"0": 50, "1": 50}));
    tree.add_child("main", about).unwrap();
    for alias in ["team", "history", "contact"] {
        tree.add_child("main/about", Item::new(&format!("main/about/{alias}")))
            .unwrap();
    }
    tree
}

fn group_aliases(item: &Item, tree: &MenuTree) -> Vec<Vec<String>> {
    item.groups(tree)
        .into_iter()
        .map(|group| group.into_iter().map(|i| i.alias().to_owned()).collect())
        .collect()
}

// ============================================================================
// Grouping
// ============================================================================

#[test]
fn leftover_child_joins_first_group() {
    let mut tree = about_tree();
    let mut first = AttributeMap::new();
    first.insert("team".into(), json!("main/about/team"));
    let mut second = AttributeMap::new();
    second.insert("history".into(), json!("main/about/history"));

    let specs = [
        GroupSpec::from_value(&json!(first)),
        GroupSpec::from_value(&json!(second)),
    ];
    tree.group_children("main/about", &specs).unwrap();

    let about = tree.get("main/about").unwrap();
    assert_eq!(
        group_aliases(about, &tree),
        [vec!["team", "contact"], vec!["history"]]
    );
    let order: Vec<&str> = about.children_order().keys().map(String::as_str).collect();
    assert_eq!(order, ["team", "history", "contact"]);
    assert_eq!(about.dropdown(), "fullwidth");
    assert_eq!(tree.get("main/about/history").unwrap().group(), 1);
    assert!(tree.validate().is_empty());
}

#[test]
fn get_group_out_of_range_is_empty() {
    let tree = about_tree();
    let about = tree.get("main/about").unwrap();
    assert_eq!(about.get_group(0, &tree).len(), 3);
    assert!(about.get_group(5, &tree).is_empty());
}

#[test]
fn column_width_defaults_to_even_split() {
    let mut tree = about_tree();
    tree.get_mut("main/about")
        .unwrap()
        .attributes_mut()
        .columns = Default::default();
    tree.group_children(
        "main/about",
        &[GroupSpec::aliases(["team"]), GroupSpec::aliases(["history"])],
    )
    .unwrap();
    let about = tree.get("main/about").unwrap();
    assert_eq!(about.column_width(0), 50.0);
    assert_eq!(about.column_width(1), 50.0);
}

// ============================================================================
// Relationships and ordering
// ============================================================================

#[test]
fn tree_navigation() {
    let tree = about_tree();
    let team = tree.get("main/about/team").unwrap();
    let about = team.parent(&tree).unwrap();
    assert_eq!(about.path(), "main/about");
    assert_eq!(about.parent(&tree).unwrap().path(), "main");
    assert_eq!(team.level(), 3);
    let titles: Vec<&str> = about
        .children(&tree)
        .into_iter()
        .filter_map(Item::title)
        .collect();
    assert_eq!(titles, ["Team", "History", "Contact"]);
    assert_eq!(tree.paths().len(), 6);
}

#[test]
fn sort_then_group_then_reverse() {
    let mut tree = about_tree();
    tree.sort_children("main/about", &ChildOrdering::Alphabetical)
        .unwrap();
    let about = tree.get("main/about").unwrap();
    let order: Vec<&str> = about.children_order().keys().map(String::as_str).collect();
    assert_eq!(order, ["contact", "history", "team"]);

    tree.reverse("main/about").unwrap();
    let about = tree.get("main/about").unwrap();
    let order: Vec<&str> = about.children_order().keys().map(String::as_str).collect();
    assert_eq!(order, ["team", "history", "contact"]);

    assert!(matches!(
        tree.sort_children("missing", &ChildOrdering::Alphabetical),
        Err(MenuError::UnknownPath(_))
    ));
}

#[test]
fn particle_items_keep_opaque_attributes() {
    let mut overrides = AttributeMap::new();
    overrides.insert("type".into(), json!("particle"));
    overrides.insert("particle".into(), json!({"type": "logo", "image": "logo.svg"}));
    let item = Item::with_attributes("main/logo", &overrides);
    assert_eq!(item.kind(), "particle");
    let exported = item.to_map(false);
    assert_eq!(exported["type"], json!("particle"));
    assert_eq!(exported["particle"]["image"], json!("logo.svg"));
}

// ============================================================================
// Serialization
// ============================================================================

#[test]
fn stale_version_is_a_format_error() {
    let tree = about_tree();
    let mut packed = SerializedItem::pack(tree.get("main/about").unwrap());
    packed.version = 0;
    let payload = serde_json::to_string(&packed).unwrap();
    assert_eq!(VERSION, 1);
    assert!(matches!(
        Item::decode(&payload),
        Err(MenuError::Format { .. })
    ));
}

#[test]
fn decoded_item_resolves_against_tree() {
    let mut tree = about_tree();
    tree.group_children("main/about", &[GroupSpec::aliases(["contact"])])
        .unwrap();
    let payload = tree.get("main/about").unwrap().encode().unwrap();
    let decoded = Item::decode(&payload).unwrap();
    assert_eq!(
        group_aliases(&decoded, &tree),
        [vec!["contact", "team", "history"], vec![]]
    );
}
