use super::*;
use crate::doc::ComponentDef;

fn column_with_text() -> (ComponentTree, NodeId, NodeId) {
    let mut tree = ComponentTree::new();
    let section = tree.append(tree.root(), &ComponentDef::new(ComponentKind::Section)).unwrap();
    let column = tree.append(section, &ComponentDef::new(ComponentKind::Column)).unwrap();
    let text = tree.append(column, &ComponentDef::new(ComponentKind::Text)).unwrap();
    (tree, column, text)
}

#[test]
fn text_selection_offers_column_list() {
    let (tree, column, text) = column_with_text();
    let menu = open_menu(&tree, text).unwrap();
    assert_eq!(menu.title, "Insert into mj-column");
    assert_eq!(menu.target.target, column);
    assert!(menu.target.redirected);
    let kinds: Vec<ComponentKind> = menu.items.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, ComponentKind::Column.child_kinds());
}

#[test]
fn items_carry_labels() {
    let tree = ComponentTree::new();
    let menu = open_menu(&tree, tree.root()).unwrap();
    assert_eq!(menu.title, "Insert into mj-body");
    assert_eq!(
        menu.items[0],
        MenuItem { display_name: "Section", description: "Row container", kind: ComponentKind::Section }
    );
    assert_eq!(menu.items.len(), 3);
}

#[test]
fn offers_only_listed_kinds() {
    let (tree, _, text) = column_with_text();
    let menu = open_menu(&tree, text).unwrap();
    assert!(menu.offers(ComponentKind::Button));
    assert!(!menu.offers(ComponentKind::Section));
}

#[test]
fn menu_reflects_tree_at_call_time() {
    let (mut tree, column, text) = column_with_text();
    let first = open_menu(&tree, text).unwrap();
    tree.remove(column).unwrap();
    assert!(first.target.redirected);
    assert_eq!(open_menu(&tree, text), Err(InsertError::NodeNotFound(text)));
}

#[test]
fn no_valid_insertion_propagates() {
    let mut tree = ComponentTree::new();
    let stray = tree.append(tree.root(), &ComponentDef::new(ComponentKind::Image)).unwrap();
    let nested = tree.append(stray, &ComponentDef::new(ComponentKind::Spacer)).unwrap();
    assert_eq!(open_menu(&tree, nested), Err(InsertError::NoValidInsertion { node: nested }));
}

#[test]
fn menu_serializes_flat_target() {
    let (tree, column, text) = column_with_text();
    let menu = open_menu(&tree, text).unwrap();
    let json = serde_json::to_value(&menu).unwrap();
    assert_eq!(json["title"], "Insert into mj-column");
    assert_eq!(json["target"], serde_json::json!(column));
    assert_eq!(json["redirected"], true);
    assert_eq!(json["items"][0]["kind"], "mj-text");
    assert_eq!(json["items"][0]["display_name"], "Text");
}
