use super::*;

fn text(content: &str) -> ComponentDef {
    ComponentDef::new(ComponentKind::Text).with_content(content)
}

/// body > section > column > [a, b, c]
fn column_with_texts() -> (ComponentTree, NodeId, Vec<NodeId>) {
    let mut tree = ComponentTree::new();
    let section = tree.append(tree.root(), &ComponentDef::new(ComponentKind::Section)).unwrap();
    let column = tree.append(section, &ComponentDef::new(ComponentKind::Column)).unwrap();
    let ids = ["a", "b", "c"]
        .iter()
        .map(|c| tree.append(column, &text(c)).unwrap())
        .collect();
    (tree, column, ids)
}

fn contents(tree: &ComponentTree, parent: NodeId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .map(|id| tree.get(*id).unwrap().content.clone().unwrap_or_default())
        .collect()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_tree_has_only_body() {
    let tree = ComponentTree::new();
    assert_eq!(tree.len(), 1);
    assert!(tree.is_empty());
    assert_eq!(tree.tag(tree.root()), Some(&Tag::Known(ComponentKind::Body)));
    assert_eq!(tree.parent(tree.root()), None);
}

#[test]
fn append_materializes_nested_definition() {
    let mut tree = ComponentTree::new();
    let def = ComponentDef::new(ComponentKind::Section)
        .with_attr("padding", "0")
        .with_child(ComponentDef::new(ComponentKind::Column).with_child(text("hi")));
    let section = tree.append(tree.root(), &def).unwrap();

    assert_eq!(tree.len(), 4);
    assert_eq!(tree.children(tree.root()), &[section]);
    let column = tree.children(section)[0];
    assert_eq!(tree.parent(column), Some(section));
    let leaf = tree.get(tree.children(column)[0]).unwrap();
    assert_eq!(leaf.content.as_deref(), Some("hi"));
    assert_eq!(tree.get(section).unwrap().attributes.get("padding").map(String::as_str), Some("0"));
}

#[test]
fn append_to_missing_parent_fails() {
    let mut tree = ComponentTree::new();
    let ghost = Uuid::new_v4();
    assert_eq!(tree.append(ghost, &text("x")), Err(DocError::NotFound(ghost)));
    assert_eq!(tree.len(), 1);
}

#[test]
fn from_def_round_trips_snapshot() {
    let (tree, _, _) = column_with_texts();
    let snapshot = tree.snapshot();
    let rebuilt = ComponentTree::from_def(&snapshot);
    assert_eq!(rebuilt.snapshot(), snapshot);
    assert_eq!(rebuilt.len(), tree.len());
}

#[test]
fn from_def_wraps_non_body_root() {
    let tree = ComponentTree::from_def(&ComponentDef::new(ComponentKind::Section));
    let child = tree.children(tree.root())[0];
    assert_eq!(tree.tag(child), Some(&Tag::Known(ComponentKind::Section)));
}

// =============================================================
// Lookup
// =============================================================

#[test]
fn index_of_reports_position() {
    let (tree, column, ids) = column_with_texts();
    assert_eq!(tree.index_of(column, ids[0]), Some(0));
    assert_eq!(tree.index_of(column, ids[2]), Some(2));
    assert_eq!(tree.index_of(tree.root(), ids[0]), None);
}

#[test]
fn walk_is_preorder() {
    let (tree, column, ids) = column_with_texts();
    let order = tree.walk();
    assert_eq!(order[0], tree.root());
    let col_pos = order.iter().position(|id| *id == column).unwrap();
    assert_eq!(&order[col_pos + 1..], ids.as_slice());
}

// =============================================================
// move_to
// =============================================================

#[test]
fn move_to_reorders_siblings() {
    let (mut tree, column, ids) = column_with_texts();
    tree.move_to(ids[2], 1).unwrap();
    assert_eq!(contents(&tree, column), vec!["a", "c", "b"]);
}

#[test]
fn move_to_last_position() {
    let (mut tree, column, ids) = column_with_texts();
    tree.move_to(ids[0], 2).unwrap();
    assert_eq!(contents(&tree, column), vec!["b", "c", "a"]);
}

#[test]
fn move_to_out_of_range_leaves_tree_unchanged() {
    let (mut tree, column, ids) = column_with_texts();
    assert_eq!(tree.move_to(ids[0], 3), Err(DocError::IndexOutOfRange { index: 3, len: 3 }));
    assert_eq!(contents(&tree, column), vec!["a", "b", "c"]);
}

#[test]
fn move_root_is_refused() {
    let mut tree = ComponentTree::new();
    let root = tree.root();
    assert_eq!(tree.move_to(root, 0), Err(DocError::RootImmutable));
}

// =============================================================
// remove / clear
// =============================================================

#[test]
fn remove_drops_whole_subtree() {
    let (mut tree, column, _) = column_with_texts();
    let section = tree.parent(column).unwrap();
    let removed = tree.remove(section).unwrap();
    assert_eq!(removed.tag, Tag::Known(ComponentKind::Section));
    assert_eq!(removed.components[0].components.len(), 3);
    assert_eq!(tree.len(), 1);
    assert!(!tree.contains(column));
}

#[test]
fn remove_root_is_refused() {
    let mut tree = ComponentTree::new();
    let root = tree.root();
    assert_eq!(tree.remove(root), Err(DocError::RootImmutable));
}

#[test]
fn remove_missing_node_fails() {
    let mut tree = ComponentTree::new();
    let ghost = Uuid::new_v4();
    assert_eq!(tree.remove(ghost), Err(DocError::NotFound(ghost)));
}

#[test]
fn clear_keeps_body() {
    let (mut tree, _, _) = column_with_texts();
    let root = tree.root();
    tree.clear();
    assert_eq!(tree.len(), 1);
    assert!(tree.is_empty());
    assert_eq!(tree.root(), root);
}

// =============================================================
// apply_patch
// =============================================================

#[test]
fn patch_sets_content_and_merges_attributes() {
    let mut tree = ComponentTree::new();
    let button = tree
        .append(
            tree.root(),
            &ComponentDef::new(ComponentKind::Button).with_content("Go").with_attr("href", "#").with_attr("color", "red"),
        )
        .unwrap();

    let mut patch = NodePatch { content: Some("Buy".into()), ..Default::default() };
    patch.attributes.insert("href".into(), Some("https://example.com".into()));
    patch.attributes.insert("color".into(), None);
    tree.apply_patch(button, &patch).unwrap();

    let node = tree.get(button).unwrap();
    assert_eq!(node.content.as_deref(), Some("Buy"));
    assert_eq!(node.attributes.get("href").map(String::as_str), Some("https://example.com"));
    assert!(!node.attributes.contains_key("color"));
}

#[test]
fn patch_missing_node_is_not_found() {
    let mut tree = ComponentTree::new();
    let missing = Uuid::new_v4();
    assert_eq!(tree.apply_patch(missing, &NodePatch::default()), Err(DocError::NotFound(missing)));
}

#[test]
fn patch_content_on_container_is_rejected() {
    let (mut tree, column, _) = column_with_texts();
    let patch = NodePatch { content: Some("swallow the children".into()), ..Default::default() };

    let err = tree.apply_patch(column, &patch).unwrap_err();

    assert!(matches!(err, DocError::ContentNotAllowed { node, .. } if node == column));
    assert!(tree.get(column).unwrap().content.is_none());
    assert_eq!(contents(&tree, column), ["a", "b", "c"]);
}

#[test]
fn patch_content_on_unknown_tag_is_allowed() {
    let mut tree = ComponentTree::new();
    let other = tree.append(tree.root(), &ComponentDef::new("x-widget")).unwrap();
    let patch = NodePatch { content: Some("<b>hi</b>".into()), ..Default::default() };
    tree.apply_patch(other, &patch).unwrap();
    assert_eq!(tree.get(other).unwrap().content.as_deref(), Some("<b>hi</b>"));
}

#[test]
fn patch_bad_attribute_name_leaves_node_untouched() {
    let mut tree = ComponentTree::new();
    let button = tree.append(tree.root(), &ComponentDef::new(ComponentKind::Button).with_content("Go")).unwrap();
    let mut patch = NodePatch { content: Some("Changed".into()), ..Default::default() };
    patch.attributes.insert("href".into(), Some("#".into()));
    patch.attributes.insert("a\"><mj-raw".into(), Some("x".into()));

    let err = tree.apply_patch(button, &patch).unwrap_err();

    assert_eq!(err, DocError::InvalidAttributeName("a\"><mj-raw".into()));
    let node = tree.get(button).unwrap();
    assert_eq!(node.content.as_deref(), Some("Go"));
    assert!(node.attributes.is_empty());
}

#[test]
fn name_validation() {
    assert!(is_valid_name("background-url"));
    assert!(is_valid_name("css-class"));
    assert!(is_valid_name("xml:lang"));
    assert!(!is_valid_name(""));
    assert!(!is_valid_name("has space"));
    assert!(!is_valid_name("a\">"));
}

// =============================================================
// Serde
// =============================================================

#[test]
fn definition_uses_wire_field_names() {
    let def = ComponentDef::new(ComponentKind::Image).with_attr("src", "x.png");
    let json = serde_json::to_value(&def).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "mj-image", "attributes": { "src": "x.png" } }));
}

#[test]
fn definition_deserializes_with_defaults() {
    let def: ComponentDef = serde_json::from_str(r#"{"type":"mj-section","components":[{"type":"mj-column"}]}"#).unwrap();
    assert_eq!(def.tag, Tag::Known(ComponentKind::Section));
    assert!(def.content.is_none());
    assert_eq!(def.components.len(), 1);
}

#[test]
fn view_carries_ids() {
    let (tree, column, ids) = column_with_texts();
    let view = tree.view(column).unwrap();
    assert_eq!(view.id, column);
    let child_ids: Vec<NodeId> = view.components.iter().map(|v| v.id).collect();
    assert_eq!(child_ids, ids);
    let json = serde_json::to_value(&view.components[0]).unwrap();
    assert_eq!(json["type"], "mj-text");
    assert_eq!(json["content"], "a");
    assert!(tree.view(Uuid::new_v4()).is_none());
}
