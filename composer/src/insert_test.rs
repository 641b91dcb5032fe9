use uuid::Uuid;

use super::*;
use crate::doc::ComponentDef;
use crate::kind::Tag;
use crate::validate::is_valid;

/// body > section > [column A, column B], column A > text
struct Fixture {
    tree: ComponentTree,
    section: NodeId,
    column_a: NodeId,
    column_b: NodeId,
    text: NodeId,
}

fn fixture() -> Fixture {
    let mut tree = ComponentTree::new();
    let section = tree.append(tree.root(), &ComponentDef::new(ComponentKind::Section)).unwrap();
    let column_a = tree.append(section, &ComponentDef::new(ComponentKind::Column)).unwrap();
    let column_b = tree.append(section, &ComponentDef::new(ComponentKind::Column)).unwrap();
    let text = tree
        .append(column_a, &ComponentDef::new(ComponentKind::Text).with_content("hello"))
        .unwrap();
    Fixture { tree, section, column_a, column_b, text }
}

// =============================================================
// resolve_insertion_target
// =============================================================

#[test]
fn container_targets_itself() {
    let f = fixture();
    let target = resolve_insertion_target(&f.tree, f.section).unwrap();
    assert_eq!(target.target, f.section);
    assert_eq!(target.selected, f.section);
    assert!(!target.redirected);
    assert_eq!(target.candidates, ComponentKind::Section.child_kinds());
}

#[test]
fn leaf_redirects_to_parent() {
    let f = fixture();
    let target = resolve_insertion_target(&f.tree, f.text).unwrap();
    assert_eq!(target.target, f.column_a);
    assert_eq!(target.selected, f.text);
    assert!(target.redirected);
    assert_eq!(target.candidates, ComponentKind::Column.child_kinds());
}

#[test]
fn leaf_under_leaf_has_no_valid_insertion() {
    let mut tree = ComponentTree::new();
    let odd = tree.append(tree.root(), &ComponentDef::new(ComponentKind::Text)).unwrap();
    let nested = tree.append(odd, &ComponentDef::new(ComponentKind::Image)).unwrap();
    assert_eq!(
        resolve_insertion_target(&tree, nested),
        Err(InsertError::NoValidInsertion { node: nested })
    );
}

#[test]
fn unknown_leaf_without_container_parent_fails() {
    let mut tree = ComponentTree::new();
    let mystery = tree.append(tree.root(), &ComponentDef::new("mj-mystery")).unwrap();
    let inner = tree.append(mystery, &ComponentDef::new("mj-other")).unwrap();
    assert!(matches!(
        resolve_insertion_target(&tree, inner),
        Err(InsertError::NoValidInsertion { .. })
    ));
}

#[test]
fn body_targets_itself() {
    let tree = ComponentTree::new();
    let target = resolve_insertion_target(&tree, tree.root()).unwrap();
    assert_eq!(target.target, tree.root());
    assert!(!target.redirected);
}

#[test]
fn missing_selection_is_not_found() {
    let tree = ComponentTree::new();
    let ghost = Uuid::new_v4();
    assert_eq!(resolve_insertion_target(&tree, ghost), Err(InsertError::NodeNotFound(ghost)));
}

#[test]
fn resolution_does_not_mutate() {
    let f = fixture();
    let before = f.tree.snapshot();
    resolve_insertion_target(&f.tree, f.text).unwrap();
    assert_eq!(f.tree.snapshot(), before);
}

// =============================================================
// insert_component
// =============================================================

#[test]
fn direct_insert_appends_at_end() {
    let mut f = fixture();
    let target = resolve_insertion_target(&f.tree, f.section).unwrap();
    let created = insert_component(&mut f.tree, &target, ComponentKind::Column).unwrap();
    assert_eq!(f.tree.children(f.section), &[f.column_a, f.column_b, created]);
}

#[test]
fn redirected_insert_lands_after_selection() {
    let mut f = fixture();
    // A column is a container, so select a section-level leaf instead:
    // raw under the section redirects to the section.
    let raw = f.tree.append(f.section, &ComponentDef::new(ComponentKind::Raw)).unwrap();
    f.tree.move_to(raw, 1).unwrap();
    assert_eq!(f.tree.children(f.section), &[f.column_a, raw, f.column_b]);

    let target = resolve_insertion_target(&f.tree, raw).unwrap();
    assert!(target.redirected);
    let created = insert_component(&mut f.tree, &target, ComponentKind::Column).unwrap();
    assert_eq!(f.tree.children(f.section), &[f.column_a, raw, created, f.column_b]);
}

#[test]
fn redirected_insert_after_text_inside_column() {
    let mut f = fixture();
    let second = f
        .tree
        .append(f.column_a, &ComponentDef::new(ComponentKind::Text).with_content("second"))
        .unwrap();
    let target = resolve_insertion_target(&f.tree, f.text).unwrap();
    let created = insert_component(&mut f.tree, &target, ComponentKind::Button).unwrap();
    assert_eq!(f.tree.children(f.column_a), &[f.text, created, second]);
}

#[test]
fn redirected_insert_after_last_child_stays_last() {
    let mut f = fixture();
    let target = resolve_insertion_target(&f.tree, f.text).unwrap();
    let created = insert_component(&mut f.tree, &target, ComponentKind::Image).unwrap();
    assert_eq!(f.tree.children(f.column_a), &[f.text, created]);
}

#[test]
fn relocation_failure_leaves_node_appended() {
    let mut f = fixture();
    let target = resolve_insertion_target(&f.tree, f.text).unwrap();
    // The original selection disappears between menu open and activation.
    let extra = f.tree.append(f.column_a, &ComponentDef::new(ComponentKind::Spacer)).unwrap();
    f.tree.remove(f.text).unwrap();

    let created = insert_component(&mut f.tree, &target, ComponentKind::Divider).unwrap();
    assert_eq!(f.tree.children(f.column_a), &[extra, created]);
    assert!(is_valid(&f.tree));
}

#[test]
fn insert_synthesizes_default_subtree() {
    let mut f = fixture();
    let target = resolve_insertion_target(&f.tree, f.column_b).unwrap();
    let created = insert_component(&mut f.tree, &target, ComponentKind::Social).unwrap();
    let elements = f.tree.children(created);
    assert_eq!(elements.len(), 2);
    for id in elements {
        assert_eq!(f.tree.tag(*id), Some(&Tag::Known(ComponentKind::SocialElement)));
    }
    assert!(is_valid(&f.tree));
}

#[test]
fn kind_not_offered_is_rejected_without_mutation() {
    let mut f = fixture();
    let before = f.tree.len();
    let target = resolve_insertion_target(&f.tree, f.text).unwrap();
    let err = insert_component(&mut f.tree, &target, ComponentKind::Section).unwrap_err();
    assert_eq!(err, InsertError::KindNotOffered { kind: ComponentKind::Section, target: "mj-column".into() });
    assert_eq!(f.tree.len(), before);
}

#[test]
fn vanished_target_is_not_found() {
    let mut f = fixture();
    let target = resolve_insertion_target(&f.tree, f.text).unwrap();
    let section = f.section;
    f.tree.remove(section).unwrap();
    assert_eq!(
        insert_component(&mut f.tree, &target, ComponentKind::Text),
        Err(InsertError::NodeNotFound(f.column_a))
    );
}

// =============================================================
// relocate_after
// =============================================================

#[test]
fn relocate_rejects_node_from_other_parent() {
    let mut f = fixture();
    let err = relocate_after(&mut f.tree, f.section, f.column_a, f.text).unwrap_err();
    assert_eq!(err, RelocationFailure::Doc(DocError::NotAChild { node: f.text, parent: f.section }));
}

#[test]
fn relocate_reports_missing_original() {
    let mut f = fixture();
    let err = relocate_after(&mut f.tree, f.section, f.text, f.column_b).unwrap_err();
    assert_eq!(err, RelocationFailure::OriginalMissing(f.text));
}
