use super::*;
use crate::doc::ComponentDef;
use crate::kind::ComponentKind;
use crate::synth::instantiate_kind;

#[test]
fn synthesized_document_is_valid() {
    let mut tree = ComponentTree::new();
    for kind in ComponentKind::Body.child_kinds() {
        tree.append(tree.root(), &instantiate_kind(*kind)).unwrap();
    }
    assert!(is_valid(&tree));
}

#[test]
fn reports_misplaced_child() {
    let mut tree = ComponentTree::new();
    let text = tree.append(tree.root(), &ComponentDef::new(ComponentKind::Text)).unwrap();
    let violations = validate(&tree);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].parent, tree.root());
    assert_eq!(violations[0].child, text);
    assert_eq!(violations[0].child_tag, Tag::Known(ComponentKind::Text));
}

#[test]
fn unknown_tags_are_violations_under_containers() {
    let mut tree = ComponentTree::new();
    let section = tree.append(tree.root(), &instantiate_kind(ComponentKind::Section)).unwrap();
    tree.append(section, &ComponentDef::new("mj-mystery")).unwrap();
    let violations = validate(&tree);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].parent_tag, Tag::Known(ComponentKind::Section));
    assert_eq!(violations[0].child_tag, Tag::Other("mj-mystery".into()));
}

#[test]
fn empty_body_is_valid() {
    assert!(validate(&ComponentTree::new()).is_empty());
}
