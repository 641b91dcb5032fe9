//! MJML export: flatten the document tree into markup.
//!
//! Content-bearing kinds (`mj-text`, `mj-button`, `mj-raw`, ...) emit their
//! payload verbatim between the tags. Attribute values are escaped. Empty
//! leaves self-close.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::doc::{ComponentTree, Node, NodeId};
use crate::kind::Tag;

/// Compact markup with no insignificant whitespace.
#[must_use]
pub fn to_mjml(tree: &ComponentTree) -> String {
    render(tree, None)
}

/// Indented markup, one element per line.
#[must_use]
pub fn to_mjml_pretty(tree: &ComponentTree) -> String {
    render(tree, Some(2))
}

fn render(tree: &ComponentTree, indent: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str("<mjml>");
    newline(&mut out, indent);
    write_node(tree, tree.root(), 1, indent, &mut out);
    out.push_str("</mjml>");
    newline(&mut out, indent);
    out
}

fn write_node(tree: &ComponentTree, id: NodeId, depth: usize, indent: Option<usize>, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    pad(out, depth, indent);
    open_tag(node, out);

    if self_closing(node) {
        out.push_str(" />");
        newline(out, indent);
        return;
    }
    out.push('>');

    if let Some(ref content) = node.content {
        out.push_str(content);
    } else if !node.children.is_empty() {
        newline(out, indent);
        for child in &node.children {
            write_node(tree, *child, depth + 1, indent, out);
        }
        pad(out, depth, indent);
    }

    out.push_str("</");
    out.push_str(node.tag.as_str());
    out.push('>');
    newline(out, indent);
}

fn open_tag(node: &Node, out: &mut String) {
    out.push('<');
    out.push_str(node.tag.as_str());
    for (name, value) in &node.attributes {
        out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
    }
}

fn self_closing(node: &Node) -> bool {
    if node.content.is_some() || !node.children.is_empty() {
        return false;
    }
    match &node.tag {
        Tag::Known(kind) => !kind.is_container() && !kind.has_content(),
        Tag::Other(_) => true,
    }
}

fn pad(out: &mut String, depth: usize, indent: Option<usize>) {
    if let Some(width) = indent {
        out.extend(std::iter::repeat_n(' ', depth * width));
    }
}

fn newline(out: &mut String, indent: Option<usize>) {
    if indent.is_some() {
        out.push('\n');
    }
}

/// Escape a value for a double-quoted attribute.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
