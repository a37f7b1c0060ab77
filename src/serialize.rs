//! SVG serialization to indented XML.

use crate::ast::*;

const INDENT: &str = "  ";

/// Serialize a Document with an XML declaration and two-space indentation.
///
/// Elements holding text, and everything inside `<text>`, are written on one
/// line so that mixed content keeps its exact whitespace. Serializing a re-parsed result gives the same bytes.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();

    out.push_str("<?xml version='1.0' encoding='utf-8'?>\n");

    if let Some(ref dt) = doc.doctype {
        out.push_str("<!DOCTYPE ");
        out.push_str(dt);
        out.push_str(">\n");
    }

    serialize_element(&mut out, &doc.root, Some(doc.namespaces.as_slice()), Some(0));
    out.push('\n');

    out
}

/// Write one element. `depth` is `None` inside mixed content.
fn serialize_element(
    out: &mut String,
    elem: &Element,
    namespaces: Option<&[NamespaceDecl]>,
    depth: Option<usize>,
) {
    out.push('<');
    out.push_str(&elem.name.full_name());

    for decl in namespaces.unwrap_or_default() {
        match &decl.prefix {
            Some(prefix) => {
                out.push_str(" xmlns:");
                out.push_str(prefix);
            }
            None => out.push_str(" xmlns"),
        }
        out.push_str("=\"");
        push_escaped_attr(out, &decl.uri);
        out.push('"');
    }

    for attr in &elem.attributes {
        out.push(' ');
        out.push_str(&attr.name.full_name());
        out.push_str("=\"");
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    if elem.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');

    let mixed = elem.is("text")
        || elem
            .children
            .iter()
            .any(|n| matches!(n, Node::Text(_) | Node::CData(_)));

    match depth {
        Some(depth) if !mixed => {
            for child in &elem.children {
                out.push('\n');
                push_indent(out, depth + 1);
                serialize_node(out, child, Some(depth + 1));
            }
            out.push('\n');
            push_indent(out, depth);
        }
        _ => {
            for child in &elem.children {
                serialize_node(out, child, None);
            }
        }
    }

    out.push_str("</");
    out.push_str(&elem.name.full_name());
    out.push('>');
}

fn serialize_node(out: &mut String, node: &Node, depth: Option<usize>) {
    match node {
        Node::Element(elem) => serialize_element(out, elem, None, depth),
        Node::Text(text) => push_escaped_text(out, text),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::ProcessingInstruction { target, content } => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(c) = content {
                out.push(' ');
                out.push_str(c);
            }
            out.push_str("?>");
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}
