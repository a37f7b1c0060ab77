//! SVG cleaning passes.

use std::collections::HashSet;

use crate::Options;
use crate::ast::*;
use crate::attrs::{AttributeKind, is_editor_attr};
use crate::namespace::{cleanup_namespaces, normalize_root};
use crate::number::round_numbers;
use crate::refs::collect_used_ids;
use crate::style::StyleRecord;

const EDITOR_PROP_PREFIXES: &[&str] = &["-inkscape-"];

/// Text properties that do nothing outside text content elements.
const FONT_PROPS: &[&str] = &[
    "font",
    "font-family",
    "font-weight",
    "font-size",
    "font-style",
    "font-variant",
    "line-height",
    "letter-spacing",
    "word-spacing",
    "text-anchor",
    "text-decoration",
];

const STYLE_DEFAULTS: &[(&str, &str)] = &[
    ("opacity", "1"),
    ("fill-opacity", "1"),
    ("stroke-opacity", "1"),
    ("stroke-dasharray", "none"),
    ("stroke-linecap", "butt"),
    ("stroke-linejoin", "miter"),
    ("stroke-miterlimit", "4"),
];

const NUMERIC_STYLE_PROPS: &[&str] = &[
    "opacity",
    "fill-opacity",
    "stroke-opacity",
    "stroke-width",
    "stroke-miterlimit",
    "stroke-dashoffset",
];

/// Run every enabled pass over the document, in order.
///
/// Referenced ids are collected once, after metadata and comments are gone but
/// before any attribute is touched, and that set drives both defs pruning and
/// id stripping.
pub fn optimize(doc: &mut Document, options: &Options) {
    normalize_root(doc);
    cleanup_namespaces(doc, &options.prefixes);

    if options.remove_metadata {
        remove_metadata(&mut doc.root);
    }

    if options.remove_comments {
        remove_comments(&mut doc.root);
    }

    let used_ids = collect_used_ids(&doc.root);
    log::debug!("{} referenced id(s)", used_ids.len());

    if options.prune_defs {
        prune_unused_defs(&mut doc.root, &used_ids);
    }

    doc.for_each_element_mut(|elem| {
        if options.strip_editor_attrs {
            elem.attributes.retain(|attr| !is_editor_attr(attr));
        }
        if options.clean_styles {
            clean_style(elem, options);
        }
        if options.round_numbers {
            round_numeric_attrs(elem, options);
        }
    });

    // Without xml:space, blanks outside text and mixed content no longer count
    if options.strip_editor_attrs {
        drop_blank_text(&mut doc.root, false);
    }

    if options.strip_unused_ids {
        strip_unused_ids(&mut doc.root, &used_ids);
    }

    cleanup_namespaces(doc, &options.prefixes);
}

/// Remove `<metadata>` children of the root.
fn remove_metadata(root: &mut Element) {
    root.children
        .retain(|node| !matches!(node, Node::Element(e) if e.is("metadata")));
}

/// Remove comment nodes.
fn remove_comments(elem: &mut Element) {
    elem.children
        .retain(|node| !matches!(node, Node::Comment(_)));

    for child in elem.child_elements_mut() {
        remove_comments(child);
    }
}

/// Drop unreferenced children of every `<defs>`.
///
/// A `<defs>` left empty by this is removed as well. One that was empty to
/// begin with is kept.
fn prune_unused_defs(elem: &mut Element, used: &HashSet<String>) {
    elem.children.retain_mut(|node| match node {
        Node::Element(e) if e.is_svg("defs") => {
            let pruned = prune_defs_children(e, used);
            !(pruned && e.children.is_empty())
        }
        _ => true,
    });

    for child in elem.child_elements_mut() {
        prune_unused_defs(child, used);
    }
}

/// Returns whether any element was removed.
fn prune_defs_children(defs: &mut Element, used: &HashSet<String>) -> bool {
    let before = defs.child_elements().count();
    defs.children.retain(|node| match node {
        Node::Element(e) => e.get_attr("id").is_some_and(|id| used.contains(id)),
        _ => false,
    });
    defs.child_elements().count() != before
}

/// Remove whitespace-only text except inside `<text>` or next to other text.
fn drop_blank_text(elem: &mut Element, in_text: bool) {
    let in_text = in_text || elem.is("text");
    if !in_text && !elem.has_character_data() {
        elem.children.retain(|node| !node.is_blank_text());
    }
    for child in elem.child_elements_mut() {
        drop_blank_text(child, in_text);
    }
}

/// Clean the `style` attribute of one element.
fn clean_style(elem: &mut Element, options: &Options) {
    let Some(style) = elem.get_attr("style").filter(|s| !s.is_empty()) else {
        return;
    };
    let mut style = StyleRecord::parse(style);

    style.retain(|prop, _| !EDITOR_PROP_PREFIXES.iter().any(|p| prop.starts_with(p)));

    if !is_text_content(elem) {
        style.retain(|prop, _| !FONT_PROPS.contains(&prop));
    }

    let stroke = style.get("stroke").map(|s| s.trim().to_string());
    let no_stroke = match stroke.as_deref() {
        None => options.aggressive,
        Some(s) => s == "none" || s == "transparent",
    };
    if no_stroke {
        style.retain(|prop, _| !prop.starts_with("stroke-"));
        if options.aggressive && stroke.as_deref() == Some("none") {
            style.remove("stroke");
        }
    }

    style.retain(|prop, value| !STYLE_DEFAULTS.contains(&(prop, value)));

    if options.round_numbers {
        for (prop, value) in style.iter_mut() {
            if let Some(rounded) = round_style_value(prop, value, options) {
                *value = rounded;
            }
        }
    }

    if style.is_empty() {
        elem.remove_attr("style");
    } else {
        elem.set_attr("style", style.to_string());
    }
}

fn is_text_content(elem: &Element) -> bool {
    elem.is("text") || elem.is("tspan") || elem.is("textPath")
}

/// Rounded value of a numeric style property, `None` for anything else.
fn round_style_value(prop: &str, value: &str, options: &Options) -> Option<String> {
    match prop {
        // may hold url(#...)
        "filter" => None,
        "stroke-dasharray" if value.trim().eq_ignore_ascii_case("none") => None,
        "stroke-dasharray" => Some(round_numbers(value, options.precision, options.fixed_point)),
        _ if NUMERIC_STYLE_PROPS.contains(&prop) => {
            Some(round_numbers(value, options.precision, options.fixed_point))
        }
        _ => None,
    }
}

/// Round the numbers in every numeric attribute of one element.
fn round_numeric_attrs(elem: &mut Element, options: &Options) {
    for attr in &mut elem.attributes {
        if AttributeKind::of(&attr.name).is_numeric() {
            attr.value = round_numbers(&attr.value, options.precision, options.fixed_point);
        }
    }
}

/// Remove ids nothing refers to. The root keeps its id.
fn strip_unused_ids(root: &mut Element, used: &HashSet<String>) {
    fn strip(elem: &mut Element, used: &HashSet<String>) {
        if elem.get_attr("id").is_some_and(|id| !used.contains(id)) {
            elem.remove_attr("id");
        }
        for child in elem.child_elements_mut() {
            strip(child, used);
        }
    }

    for child in root.child_elements_mut() {
        strip(child, used);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;

    fn element(style: &str, name: &str) -> Element {
        let mut elem = Element::new(QName::with_ns(SVG_NS, name));
        elem.set_attr("style", style);
        elem
    }

    fn cleaned(style: &str, name: &str, options: &Options) -> Option<String> {
        let mut elem = element(style, name);
        clean_style(&mut elem, options);
        elem.get_attr("style").map(str::to_string)
    }

    #[test]
    fn test_style_defaults_removed() {
        let options = Options::default();
        assert_eq!(
            cleaned("opacity:1;fill:red", "rect", &options).as_deref(),
            Some("fill:red")
        );
        assert_eq!(
            cleaned(
                "opacity:1;fill-opacity:1;stroke-linecap:butt;stroke-miterlimit:4",
                "rect",
                &options
            ),
            None
        );
        // exact string comparison only
        assert_eq!(
            cleaned("opacity:1.0", "rect", &options).as_deref(),
            Some("opacity:1.00")
        );
    }

    #[test]
    fn test_stroke_none_drops_stroke_props() {
        let options = Options::default();
        assert_eq!(
            cleaned("stroke:none;stroke-width:2", "rect", &options).as_deref(),
            Some("stroke:none")
        );
        assert_eq!(
            cleaned("fill:red;stroke: transparent ;stroke-dashoffset:3", "rect", &options)
                .as_deref(),
            Some("fill:red;stroke:transparent")
        );
        // without aggressive mode a missing stroke keeps its details
        assert_eq!(
            cleaned("stroke-width:2", "rect", &options).as_deref(),
            Some("stroke-width:2")
        );
    }

    #[test]
    fn test_aggressive_stroke() {
        let options = Options {
            aggressive: true,
            ..Options::default()
        };
        assert_eq!(cleaned("stroke:none;stroke-width:2", "rect", &options), None);
        assert_eq!(cleaned("stroke-width:2;fill:red", "rect", &options).as_deref(), Some("fill:red"));
        assert_eq!(
            cleaned("stroke:transparent;stroke-width:2", "rect", &options).as_deref(),
            Some("stroke:transparent")
        );
    }

    #[test]
    fn test_font_props_only_on_text() {
        let options = Options::default();
        let style = "font-size:12px;font-family:Sans;fill:#000";
        assert_eq!(cleaned(style, "rect", &options).as_deref(), Some("fill:#000"));
        assert_eq!(
            cleaned(style, "tspan", &options).as_deref(),
            Some("fill:#000;font-size:12px;font-family:Sans")
        );
    }

    #[test]
    fn test_editor_props_removed() {
        let options = Options::default();
        assert_eq!(
            cleaned("-inkscape-font-specification:Sans;fill:red", "text", &options).as_deref(),
            Some("fill:red")
        );
    }

    #[test]
    fn test_style_rounding() {
        let options = Options::default();
        assert_eq!(
            cleaned(
                "filter:url(#f1.5);opacity:0.756;stroke:#000;stroke-width:1.33333;stroke-dasharray:1.5, 2.25;fill:#123.456",
                "path",
                &options
            )
            .as_deref(),
            Some("filter:url(#f1.5);opacity:0.76;fill:#123.456;stroke:#000;stroke-width:1.33;stroke-dasharray:1.50, 2.25")
        );
        assert_eq!(
            cleaned("stroke:#000;stroke-dasharray:NONE", "path", &options).as_deref(),
            Some("stroke:#000;stroke-dasharray:NONE")
        );

        let no_rounding = Options {
            round_numbers: false,
            ..Options::default()
        };
        assert_eq!(
            cleaned("stroke-width:1.33333", "path", &no_rounding).as_deref(),
            Some("stroke-width:1.33333")
        );
    }

    #[test]
    fn test_empty_style_left_alone() {
        assert_eq!(cleaned("", "rect", &Options::default()).as_deref(), Some(""));
    }

    #[test]
    fn test_round_numeric_attrs() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10.5 20.25">
  <path d="M1.234 5.678L9 10z" filter="url(#f0.5)" fill="#0.5" transform="translate(1.005,2)" x="3"/>
</svg>"##;
        let mut doc = parse_svg(svg).unwrap();
        doc.for_each_element_mut(|e| round_numeric_attrs(e, &Options::default()));

        assert_eq!(doc.root.get_attr("viewBox"), Some("0 0 10.50 20.25"));
        let path = doc.root.child_elements().next().unwrap();
        assert_eq!(path.get_attr("d"), Some("M1.23 5.68L9 10z"));
        assert_eq!(path.get_attr("filter"), Some("url(#f0.5)"));
        assert_eq!(path.get_attr("fill"), Some("#0.5"));
        assert_eq!(path.get_attr("x"), Some("3"));
        assert!(path.get_attr("transform").unwrap().starts_with("translate(1.0"));
    }

    #[test]
    fn test_prune_defs() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
  <defs><linearGradient id="grad1"/><linearGradient id="grad2"/><g/></defs>
  <defs><linearGradient id="unused"/></defs>
  <defs/>
  <rect fill="url(#grad1)"/>
</svg>"##;
        let mut doc = parse_svg(svg).unwrap();
        let used = collect_used_ids(&doc.root);
        prune_unused_defs(&mut doc.root, &used);

        let defs: Vec<_> = doc.root.child_elements().filter(|e| e.is("defs")).collect();
        assert_eq!(defs.len(), 2);
        let kept: Vec<_> = defs[0].child_elements().filter_map(|e| e.get_attr("id")).collect();
        assert_eq!(kept, ["grad1"]);
        assert_eq!(defs[0].children.len(), 1);
        // the originally empty defs stays
        assert!(defs[1].children.is_empty());
    }

    #[test]
    fn test_prune_nested_defs() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg">
  <g><defs><clipPath id="c"/></defs></g>
  <rect clip-path="url(#missing)"/>
</svg>"##;
        let mut doc = parse_svg(svg).unwrap();
        let used = collect_used_ids(&doc.root);
        prune_unused_defs(&mut doc.root, &used);

        let g = doc.root.child_elements().next().unwrap();
        assert!(g.children.is_empty());
    }

    #[test]
    fn test_strip_unused_ids_keeps_root() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" id="root">
  <g id="layer1"><rect id="r" fill="url(#g)"/></g>
  <linearGradient id="g"/>
</svg>"##;
        let mut doc = parse_svg(svg).unwrap();
        let used = collect_used_ids(&doc.root);
        strip_unused_ids(&mut doc.root, &used);

        assert_eq!(doc.root.get_attr("id"), Some("root"));
        let children: Vec<_> = doc.root.child_elements().collect();
        assert_eq!(children[0].get_attr("id"), None);
        assert_eq!(children[0].child_elements().next().unwrap().get_attr("id"), None);
        assert_eq!(children[1].get_attr("id"), Some("g"));
    }

    #[test]
    fn test_metadata_only_at_root() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg">
  <metadata><rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"/></metadata>
  <g><metadata/></g>
</svg>"#;
        let mut doc = parse_svg(svg).unwrap();
        remove_metadata(&mut doc.root);

        let children: Vec<_> = doc.root.child_elements().collect();
        assert_eq!(children.len(), 1);
        assert!(children[0].is("g"));
        assert_eq!(children[0].child_elements().count(), 1);
    }

    #[test]
    fn test_blank_defs_is_not_emptied_by_pruning() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" xml:space="preserve"><defs> </defs></svg>"#;
        let mut doc = parse_svg(svg).unwrap();
        prune_unused_defs(&mut doc.root, &HashSet::new());
        assert_eq!(doc.root.child_elements().count(), 1);
    }

    #[test]
    fn test_drop_blank_text() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" xml:space="preserve">
  <g> <rect/> </g>
  <text> <tspan>a</tspan> <tspan>b</tspan></text>
  <g>x <rect/></g>
</svg>"#;
        let mut doc = parse_svg(svg).unwrap();
        drop_blank_text(&mut doc.root, false);

        let children: Vec<_> = doc.root.children.iter().collect();
        assert_eq!(children.len(), 3);
        let elems: Vec<_> = doc.root.child_elements().collect();
        assert_eq!(elems[0].children.len(), 1);
        assert_eq!(elems[1].children.len(), 4);
        assert_eq!(elems[2].children.len(), 2);
    }
}
