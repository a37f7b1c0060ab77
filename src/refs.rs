//! Tracking which ids a document references.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{Element, Node};
use crate::style::StyleRecord;

fn re_url_ref() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"url\(#([^)]+)\)").expect("valid url regex"))
}

fn re_hash_ref() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"^#([A-Za-z_][\w.-]*)$").expect("valid fragment regex"))
}

/// Collect every id referenced from an attribute or style property below `root`.
///
/// A value references `id` if it contains `url(#id)` anywhere, or if the whole
/// trimmed value is `#id` (as in `href="#id"`). Stylesheets in `<style>`
/// elements are searched for `url(#id)` too, since class rules can point at
/// gradients and filters.
pub fn collect_used_ids(root: &Element) -> HashSet<String> {
    let mut used = HashSet::new();
    root.for_each(&mut |elem| {
        for attr in &elem.attributes {
            collect_refs(&attr.value, &mut used);
        }
        if let Some(style) = elem.get_attr("style") {
            for (_, value) in StyleRecord::parse(style).iter() {
                collect_refs(value, &mut used);
            }
        }
        if elem.is("style") {
            for child in &elem.children {
                if let Node::Text(css) | Node::CData(css) = child {
                    collect_url_refs(css, &mut used);
                }
            }
        }
    });
    used
}

fn collect_url_refs(text: &str, out: &mut HashSet<String>) {
    for caps in re_url_ref().captures_iter(text) {
        out.insert(caps[1].to_string());
    }
}

/// Add the ids referenced by one value to `out`.
pub fn collect_refs(value: &str, out: &mut HashSet<String>) {
    collect_url_refs(value, out);
    if let Some(caps) = re_hash_ref().captures(value.trim()) {
        out.insert(caps[1].to_string());
    }
}
