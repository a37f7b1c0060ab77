//! Namespace normalization.
//!
//! Namespace declarations are not stored on elements. Instead every name keeps
//! its resolved URI, and [`cleanup_namespaces`] derives the smallest set of
//! declarations the tree needs, all written on the root element.

use crate::ast::*;

/// Prefixes to use for well-known namespaces when writing a document.
///
/// Passed per document so concurrent runs never share registration state.
/// A reserved prefix is only declared when its namespace is actually used.
#[derive(Debug, Clone)]
pub struct PrefixRegistry {
    reserved: Vec<(String, String)>,
}

impl Default for PrefixRegistry {
    fn default() -> Self {
        Self::empty().with("xlink", XLINK_NS)
    }
}

impl PrefixRegistry {
    pub fn empty() -> Self {
        Self {
            reserved: Vec::new(),
        }
    }

    /// Reserve `prefix` for `uri`, replacing an earlier reservation of either.
    pub fn with(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        let (prefix, uri) = (prefix.into(), uri.into());
        self.reserved.retain(|(p, u)| *p != prefix && *u != uri);
        self.reserved.push((prefix, uri));
        self
    }

    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        self.reserved
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_str())
    }

    pub fn uri_for(&self, prefix: &str) -> Option<&str> {
        self.reserved
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, u)| u.as_str())
    }
}

/// Put an `svg` root, and every element without a namespace, in the SVG namespace.
pub fn normalize_root(doc: &mut Document) {
    if !doc.root.is("svg") {
        return;
    }
    doc.root.for_each_mut(&mut |elem| {
        if elem.name.ns.is_none() {
            elem.name.ns = Some(SVG_NS.to_string());
            elem.name.prefix = None;
        }
    });
    doc.root.name.ns = Some(SVG_NS.to_string());
}

/// Recompute the namespace declarations and name prefixes of the whole tree.
///
/// The root's namespace becomes the default namespace unless some element has
/// no namespace at all. Every other namespace used by an element or attribute
/// gets one prefix: the reserved one, else the one it was written with, else a
/// generated `nsN`. Unused declarations disappear.
pub fn cleanup_namespaces(doc: &mut Document, registry: &PrefixRegistry) {
    let mut unqualified = false;
    doc.root.for_each(&mut |elem| unqualified |= elem.name.ns.is_none());
    let default_ns = if unqualified {
        None
    } else {
        doc.root.name.ns.clone()
    };

    let mut assigner = PrefixAssigner {
        registry,
        assigned: Vec::new(),
        generated: 0,
    };

    doc.root.for_each_mut(&mut |elem| {
        elem.name.prefix = match &elem.name.ns {
            Some(ns) if Some(ns) != default_ns.as_ref() => {
                Some(assigner.assign(ns, elem.name.prefix.as_deref()))
            }
            _ => None,
        };
        for attr in &mut elem.attributes {
            attr.name.prefix = match &attr.name.ns {
                None => None,
                Some(ns) if ns == XML_NS => Some("xml".to_string()),
                Some(ns) => Some(assigner.assign(ns, attr.name.prefix.as_deref())),
            };
        }
    });

    let mut namespaces = Vec::new();
    if let Some(uri) = default_ns {
        namespaces.push(NamespaceDecl { prefix: None, uri });
    }
    namespaces.extend(
        assigner
            .assigned
            .into_iter()
            .map(|(uri, prefix)| NamespaceDecl {
                prefix: Some(prefix),
                uri,
            }),
    );
    doc.namespaces = namespaces;
}

struct PrefixAssigner<'a> {
    registry: &'a PrefixRegistry,
    /// `(uri, prefix)` in first-use order
    assigned: Vec<(String, String)>,
    generated: usize,
}

impl PrefixAssigner<'_> {
    fn assign(&mut self, uri: &str, hint: Option<&str>) -> String {
        if let Some((_, prefix)) = self.assigned.iter().find(|(u, _)| u == uri) {
            return prefix.clone();
        }

        let reserved = self.registry.prefix_for(uri);
        let prefix = match [reserved, hint]
            .into_iter()
            .flatten()
            .find(|p| self.is_free(p, uri))
        {
            Some(p) => p.to_string(),
            None => loop {
                let candidate = format!("ns{}", self.generated);
                self.generated += 1;
                if self.is_free(&candidate, uri) {
                    break candidate;
                }
            },
        };

        self.assigned.push((uri.to_string(), prefix.clone()));
        prefix
    }

    fn is_free(&self, prefix: &str, uri: &str) -> bool {
        if prefix.is_empty() || prefix == "xml" || prefix == "xmlns" {
            return false;
        }
        if self.registry.uri_for(prefix).is_some_and(|u| u != uri) {
            return false;
        }
        !self.assigned.iter().any(|(_, p)| p == prefix)
    }
}
