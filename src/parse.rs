//! SVG parsing from XML.
//!
//! The parser is deliberately forgiving: mismatched end tags are accepted,
//! elements left open at the end of input are closed, and broken attributes or
//! entities are skipped with a warning instead of failing the whole document.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::ScrubError;
use crate::namespace::{PrefixRegistry, cleanup_namespaces};

/// Parse an SVG string into a Document.
pub fn parse_svg(svg: &str) -> Result<Document, ScrubError> {
    let mut reader = Reader::from_str(svg);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut scope = Scope::default();
    let mut doctype = None;
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::DocType(dt) => {
                doctype = Some(String::from_utf8_lossy(&dt).trim().to_string());
            }
            Event::Start(start) => {
                root = Some(parse_element(
                    &mut reader,
                    &start,
                    &mut scope,
                    Whitespace::default(),
                )?);
                break;
            }
            Event::Empty(start) => {
                let element = parse_element_start(&start, &mut scope)?;
                scope.pop();
                root = Some(element);
                break;
            }
            Event::Eof => break,
            // The declaration, comments, whitespace and PIs before the root are not kept
            _ => {}
        }
    }

    let root = root.ok_or_else(|| ScrubError::InvalidSvg("No root element found".into()))?;

    let mut doc = Document {
        doctype,
        root,
        namespaces: Vec::new(),
    };
    cleanup_namespaces(&mut doc, &PrefixRegistry::default());
    Ok(doc)
}

/// In-scope namespace bindings while walking the document.
#[derive(Default)]
struct Scope {
    /// `(prefix, uri)`; a `None` uri undeclares the default namespace.
    bindings: Vec<(Option<String>, Option<String>)>,
    /// Length of `bindings` when each open element was entered.
    marks: Vec<usize>,
}

impl Scope {
    fn push(&mut self) {
        self.marks.push(self.bindings.len());
    }

    fn pop(&mut self) {
        if let Some(mark) = self.marks.pop() {
            self.bindings.truncate(mark);
        }
    }

    fn bind(&mut self, prefix: Option<&str>, uri: &str) {
        let uri = (!uri.is_empty()).then(|| uri.to_string());
        self.bindings.push((prefix.map(str::to_string), uri));
    }

    /// Look up a prefix. The outer `None` means the prefix is not bound.
    fn lookup(&self, prefix: Option<&str>) -> Option<Option<&str>> {
        if prefix == Some("xml") {
            return Some(Some(XML_NS));
        }
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_deref())
    }

    fn resolve_element(&self, raw: &str) -> QName {
        let (prefix, local) = QName::split_raw(raw);
        match (prefix, self.lookup(prefix)) {
            (_, Some(ns)) => QName {
                ns: ns.map(str::to_string),
                prefix: prefix.map(str::to_string),
                local: local.to_string(),
            },
            (None, None) => QName::new(local),
            (Some(_), None) => {
                log::debug!("unbound prefix in element name `{}`", raw);
                QName::new(raw)
            }
        }
    }

    fn resolve_attribute(&self, raw: &str) -> QName {
        // Unprefixed attributes never take the default namespace
        match QName::split_raw(raw) {
            (None, local) => QName::new(local),
            (Some(prefix), local) => match self.lookup(Some(prefix)) {
                Some(Some(ns)) => QName {
                    ns: Some(ns.to_string()),
                    prefix: Some(prefix.to_string()),
                    local: local.to_string(),
                },
                _ => {
                    log::debug!("unbound prefix in attribute name `{}`", raw);
                    QName::new(raw)
                }
            },
        }
    }
}

/// Where whitespace-only text may matter, inherited down the tree.
#[derive(Debug, Clone, Copy, Default)]
struct Whitespace {
    /// Inside `xml:space="preserve"`
    preserve: bool,
    /// Inside a `<text>` element, where blanks between spans render
    in_text: bool,
}

impl Whitespace {
    fn enter(self, element: &Element) -> Self {
        let space = element
            .attributes
            .iter()
            .find(|a| a.name.is(XML_NS, "space"))
            .map(|a| a.value.trim());
        Self {
            preserve: match space {
                Some("preserve") => true,
                Some("default") => false,
                _ => self.preserve,
            },
            in_text: self.in_text || element.is("text"),
        }
    }
}

fn parse_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    scope: &mut Scope,
    whitespace: Whitespace,
) -> Result<Element, ScrubError> {
    let mut element = parse_element_start(start, scope)?;
    let whitespace = whitespace.enter(&element);

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                element
                    .children
                    .push(Node::Element(parse_element(reader, &start, scope, whitespace)?));
            }
            Event::Empty(start) => {
                let child = parse_element_start(&start, scope)?;
                scope.pop();
                element.children.push(Node::Element(child));
            }
            Event::End(_) => {
                break;
            }
            Event::Text(text) => {
                let text = match text.unescape() {
                    Ok(text) => text,
                    Err(e) => {
                        log::warn!("keeping raw text after unescape failure: {}", e);
                        String::from_utf8_lossy(&text).into_owned().into()
                    }
                };
                element.children.push(Node::Text(text.into_owned()));
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::PI(pi) => {
                let content = String::from_utf8_lossy(&pi).into_owned();
                let (target, rest) = content
                    .split_once(char::is_whitespace)
                    .map(|(t, r)| (t.to_string(), Some(r.to_string())))
                    .unwrap_or_else(|| (content, None));
                element
                    .children
                    .push(Node::ProcessingInstruction { target, content: rest });
            }
            Event::Eof => {
                log::warn!(
                    "closing unterminated element <{}> at end of input",
                    element.name.full_name()
                );
                break;
            }
            _ => {}
        }
    }

    // Blank text between elements is layout, unless it is preserved or
    // sits next to real text
    if !(whitespace.preserve || whitespace.in_text || element.has_character_data()) {
        element.children.retain(|node| !node.is_blank_text());
    }

    scope.pop();
    Ok(element)
}

/// Build an element from its start tag.
///
/// Pushes a namespace frame for the element; the caller pops it once the
/// element's content has been read.
fn parse_element_start(start: &BytesStart, scope: &mut Scope) -> Result<Element, ScrubError> {
    let name_bytes = start.name();
    let name = std::str::from_utf8(name_bytes.as_ref())?;

    let mut raw_attrs: Vec<(String, String)> = Vec::new();
    let mut attributes = start.attributes();
    attributes.with_checks(false);
    for attr in attributes {
        let attr = match attr {
            Ok(attr) => attr,
            Err(e) => {
                log::warn!("skipping malformed attributes on <{}>: {}", name, e);
                break;
            }
        };
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        if raw_attrs.iter().any(|(k, _)| *k == key) {
            log::warn!("ignoring duplicate attribute `{}` on <{}>", key, name);
            continue;
        }
        let value: Cow<str> = match attr.unescape_value() {
            Ok(value) => value,
            Err(e) => {
                log::warn!("keeping raw value of `{}` on <{}>: {}", key, name, e);
                String::from_utf8_lossy(&attr.value).into_owned().into()
            }
        };
        raw_attrs.push((key, value.into_owned()));
    }

    // Declarations first, so they apply to the element's own name
    scope.push();
    for (key, value) in &raw_attrs {
        if key == "xmlns" {
            scope.bind(None, value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.bind(Some(prefix), value);
        }
    }

    let mut element = Element::new(scope.resolve_element(name));
    for (key, value) in raw_attrs {
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        element.attributes.push(Attribute {
            name: scope.resolve_attribute(&key),
            value,
        });
    }

    Ok(element)
}
