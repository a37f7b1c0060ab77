//! SVG document tree

/// The SVG namespace.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
/// The XLink namespace, used by `xlink:href` in SVG 1.1.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
/// The namespace bound to the reserved `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
pub const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";

/// A complete SVG document.
#[derive(Debug, Clone)]
pub struct Document {
    /// DOCTYPE declaration
    pub doctype: Option<String>,
    /// The root element
    pub root: Element,
    /// Namespace declarations written on the root element.
    ///
    /// Recomputed from the tree by [`crate::cleanup_namespaces`].
    pub namespaces: Vec<NamespaceDecl>,
}

/// A namespace declaration (`xmlns="..."` or `xmlns:prefix="..."`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub uri: String,
}

/// An SVG/XML element.
#[derive(Debug, Clone)]
pub struct Element {
    pub name: QName,
    /// Attributes in document order, without namespace declarations
    pub attributes: Vec<Attribute>,
    /// Child nodes
    pub children: Vec<Node>,
}

/// A namespace-qualified name.
///
/// `ns` is the resolved namespace URI and is what identity checks use. The
/// prefix only matters for serialization and is reassigned when namespaces
/// are cleaned up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI, if any
    pub ns: Option<String>,
    /// Prefix used when writing the name (e.g., "xlink")
    pub prefix: Option<String>,
    /// Local name (e.g., "rect", "href")
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            ns: None,
            prefix: None,
            local: local.into(),
        }
    }

    pub fn with_ns(ns: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            ns: Some(ns.into()),
            prefix: None,
            local: local.into(),
        }
    }

    /// Split a raw name like "prefix:local" into its prefix and local parts.
    pub fn split_raw(s: &str) -> (Option<&str>, &str) {
        match s.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
                (Some(prefix), local)
            }
            _ => (None, s),
        }
    }

    /// Check whether this name is `{ns}local`.
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.ns.as_deref() == Some(ns) && self.local == local
    }

    /// Get the full name as written (e.g., "xlink:href").
    pub fn full_name(&self) -> String {
        match &self.prefix {
            Some(p) => format!("{}:{}", p, self.local),
            None => self.local.clone(),
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: QName::new(name),
            value: value.into(),
        }
    }
}

/// A node in the SVG tree.
#[derive(Debug, Clone)]
pub enum Node {
    /// An element node
    Element(Element),
    /// A text node
    Text(String),
    /// A comment node
    Comment(String),
    /// A CDATA section
    CData(String),
    /// A processing instruction (e.g., `<?xml-stylesheet ... ?>`)
    ProcessingInstruction { target: String, content: Option<String> },
}

impl Node {
    /// Whether this is a text node holding nothing but whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get the value of an attribute without a namespace.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.ns.is_none() && a.name.local == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute without a namespace, keeping its position if present.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if let Some(attr) = self
            .attributes
            .iter_mut()
            .find(|a| a.name.ns.is_none() && a.name.local == name)
        {
            attr.value = value.into();
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }

    /// Remove an attribute without a namespace.
    pub fn remove_attr(&mut self, name: &str) {
        self.attributes
            .retain(|a| !(a.name.ns.is_none() && a.name.local == name));
    }

    /// Check if this element has a specific local name.
    pub fn is(&self, name: &str) -> bool {
        self.name.local == name
    }

    /// Check if this is the SVG element `name`.
    pub fn is_svg(&self, name: &str) -> bool {
        self.name.is(SVG_NS, name)
    }

    /// Whether any child is CDATA or text with something besides whitespace.
    pub fn has_character_data(&self) -> bool {
        self.children.iter().any(|n| match n {
            Node::Text(t) => !t.trim().is_empty(),
            Node::CData(_) => true,
            _ => false,
        })
    }

    /// Iterate over child elements only (skip text, comments, etc.).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Iterate over child elements mutably.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Recursively visit this element and its descendants in document order.
    pub fn for_each(&self, f: &mut impl FnMut(&Element)) {
        f(self);
        for child in self.child_elements() {
            child.for_each(f);
        }
    }

    /// Recursively visit this element and its descendants mutably.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in self.child_elements_mut() {
            child.for_each_mut(f);
        }
    }
}

impl Document {
    /// Recursively visit all elements mutably.
    pub fn for_each_element_mut(&mut self, mut f: impl FnMut(&mut Element)) {
        self.root.for_each_mut(&mut f);
    }
}
