//! Inline `style` attribute records.

use std::fmt;

/// Properties written first, in this order, when a record is serialized.
const PREFERRED_ORDER: &[&str] = &[
    "filter",
    "opacity",
    "fill",
    "fill-opacity",
    "stroke",
    "stroke-opacity",
    "stroke-width",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-dasharray",
    "stroke-dashoffset",
];

/// The properties of one `style` attribute, in the order they first appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleRecord {
    props: Vec<(String, String)>,
}

impl StyleRecord {
    /// Parse `prop:value;prop:value`.
    ///
    /// Segments without a `:` are dropped. A repeated property keeps its first
    /// position but takes the last value.
    pub fn parse(style: &str) -> Self {
        let mut record = Self::default();
        for decl in style.split(';') {
            if decl.trim().is_empty() {
                continue;
            }
            if let Some((prop, value)) = decl.split_once(':') {
                record.set(prop.trim(), value.trim());
            }
        }
        record
    }

    pub fn get(&self, prop: &str) -> Option<&str> {
        self.props
            .iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, prop: impl Into<String>, value: impl Into<String>) {
        let prop = prop.into();
        let value = value.into();
        match self.props.iter_mut().find(|(p, _)| *p == prop) {
            Some(slot) => slot.1 = value,
            None => self.props.push((prop, value)),
        }
    }

    pub fn remove(&mut self, prop: &str) -> Option<String> {
        let index = self.props.iter().position(|(p, _)| p == prop)?;
        Some(self.props.remove(index).1)
    }

    /// Keep only the properties for which `keep(name, value)` is true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.props.retain(|(p, v)| keep(p, v));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.props.iter_mut().map(|(p, v)| (p.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

impl fmt::Display for StyleRecord {
    /// Preferred properties first, then the rest in record order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preferred = PREFERRED_ORDER
            .iter()
            .filter_map(|&p| self.get(p).map(|v| (p, v)));
        let rest = self
            .iter()
            .filter(|(p, _)| !PREFERRED_ORDER.contains(p));

        for (i, (prop, value)) in preferred.chain(rest).enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}:{}", prop, value)?;
        }
        Ok(())
    }
}
