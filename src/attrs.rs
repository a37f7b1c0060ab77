//! Attribute classification.

use crate::ast::{Attribute, INKSCAPE_NS, QName, SODIPODI_NS, XML_NS};

/// How an attribute's value should be treated by numeric rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// `d`
    PathData,
    /// `points`
    PointList,
    /// `transform`
    TransformList,
    /// `viewBox`
    ViewBox,
    /// Holds a reference such as `url(#f)`; never rounded
    ReferenceOnly,
    /// Coordinates, lengths, opacities and other plain numeric values
    GenericNumeric,
    NonNumeric,
}

impl AttributeKind {
    /// Classify an attribute by its local name.
    pub fn of(name: &QName) -> Self {
        match name.local.as_str() {
            "d" => Self::PathData,
            "points" => Self::PointList,
            "transform" => Self::TransformList,
            "viewBox" => Self::ViewBox,
            "filter" => Self::ReferenceOnly,
            "x" | "y" | "x1" | "y1" | "x2" | "y2" | "dx" | "dy" | "rotate" | "width"
            | "height" | "r" | "rx" | "ry" | "cx" | "cy" | "opacity" | "fill-opacity"
            | "stroke-opacity" | "stroke-width" | "stroke-miterlimit" | "pathLength"
            | "offset" | "startOffset" | "stdDeviation" => Self::GenericNumeric,
            _ => Self::NonNumeric,
        }
    }

    /// Whether numbers in values of this kind may be rounded.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::ReferenceOnly | Self::NonNumeric)
    }
}

/// Attributes that only matter to an editor: anything in the Inkscape or
/// Sodipodi namespaces, `xml:space`, and `data-*`.
pub fn is_editor_attr(attr: &Attribute) -> bool {
    let name = &attr.name;
    match name.ns.as_deref() {
        Some(INKSCAPE_NS | SODIPODI_NS) => true,
        Some(XML_NS) if name.local == "space" => true,
        _ => name.local.starts_with("data-"),
    }
}
