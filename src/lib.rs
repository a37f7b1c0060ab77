//! svgscrub - Clean SVG files without changing how they look
//!
//! svgscrub drops metadata, comments, unused definitions, unreferenced ids and
//! editor attributes, tidies inline styles, and rounds floating point numbers
//! to a fixed precision. Integers are never touched.

mod ast;
mod attrs;
mod batch;
mod encoding;
mod error;
mod namespace;
mod number;
mod optimize;
mod parse;
mod refs;
mod serialize;
mod style;

pub use ast::*;
pub use attrs::*;
pub use batch::*;
pub use encoding::*;
pub use error::*;
pub use namespace::*;
pub use number::*;
pub use optimize::*;
pub use parse::*;
pub use refs::*;
pub use serialize::*;
pub use style::*;

/// Clean an SVG string with default settings.
pub fn clean(svg: &str) -> Result<String, ScrubError> {
    clean_with_options(svg, &Options::default())
}

/// Clean an SVG string with custom options.
pub fn clean_with_options(svg: &str, options: &Options) -> Result<String, ScrubError> {
    let mut doc = parse_svg(svg)?;
    optimize(&mut doc, options);
    Ok(serialize(&doc))
}

/// Cleaning options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Number of decimal places for rounded numbers (default: 2)
    pub precision: u8,
    /// Write rounded numbers with exactly `precision` decimals. When false,
    /// `precision` counts significant digits instead.
    pub fixed_point: bool,
    /// Also drop stroke details when no stroke is set, and `stroke:none`
    pub aggressive: bool,
    /// Remove `<metadata>` elements under the root
    pub remove_metadata: bool,
    /// Remove comments
    pub remove_comments: bool,
    /// Remove unreferenced children of `<defs>`
    pub prune_defs: bool,
    /// Remove Inkscape/Sodipodi attributes, `xml:space` and `data-*`
    pub strip_editor_attrs: bool,
    /// Clean inline `style` attributes
    pub clean_styles: bool,
    /// Round numbers in numeric attributes and style properties
    pub round_numbers: bool,
    /// Remove ids nothing refers to
    pub strip_unused_ids: bool,
    /// Prefixes to use for known namespaces in the output
    pub prefixes: PrefixRegistry,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            precision: 2,
            fixed_point: true,
            aggressive: false,
            remove_metadata: true,
            remove_comments: true,
            prune_defs: true,
            strip_editor_attrs: true,
            clean_styles: true,
            round_numbers: true,
            strip_unused_ids: true,
            prefixes: PrefixRegistry::default(),
        }
    }
}
