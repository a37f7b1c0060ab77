//! Decoding SVG files to text.

use std::borrow::Cow;
use std::sync::OnceLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

use crate::error::ScrubError;

fn re_declared_encoding() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r#"^\s*<\?xml\s[^>]*?\bencoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
            .expect("valid encoding regex")
    })
}

/// The encoding named by the XML declaration, if it names a known one.
pub fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let caps = re_declared_encoding().captures(bytes)?;
    let label = &caps[1];
    let encoding = Encoding::for_label(label);
    if encoding.is_none() {
        log::warn!(
            "unknown encoding `{}`, assuming UTF-8",
            String::from_utf8_lossy(label)
        );
    }
    // An ASCII-readable declaration cannot really be UTF-16
    encoding.map(Encoding::output_encoding)
}

/// Decode file contents to text.
///
/// A byte order mark wins over the declaration; with neither, the input is
/// UTF-8 and must be valid. Malformed sequences in other encodings become
/// U+FFFD.
pub fn decode_svg(bytes: &[u8]) -> Result<Cow<'_, str>, ScrubError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (declared_encoding(bytes).unwrap_or(UTF_8), bytes),
    };

    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(std::str::from_utf8(body)?));
    }

    let (text, had_errors) = encoding.decode_without_bom_handling(body);
    if had_errors {
        log::warn!("replaced malformed {} sequences", encoding.name());
    }
    Ok(text)
}
