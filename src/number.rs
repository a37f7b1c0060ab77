//! Rounding of numbers embedded in attribute text.
//!
//! Values like path data, point lists and transforms are treated as plain text
//! with numbers in it: every numeric token is found with one regular grammar
//! and only float-like tokens are rewritten. Integer-like tokens stay exactly
//! as written so ids, flags and other integer text are never disturbed.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Optional sign, `digits.digits` | `.digits` | `digits.` | `digits`, optional exponent.
fn re_num() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| {
        Regex::new(r"[-+]?(?:\d*\.\d+|\d+\.|\d+)(?:[eE][-+]?\d+)?").expect("valid number regex")
    })
}

/// Round every float-like number in `text`.
///
/// With `fixed` set, numbers get exactly `precision` fractional digits
/// (`-5.79687` -> `-5.80`, `3.2` -> `3.20`). Otherwise they are written with
/// `precision` significant digits in the shortest general form.
pub fn round_numbers(text: &str, precision: u8, fixed: bool) -> String {
    match re_num().replace_all(text, |caps: &Captures| {
        round_token(&caps[0], precision, fixed).into_owned()
    }) {
        Cow::Borrowed(_) => text.to_string(),
        Cow::Owned(s) => s,
    }
}

/// Round one numeric token, leaving integer-like tokens untouched.
pub fn round_token(token: &str, precision: u8, fixed: bool) -> Cow<'_, str> {
    if !is_float_like(token) {
        return Cow::Borrowed(token);
    }
    let Ok(value) = token.parse::<f64>() else {
        return Cow::Borrowed(token);
    };
    if !value.is_finite() {
        return Cow::Borrowed(token);
    }

    let formatted = if fixed {
        format!("{:.prec$}", value, prec = precision as usize)
    } else {
        format_general(value, precision)
    };
    Cow::Owned(drop_negative_zero(formatted))
}

/// A token is float-like if it has a decimal point or an exponent.
pub fn is_float_like(token: &str) -> bool {
    token.contains(['.', 'e', 'E'])
}

/// `-0.00` -> `0.00`; any other negative number is left alone.
fn drop_negative_zero(s: String) -> String {
    match s.strip_prefix('-') {
        Some(rest) if is_zero(rest) => rest.to_string(),
        _ => s,
    }
}

fn is_zero(s: &str) -> bool {
    let mantissa = s.split(['e', 'E']).next().unwrap_or(s);
    mantissa.chars().all(|c| c == '0' || c == '.')
}

/// Format like C's `%.Ng`: `precision` significant digits, trailing zeros
/// trimmed, scientific notation for very small or very large magnitudes.
fn format_general(value: f64, precision: u8) -> String {
    let digits = usize::from(precision.max(1));
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the requested significant digits first, the exponent may shift.
    let sci = format!("{:.prec$e}", value, prec = digits - 1);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.prec$}", value, prec = decimals)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
