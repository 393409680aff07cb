//! printf-style field rendering.
//!
//! Applies C printf width/precision/flag semantics to already-decoded
//! argument values. Sign characters land before zero padding, and
//! alternate-form prefixes attach only to nonzero octal/hex values.

use crate::spec::{Conversion, FormatSpec};
use std::fmt::Write;

/// Upper bound on the padding one field may emit. Format strings are
/// untrusted candidates, and a hostile width must not force an
/// arbitrarily large allocation.
pub(crate) const MAX_FIELD_WIDTH: usize = 4096;

/// Renders a signed decimal field (`%d` / `%i`).
pub(crate) fn signed(value: i64, spec: &FormatSpec) -> String {
    let digits = if value == 0 && spec.precision() == Some(0) {
        // Explicit zero precision with a zero value prints no digits.
        String::new()
    } else {
        value.unsigned_abs().to_string()
    };
    let sign = sign_char(value < 0, spec);
    let zeros = precision_zeros(&digits, spec);
    assemble(sign, "", zeros, &digits, spec, spec.precision().is_none())
}

/// Renders an unsigned field (`%u`, `%o`, `%x`, `%X`) from the
/// width-masked bit pattern.
pub(crate) fn unsigned(value: u64, spec: &FormatSpec) -> String {
    let suppress = value == 0 && spec.precision() == Some(0);
    let alt = spec.flags().alt_form;
    let (digits, prefix) = if suppress {
        // Explicit zero precision with a zero value prints no digits;
        // alternate-form octal still keeps its leading zero.
        let digits = if alt && spec.conversion() == Conversion::Octal {
            "0".to_string()
        } else {
            String::new()
        };
        (digits, "")
    } else {
        match spec.conversion() {
            Conversion::UnsignedDec => (value.to_string(), ""),
            Conversion::Octal => (format!("{value:o}"), if alt && value != 0 { "0" } else { "" }),
            Conversion::HexLower => {
                (format!("{value:x}"), if alt && value != 0 { "0x" } else { "" })
            }
            Conversion::HexUpper => {
                (format!("{value:X}"), if alt && value != 0 { "0X" } else { "" })
            }
            other => unreachable!("not an unsigned conversion: {other:?}"),
        }
    };
    let zeros = precision_zeros(&digits, spec);
    assemble(None, prefix, zeros, &digits, spec, spec.precision().is_none())
}

/// Renders a floating-point field (`%f`, `%e`, `%g` and their uppercase
/// forms).
pub(crate) fn float(value: f64, spec: &FormatSpec) -> String {
    let upper = matches!(
        spec.conversion(),
        Conversion::FloatUpper | Conversion::ExponentialUpper | Conversion::ShortestUpper
    );
    let alt = spec.flags().alt_form;

    if !value.is_finite() {
        let body = match (value.is_nan(), upper) {
            (true, false) => "nan",
            (true, true) => "NAN",
            (false, false) => "inf",
            (false, true) => "INF",
        };
        let sign = sign_char(value.is_sign_negative() && !value.is_nan(), spec);
        return assemble(sign, "", 0, body, spec, false);
    }

    let precision = spec.precision().unwrap_or(6);
    let magnitude = value.abs();
    let body = match spec.conversion() {
        Conversion::Float | Conversion::FloatUpper => fixed_body(magnitude, precision, alt),
        Conversion::Exponential | Conversion::ExponentialUpper => {
            exponential_body(magnitude, precision, upper, alt)
        }
        Conversion::Shortest | Conversion::ShortestUpper => {
            shortest_body(magnitude, precision, upper, alt)
        }
        other => unreachable!("not a float conversion: {other:?}"),
    };
    let sign = sign_char(value.is_sign_negative(), spec);
    assemble(sign, "", 0, &body, spec, true)
}

/// Renders a character field (`%c`).
pub(crate) fn character(value: char, spec: &FormatSpec) -> String {
    let mut body = String::new();
    body.push(value);
    assemble(None, "", 0, &body, spec, false)
}

/// Renders a string field (`%s`). Precision truncates by character, not
/// byte, so a multi-byte code point is never split.
pub(crate) fn string(value: &str, spec: &FormatSpec) -> String {
    let truncated: String = match spec.precision() {
        Some(max) => value.chars().take(max).collect(),
        None => value.to_string(),
    };
    assemble(None, "", 0, &truncated, spec, false)
}

/// Renders a pointer field (`%p`) as `0x` plus eight zero-padded
/// lowercase hex digits.
pub(crate) fn pointer(address: u32, spec: &FormatSpec) -> String {
    let body = format!("0x{address:08x}");
    let sign = sign_char(false, spec);
    assemble(sign, "", 0, &body, spec, false)
}

/// Picks the sign character per the `-`/`+`/` ` flags.
fn sign_char(negative: bool, spec: &FormatSpec) -> Option<char> {
    if negative {
        Some('-')
    } else if spec.flags().force_sign {
        Some('+')
    } else if spec.flags().space_sign {
        Some(' ')
    } else {
        None
    }
}

/// Zeros needed to reach the precision's minimum digit count.
fn precision_zeros(digits: &str, spec: &FormatSpec) -> usize {
    if digits.is_empty() {
        return 0;
    }
    spec.precision().unwrap_or(1).saturating_sub(digits.len())
}

/// Assembles a field: `[spaces] [sign] [prefix] [zero fill]
/// [precision zeros] [body] [spaces]`, honoring width and justification.
/// `zero_pad_allowed` is false for conversions (or values, like inf/nan)
/// that C never zero pads.
fn assemble(
    sign: Option<char>,
    prefix: &str,
    zeros: usize,
    body: &str,
    spec: &FormatSpec,
    zero_pad_allowed: bool,
) -> String {
    let content = sign.map_or(0, |_| 1) + prefix.len() + zeros + body.chars().count();
    let width = spec.width().unwrap_or(0).min(MAX_FIELD_WIDTH);
    let padding = width.saturating_sub(content);
    let zero_fill = zero_pad_allowed && spec.flags().zero_pad;

    let mut out = String::with_capacity(content + padding);
    if !spec.flags().left_justify && !zero_fill {
        pad(&mut out, ' ', padding);
    }
    if let Some(sign) = sign {
        out.push(sign);
    }
    out.push_str(prefix);
    if !spec.flags().left_justify && zero_fill {
        pad(&mut out, '0', padding);
    }
    pad(&mut out, '0', zeros);
    out.push_str(body);
    if spec.flags().left_justify {
        pad(&mut out, ' ', padding);
    }
    out
}

fn pad(out: &mut String, fill: char, count: usize) {
    out.extend(std::iter::repeat(fill).take(count));
}

/// `%f` body: fixed-point decimal.
fn fixed_body(magnitude: f64, precision: usize, alt: bool) -> String {
    let mut body = format!("{magnitude:.precision$}");
    if alt && precision == 0 {
        body.push('.');
    }
    body
}

/// `%e` body: mantissa, exponent marker, and a signed exponent of at
/// least two digits.
fn exponential_body(magnitude: f64, precision: usize, upper: bool, alt: bool) -> String {
    let formatted = format!("{magnitude:.precision$e}");
    let (mantissa, exponent) = split_exponent(&formatted);
    let mut body = String::with_capacity(formatted.len() + 3);
    body.push_str(mantissa);
    if alt && precision == 0 {
        body.push('.');
    }
    body.push(if upper { 'E' } else { 'e' });
    let _ = write!(
        body,
        "{}{:02}",
        if exponent < 0 { '-' } else { '+' },
        exponent.unsigned_abs()
    );
    body
}

/// `%g` body: fixed or exponential, whichever C picks, with trailing
/// zeros stripped unless `#` keeps them.
fn shortest_body(magnitude: f64, precision: usize, upper: bool, alt: bool) -> String {
    let significant = precision.max(1);
    // The decimal exponent after rounding to the significant digit count
    // decides the form.
    let digits = significant - 1;
    let probe = format!("{magnitude:.digits$e}");
    let (_, exponent) = split_exponent(&probe);

    if exponent >= -4 && exponent < significant as i32 {
        let fraction = (significant as i32 - 1 - exponent) as usize;
        let mut body = format!("{magnitude:.fraction$}");
        if alt {
            if fraction == 0 {
                body.push('.');
            }
        } else {
            strip_trailing_zeros(&mut body);
        }
        body
    } else {
        let mut body = exponential_body(magnitude, significant - 1, upper, alt);
        if !alt {
            let marker = body
                .find(['e', 'E'])
                .expect("exponential body carries a marker");
            let (mantissa, exponent) = body.split_at(marker);
            let mut stripped = mantissa.to_string();
            strip_trailing_zeros(&mut stripped);
            stripped.push_str(exponent);
            body = stripped;
        }
        body
    }
}

/// Splits Rust's `{:e}` output into mantissa text and exponent value.
fn split_exponent(formatted: &str) -> (&str, i32) {
    let (mantissa, exponent) = formatted
        .split_once('e')
        .expect("float formatted without exponent marker");
    let exponent = exponent.parse().expect("unparseable float exponent");
    (mantissa, exponent)
}

fn strip_trailing_zeros(body: &mut String) {
    if body.contains('.') {
        while body.ends_with('0') {
            body.pop();
        }
        if body.ends_with('.') {
            body.pop();
        }
    }
}
