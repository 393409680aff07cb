//! Parsing of printf conversion directives.
//!
//! A directive is one `%...<conv>` specifier: optional flags, width,
//! precision, and length modifier followed by a conversion character.
//! Illegal flag combinations are rejected here, before any argument byte
//! is consumed, so a bad candidate format string costs nothing to rule
//! out.

use crate::Error;

/// Conversion kind of a directive.
///
/// The set is closed: every consumer matches it exhaustively, so adding a
/// conversion is a compile-time visible change. Conversion characters
/// outside the supported set (notably `%n`) parse as [`Unsupported`] and
/// fail when an argument is decoded against them.
///
/// [`Unsupported`]: Conversion::Unsupported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `%d` / `%i`
    SignedDec,
    /// `%u`
    UnsignedDec,
    /// `%o`
    Octal,
    /// `%x`
    HexLower,
    /// `%X`
    HexUpper,
    /// `%f`
    Float,
    /// `%F`
    FloatUpper,
    /// `%e`
    Exponential,
    /// `%E`
    ExponentialUpper,
    /// `%g`
    Shortest,
    /// `%G`
    ShortestUpper,
    /// `%c`
    Char,
    /// `%s`
    Str,
    /// `%p`
    Pointer,
    /// `%%`
    Percent,
    /// Any other conversion character.
    Unsupported,
}

impl Conversion {
    fn from_char(conversion: char) -> Self {
        match conversion {
            'd' | 'i' => Conversion::SignedDec,
            'u' => Conversion::UnsignedDec,
            'o' => Conversion::Octal,
            'x' => Conversion::HexLower,
            'X' => Conversion::HexUpper,
            'f' => Conversion::Float,
            'F' => Conversion::FloatUpper,
            'e' => Conversion::Exponential,
            'E' => Conversion::ExponentialUpper,
            'g' => Conversion::Shortest,
            'G' => Conversion::ShortestUpper,
            'c' => Conversion::Char,
            's' => Conversion::Str,
            'p' => Conversion::Pointer,
            '%' => Conversion::Percent,
            _ => Conversion::Unsupported,
        }
    }
}

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// `-`: pad on the right.
    pub left_justify: bool,
    /// `+`: always emit a sign.
    pub force_sign: bool,
    /// ` `: emit a space where a `+` would go.
    pub space_sign: bool,
    /// `#`: alternate form (`0`/`0x` prefixes, forced decimal point).
    pub alt_form: bool,
    /// `0`: pad with zeros instead of spaces.
    pub zero_pad: bool,
}

/// C length modifier.
///
/// Only [`Ll`](Length::Ll) and [`J`](Length::J) widen the decoded
/// argument to 64 bits; the remaining modifiers exist so directives from
/// real firmware format strings parse, but all decode at 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// `hh`
    Hh,
    /// `h`
    H,
    /// `l`
    L,
    /// `ll`
    Ll,
    /// `j`
    J,
    /// `z`
    Z,
    /// `t`
    T,
}

/// One parsed conversion directive. Immutable once parsed; a rejected
/// directive yields no partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    text: String,
    conversion: Conversion,
    flags: Flags,
    width: Option<usize>,
    precision: Option<usize>,
    length: Option<Length>,
}

impl FormatSpec {
    /// Parses a complete directive such as `"%-10.3s"`.
    pub fn parse(directive: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidSpec(directive.to_string());
        let rest = directive.strip_prefix('%').ok_or_else(invalid)?;
        let (consumed, parsed) = Self::take(rest);
        if consumed != rest.len() {
            return Err(invalid());
        }
        parsed
    }

    /// Parses a directive at the head of `input`, the text immediately
    /// after a `%`. Returns the number of bytes the directive occupies in
    /// `input` (even when it is rejected, so callers can resume
    /// tokenizing after it) alongside the parse result.
    pub(crate) fn take(input: &str) -> (usize, Result<Self, Error>) {
        let bytes = input.as_bytes();
        let mut pos = 0;

        let mut flags = Flags::default();
        while pos < bytes.len() {
            match bytes[pos] {
                b'-' => flags.left_justify = true,
                b'+' => flags.force_sign = true,
                b' ' => flags.space_sign = true,
                b'#' => flags.alt_form = true,
                b'0' => flags.zero_pad = true,
                _ => break,
            }
            pos += 1;
        }

        let width = take_decimal(bytes, &mut pos);

        let precision = if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            // `.` with no digits means precision zero.
            Some(take_decimal(bytes, &mut pos).unwrap_or(0))
        } else {
            None
        };

        let length = take_length(bytes, &mut pos);

        let Some(conversion_char) = input[pos..].chars().next() else {
            // `%` at the end of the format string: malformed.
            let text = format!("%{}", &input[..pos]);
            return (pos, Err(Error::InvalidSpec(text)));
        };
        pos += conversion_char.len_utf8();
        let conversion = Conversion::from_char(conversion_char);
        let text = format!("%{}", &input[..pos]);

        let spec = FormatSpec {
            text,
            conversion,
            flags,
            width,
            precision,
            length,
        };
        let parsed = spec.validate().map(|()| spec.normalized());
        (pos, parsed)
    }

    /// Rejects flag combinations that are illegal for this conversion.
    fn validate(&self) -> Result<(), Error> {
        let invalid = || Error::InvalidSpec(self.text.clone());
        let Flags {
            left_justify,
            force_sign,
            space_sign,
            alt_form,
            zero_pad,
        } = self.flags;
        match self.conversion {
            // `%%` admits nothing between the percent signs.
            Conversion::Percent => {
                let bare = !(left_justify || force_sign || space_sign || alt_form || zero_pad)
                    && self.width.is_none()
                    && self.precision.is_none()
                    && self.length.is_none();
                if !bare {
                    return Err(invalid());
                }
            }
            Conversion::Char | Conversion::Str => {
                if force_sign || space_sign || alt_form || zero_pad {
                    return Err(invalid());
                }
            }
            Conversion::Pointer => {
                if alt_form || zero_pad {
                    return Err(invalid());
                }
            }
            Conversion::SignedDec | Conversion::UnsignedDec => {
                if alt_form {
                    return Err(invalid());
                }
            }
            // Octal, hex, and the float family accept every flag.
            // Unsupported conversions fail at decode time regardless.
            _ => {}
        }
        Ok(())
    }

    /// Applies the C flag-subsumption rules: `+` overrides ` `, `-`
    /// overrides `0`.
    fn normalized(mut self) -> Self {
        if self.flags.force_sign {
            self.flags.space_sign = false;
        }
        if self.flags.left_justify {
            self.flags.zero_pad = false;
        }
        self
    }

    /// The original directive text, including the leading `%`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Render-time padding target, in characters.
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// Minimum digits, float fraction digits, or string truncation,
    /// depending on the conversion.
    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    pub fn length(&self) -> Option<Length> {
        self.length
    }

    /// True when the argument decodes at 64-bit width.
    pub(crate) fn is_64_bit(&self) -> bool {
        matches!(self.length, Some(Length::Ll | Length::J))
    }

    /// The conversion character as written, e.g. `n` for an unsupported
    /// `%n`.
    pub(crate) fn conversion_char(&self) -> char {
        self.text.chars().next_back().unwrap_or('%')
    }
}

fn take_decimal(bytes: &[u8], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    let mut value = 0usize;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add((bytes[*pos] - b'0') as usize);
        *pos += 1;
    }
    (*pos > start).then_some(value)
}

fn take_length(bytes: &[u8], pos: &mut usize) -> Option<Length> {
    let length = match bytes.get(*pos)? {
        b'h' => {
            if bytes.get(*pos + 1) == Some(&b'h') {
                *pos += 1;
                Length::Hh
            } else {
                Length::H
            }
        }
        b'l' => {
            if bytes.get(*pos + 1) == Some(&b'l') {
                *pos += 1;
                Length::Ll
            } else {
                Length::L
            }
        }
        b'j' => Length::J,
        b'z' => Length::Z,
        b't' => Length::T,
        _ => return None,
    };
    *pos += 1;
    Some(length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let spec = FormatSpec::parse("%d").unwrap();
        assert_eq!(spec.conversion(), Conversion::SignedDec);
        assert_eq!(spec.text(), "%d");
        assert_eq!(spec.width(), None);
        assert_eq!(spec.precision(), None);
    }

    #[test]
    fn test_parse_full() {
        let spec = FormatSpec::parse("%-10.3s").unwrap();
        assert_eq!(spec.conversion(), Conversion::Str);
        assert!(spec.flags().left_justify);
        assert_eq!(spec.width(), Some(10));
        assert_eq!(spec.precision(), Some(3));
    }

    #[test]
    fn test_parse_flags_any_order() {
        let a = FormatSpec::parse("%+ #0o").unwrap();
        let b = FormatSpec::parse("%0# +o").unwrap();
        assert_eq!(a.flags(), b.flags());
        assert!(a.flags().force_sign && a.flags().alt_form && a.flags().zero_pad);
        // `+` subsumes ` `.
        assert!(!a.flags().space_sign);
    }

    #[test]
    fn test_parse_dot_without_digits() {
        let spec = FormatSpec::parse("%.f").unwrap();
        assert_eq!(spec.precision(), Some(0));
    }

    #[test]
    fn test_parse_length_modifiers() {
        assert_eq!(FormatSpec::parse("%hhd").unwrap().length(), Some(Length::Hh));
        assert_eq!(FormatSpec::parse("%hd").unwrap().length(), Some(Length::H));
        assert_eq!(FormatSpec::parse("%ld").unwrap().length(), Some(Length::L));
        assert_eq!(FormatSpec::parse("%lld").unwrap().length(), Some(Length::Ll));
        assert_eq!(FormatSpec::parse("%jd").unwrap().length(), Some(Length::J));
        assert_eq!(FormatSpec::parse("%zu").unwrap().length(), Some(Length::Z));
        assert_eq!(FormatSpec::parse("%td").unwrap().length(), Some(Length::T));

        assert!(!FormatSpec::parse("%ld").unwrap().is_64_bit());
        assert!(FormatSpec::parse("%lld").unwrap().is_64_bit());
        assert!(FormatSpec::parse("%ju").unwrap().is_64_bit());
    }

    #[test]
    fn test_zero_ignored_with_left_justify() {
        let spec = FormatSpec::parse("%-05d").unwrap();
        assert!(spec.flags().left_justify);
        assert!(!spec.flags().zero_pad);
    }

    #[test]
    fn test_illegal_flag_combinations() {
        for directive in [
            "%#d", "%#i", "%#u", "%#c", "%#s", "%#p", "%0c", "%0s", "%0p", "%+c", "% c", "%+s",
            "% s",
        ] {
            assert!(
                matches!(FormatSpec::parse(directive), Err(Error::InvalidSpec(_))),
                "{directive} should be rejected"
            );
        }
    }

    #[test]
    fn test_percent_admits_no_modifiers() {
        assert_eq!(
            FormatSpec::parse("%%").unwrap().conversion(),
            Conversion::Percent
        );
        for directive in ["%+%", "%-%", "% %", "%#%", "%0%", "%5%", "%.2%", "%l%"] {
            assert!(
                FormatSpec::parse(directive).is_err(),
                "{directive} should be rejected"
            );
        }
    }

    #[test]
    fn test_unsupported_conversions_parse() {
        assert_eq!(
            FormatSpec::parse("%n").unwrap().conversion(),
            Conversion::Unsupported
        );
        assert_eq!(FormatSpec::parse("%n").unwrap().conversion_char(), 'n');
    }

    #[test]
    fn test_trailing_percent_is_malformed() {
        assert!(matches!(
            FormatSpec::parse("%"),
            Err(Error::InvalidSpec(_))
        ));
        assert!(matches!(
            FormatSpec::parse("%-5"),
            Err(Error::InvalidSpec(_))
        ));
    }

    #[test]
    fn test_take_reports_extent_on_rejection() {
        let (consumed, parsed) = FormatSpec::take("#d rest");
        assert_eq!(consumed, 2);
        assert!(parsed.is_err());
    }
}
