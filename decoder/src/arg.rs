//! Decoding of one argument per directive.
//!
//! Every integer-family conversion shares a single wire encoding, the
//! zig-zag varint; unsigned conversions reinterpret the decoded
//! two's-complement bit pattern at the conversion's width. Floats are
//! fixed 8-byte little-endian binary64. Strings are varint-length
//! prefixed UTF-8.

use crate::{render, spec::Conversion, varint, Error, FormatSpec};
use bytes::Buf;
use std::fmt::Write;

/// Outcome of decoding one directive's argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgStatus {
    /// The argument decoded; `rendered` is the finished field text.
    Success { rendered: String, consumed: usize },
    /// The argument could not be decoded. Bytes examined during the
    /// attempt stay consumed; they are not trustworthy enough to rewind.
    Error { reason: Error, consumed: usize },
    /// Never attempted, because an earlier directive in the message
    /// failed and the byte offset is unreliable past that point.
    Skipped,
}

/// One directive's decode record inside a formatted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArg {
    text: String,
    spec: Option<FormatSpec>,
    status: ArgStatus,
}

impl DecodedArg {
    pub(crate) fn new(spec: FormatSpec, status: ArgStatus) -> Self {
        DecodedArg {
            text: spec.text().to_string(),
            spec: Some(spec),
            status,
        }
    }

    /// Records a directive that failed to parse; it consumes nothing and
    /// fails with the parser's reason.
    pub(crate) fn unparsed(text: String, reason: Error) -> Self {
        DecodedArg {
            text,
            spec: None,
            status: ArgStatus::Error {
                reason,
                consumed: 0,
            },
        }
    }

    pub(crate) fn skipped(text: String, spec: Option<FormatSpec>) -> Self {
        DecodedArg {
            text,
            spec,
            status: ArgStatus::Skipped,
        }
    }

    /// The original directive text, including the leading `%`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed directive, when it parsed at all.
    pub fn spec(&self) -> Option<&FormatSpec> {
        self.spec.as_ref()
    }

    pub fn status(&self) -> &ArgStatus {
        &self.status
    }

    pub fn ok(&self) -> bool {
        matches!(self.status, ArgStatus::Success { .. })
    }

    /// Payload bytes consumed by this directive (zero when skipped).
    pub fn consumed(&self) -> usize {
        match self.status {
            ArgStatus::Success { consumed, .. } | ArgStatus::Error { consumed, .. } => consumed,
            ArgStatus::Skipped => 0,
        }
    }

    /// Text for this argument within a rendered message. With
    /// `render_errors`, failures become inline diagnostics such as
    /// `<[%c ERROR (-1)]>`; otherwise the original directive text is
    /// echoed verbatim.
    pub(crate) fn render(&self, render_errors: bool) -> String {
        match &self.status {
            ArgStatus::Success { rendered, .. } => rendered.clone(),
            ArgStatus::Error { reason, .. } if render_errors => {
                match reason {
                    Error::InvalidChar(value) => format!("<[{} ERROR ({value})]>", self.text),
                    Error::InvalidUtf8(raw) => {
                        format!("<[{} ERROR ('{}')]>", self.text, escape_bytes(raw))
                    }
                    _ => format!("<[{} ERROR]>", self.text),
                }
            }
            ArgStatus::Skipped if render_errors => format!("<[{} SKIPPED]>", self.text),
            ArgStatus::Error { .. } | ArgStatus::Skipped => self.text.clone(),
        }
    }
}

impl FormatSpec {
    /// Decodes a single argument for this directive from the front of
    /// `data`.
    pub fn decode(&self, data: &[u8]) -> DecodedArg {
        let mut buf = data;
        self.decode_from(&mut buf, data.len())
    }

    /// Decodes from a cursor, advancing it past the bytes the attempt
    /// examined (successful or not). `total` is the cursor's remaining
    /// length on entry, used to report consumption.
    pub(crate) fn decode_from(&self, buf: &mut &[u8], total: usize) -> DecodedArg {
        let status = match decode_field(self, buf) {
            Ok(rendered) => ArgStatus::Success {
                rendered,
                consumed: total - buf.len(),
            },
            Err(reason) => ArgStatus::Error {
                reason,
                consumed: total - buf.len(),
            },
        };
        DecodedArg::new(self.clone(), status)
    }
}

fn decode_field(spec: &FormatSpec, buf: &mut &[u8]) -> Result<String, Error> {
    let max_bytes = if spec.is_64_bit() {
        varint::MAX_BYTES_64
    } else {
        varint::MAX_BYTES_32
    };
    match spec.conversion() {
        Conversion::Percent => Ok("%".to_string()),
        Conversion::Unsupported => Err(Error::UnsupportedConversion(spec.conversion_char())),
        Conversion::SignedDec => {
            let value = varint::read_signed(buf, max_bytes)?;
            let value = if spec.is_64_bit() {
                value
            } else {
                value as i32 as i64
            };
            Ok(render::signed(value, spec))
        }
        Conversion::UnsignedDec | Conversion::Octal | Conversion::HexLower | Conversion::HexUpper => {
            let value = varint::read_signed(buf, max_bytes)?;
            let value = if spec.is_64_bit() {
                value as u64
            } else {
                value as u32 as u64
            };
            Ok(render::unsigned(value, spec))
        }
        Conversion::Pointer => {
            // Addresses come from 32-bit devices.
            let value = varint::read_signed(buf, varint::MAX_BYTES_32)?;
            Ok(render::pointer(value as u32, spec))
        }
        Conversion::Char => {
            let value = varint::read_signed(buf, varint::MAX_BYTES_32)? as i32;
            let code = u32::try_from(value)
                .ok()
                .and_then(char::from_u32)
                .ok_or(Error::InvalidChar(value as i64))?;
            Ok(render::character(code, spec))
        }
        Conversion::Float
        | Conversion::FloatUpper
        | Conversion::Exponential
        | Conversion::ExponentialUpper
        | Conversion::Shortest
        | Conversion::ShortestUpper => {
            if buf.remaining() < 8 {
                buf.advance(buf.remaining());
                return Err(Error::EndOfBuffer);
            }
            let value = buf.get_f64_le();
            Ok(render::float(value, spec))
        }
        Conversion::Str => {
            let len = varint::read(buf, varint::MAX_BYTES_32)?;
            if len > buf.remaining() as u64 {
                buf.advance(buf.remaining());
                return Err(Error::EndOfBuffer);
            }
            let mut raw = vec![0u8; len as usize];
            buf.copy_to_slice(&mut raw);
            match String::from_utf8(raw) {
                Ok(text) => Ok(render::string(&text, spec)),
                Err(error) => Err(Error::InvalidUtf8(error.into_bytes())),
            }
        }
    }
}

/// Escapes raw bytes for an error diagnostic: printable ASCII passes
/// through, everything else becomes `\xNN`.
fn escape_bytes(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    for &byte in raw {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'\'' => out.push_str("\\'"),
            0x20..=0x7E => out.push(byte as char),
            _ => {
                let _ = write!(out, "\\x{byte:02x}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(directive: &str) -> FormatSpec {
        FormatSpec::parse(directive).unwrap()
    }

    #[test]
    fn test_decode_signed() {
        let arg = spec("%d").decode(&[0x13]);
        assert_eq!(
            *arg.status(),
            ArgStatus::Success {
                rendered: "-10".to_string(),
                consumed: 1
            }
        );
    }

    #[test]
    fn test_decode_64_bit() {
        let mut payload = Vec::new();
        varint::write_signed(-40_000_000_000, &mut payload);
        let arg = spec("%lld").decode(&payload);
        assert_eq!(
            *arg.status(),
            ArgStatus::Success {
                rendered: "-40000000000".to_string(),
                consumed: payload.len()
            }
        );

        // The same payload is over-long for a 32-bit directive.
        let arg = spec("%d").decode(&payload);
        assert!(matches!(
            arg.status(),
            ArgStatus::Error {
                reason: Error::InvalidVarint,
                ..
            }
        ));
    }

    #[test]
    fn test_unsigned_reinterprets_bit_pattern() {
        let mut payload = Vec::new();
        varint::write_signed(-1, &mut payload);
        let arg = spec("%u").decode(&payload);
        assert_eq!(
            *arg.status(),
            ArgStatus::Success {
                rendered: "4294967295".to_string(),
                consumed: 1
            }
        );

        let arg = spec("%llu").decode(&payload);
        assert_eq!(
            *arg.status(),
            ArgStatus::Success {
                rendered: "18446744073709551615".to_string(),
                consumed: 1
            }
        );
    }

    #[test]
    fn test_decode_char_rejects_bad_code_points() {
        let arg = spec("%c").decode(&[0x01]);
        assert!(matches!(
            arg.status(),
            ArgStatus::Error {
                reason: Error::InvalidChar(-1),
                consumed: 1
            }
        ));
        assert_eq!(arg.render(true), "<[%c ERROR (-1)]>");
        assert_eq!(arg.render(false), "%c");

        // Five continuation-heavy bytes decode to i32::MIN.
        let arg = spec("%c").decode(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(arg.render(true), "<[%c ERROR (-2147483648)]>");
    }

    #[test]
    fn test_decode_string_consumes_attempt() {
        // Length 3 followed by bytes that are not UTF-8.
        let arg = spec("%s").decode(&[0x03, b'N', 0x80, b'!']);
        assert!(matches!(
            arg.status(),
            ArgStatus::Error {
                reason: Error::InvalidUtf8(_),
                consumed: 4
            }
        ));
        assert_eq!(arg.render(true), "<[%s ERROR ('N\\x80!')]>");
    }

    #[test]
    fn test_decode_string_underflow() {
        let arg = spec("%s").decode(&[0x05, b'h', b'i']);
        assert!(matches!(
            arg.status(),
            ArgStatus::Error {
                reason: Error::EndOfBuffer,
                consumed: 3
            }
        ));
    }

    #[test]
    fn test_decode_float_underflow() {
        let arg = spec("%f").decode(&[0x00, 0x01, 0x02]);
        assert!(matches!(
            arg.status(),
            ArgStatus::Error {
                reason: Error::EndOfBuffer,
                consumed: 3
            }
        ));
    }

    #[test]
    fn test_percent_consumes_nothing() {
        let arg = spec("%%").decode(&[0xAA]);
        assert_eq!(
            *arg.status(),
            ArgStatus::Success {
                rendered: "%".to_string(),
                consumed: 0
            }
        );
    }

    #[test]
    fn test_unsupported_always_fails() {
        let arg = spec("%n").decode(&[]);
        assert!(matches!(
            arg.status(),
            ArgStatus::Error {
                reason: Error::UnsupportedConversion('n'),
                consumed: 0
            }
        ));
    }
}
