//! Argument encoding: the byte-for-byte inverse of decoding.
//!
//! Produces the payloads on-device tokenizers emit. Integer-family
//! values (including chars and pointers) are zig-zag varints; floats are
//! 8-byte little-endian binary64; strings are varint-length-prefixed
//! UTF-8.

use crate::varint;
use bytes::BufMut;

/// One typed argument value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    /// Integer-family value: signed, unsigned, octal, hex, char code, or
    /// pointer address.
    Int(i64),
    /// 64-bit value supplied in its unsigned representation.
    Uint(u64),
    Float(f64),
    Char(char),
    Str(&'a str),
}

impl From<i32> for Arg<'static> {
    fn from(value: i32) -> Self {
        Arg::Int(value as i64)
    }
}

impl From<i64> for Arg<'static> {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<u32> for Arg<'static> {
    fn from(value: u32) -> Self {
        Arg::Int(value as i64)
    }
}

impl From<u64> for Arg<'static> {
    fn from(value: u64) -> Self {
        Arg::Uint(value)
    }
}

impl From<f64> for Arg<'static> {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<char> for Arg<'static> {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

/// Encodes `args` into a payload buffer in argument order.
pub fn encode<'a>(args: impl IntoIterator<Item = Arg<'a>>) -> Vec<u8> {
    let mut out = Vec::new();
    for arg in args {
        write_arg(arg, &mut out);
    }
    out
}

/// Writes one argument in wire order.
pub fn write_arg(arg: Arg<'_>, buf: &mut impl BufMut) {
    match arg {
        Arg::Int(value) => varint::write_signed(value, buf),
        Arg::Uint(value) => varint::write_signed(value as i64, buf),
        Arg::Char(value) => varint::write_signed(value as i64, buf),
        Arg::Float(value) => buf.put_f64_le(value),
        Arg::Str(value) => {
            varint::write(value.len() as u64, buf);
            buf.put_slice(value.as_bytes());
        }
    }
}

/// Encodes a payload from a comma-separated list of values, converting
/// each through [`Arg::from`].
///
/// ```
/// let payload = detok_decoder::encode_args!(-10, "label");
/// assert_eq!(payload, [0x13, 0x05, b'l', b'a', b'b', b'e', b'l']);
/// ```
#[macro_export]
macro_rules! encode_args {
    () => { $crate::encode(::std::iter::empty::<$crate::Arg<'static>>()) };
    ($($arg:expr),+ $(,)?) => { $crate::encode([$($crate::Arg::from($arg)),+]) };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_wire_bytes() {
        assert_eq!(encode_args!(0), [0x00]);
        assert_eq!(encode_args!(-1), [0x01]);
        assert_eq!(encode_args!(1), [0x02]);
        assert_eq!(encode_args!(-10), [0x13]);
        assert_eq!(encode_args!(i32::MIN), [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_char_is_an_integer() {
        assert_eq!(encode_args!('c'), encode_args!('c' as i32));
    }

    #[test]
    fn test_float_wire_bytes() {
        assert_eq!(encode_args!(2.2), 2.2f64.to_le_bytes());
    }

    #[test]
    fn test_string_framing() {
        assert_eq!(encode_args!("hi"), [0x02, b'h', b'i']);
        assert_eq!(encode_args!(""), [0x00]);

        // Lengths past 127 take a two-byte varint.
        let long = "x".repeat(200);
        let payload = encode_args!(long.as_str());
        assert_eq!(&payload[..2], &[0xC8, 0x01]);
        assert_eq!(payload.len(), 202);
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(encode_args!(), Vec::<u8>::new());
    }

    #[test]
    fn test_multiple_args_concatenate() {
        let payload = encode_args!(1, "ab", 2.2);
        let mut expected = vec![0x02, 0x02, b'a', b'b'];
        expected.extend_from_slice(&2.2f64.to_le_bytes());
        assert_eq!(payload, expected);
    }
}
