//! Decode tokenized printf-style log payloads.
//!
//! # Overview
//!
//! Resource-constrained devices log by emitting a numeric token (resolved
//! elsewhere to a printf-style format string) followed by a compact
//! binary encoding of the arguments. This crate reconstitutes the
//! human-readable message from the recovered format string and the
//! argument payload, and it is built to survive hostile inputs such as
//! truncated payloads or format strings that were never the right
//! candidate in the first place. Nothing here panics on malformed data:
//! every failure is recorded per directive and reported as a value.
//!
//! When a token hash collides, several candidate format strings decode
//! the same payload; [`FormattedMessage::score`] ranks the results so the
//! caller can keep the most plausible one.
//!
//! # Wire format
//!
//! Arguments appear in the order the format string references them:
//! - Integer family (`%d`, `%i`, `%u`, `%o`, `%x`, `%X`, `%c`, `%p`):
//!   zig-zag varint, decoded at 32-bit width unless the directive carries
//!   an `ll`/`j` length modifier. Unsigned conversions reinterpret the
//!   two's-complement bit pattern.
//! - Floats (`%f`, `%e`, `%g`, and uppercase forms): 8-byte
//!   little-endian binary64.
//! - Strings (`%s`): varint length, then that many bytes of UTF-8.
//!
//! # Example
//!
//! ```
//! use detok_decoder::FormatString;
//!
//! let payload = detok_decoder::encode_args!(-1, "jellyfish");
//! let result = FormatString::new("sensor %d: %s").format(&payload);
//! assert!(result.ok());
//! assert_eq!(result.render(true), "sensor -1: jellyfish");
//! ```
//!
//! # Example (ranking candidates)
//!
//! ```
//! use detok_decoder::FormatString;
//!
//! let payload = detok_decoder::encode_args!(3, 7);
//! let plausible = FormatString::new("%d of %d").format(&payload);
//! let collision = FormatString::new("%f done").format(&payload);
//! assert!(plausible.score(None) > collision.score(None));
//! ```

pub mod arg;
pub mod encode;
pub mod error;
pub mod message;
mod render;
pub mod score;
pub mod spec;
pub mod varint;

// Re-export main types and functions
pub use arg::{ArgStatus, DecodedArg};
pub use encode::{encode, write_arg, Arg};
pub use error::Error;
pub use message::{decode, FormatString, FormattedMessage};
pub use score::Score;
pub use spec::{Conversion, Flags, FormatSpec, Length};
