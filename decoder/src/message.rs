//! Message decoding: a format string driven across an argument payload.
//!
//! The format string is tokenized once into literal runs and directives.
//! Directives decode strictly left to right; the first failure poisons
//! the byte offset, so every later directive is marked skipped without
//! touching the payload.

use crate::{
    arg::{ArgStatus, DecodedArg},
    score::Score,
    spec::FormatSpec,
    Error,
};
use chrono::{DateTime, Utc};
use tracing::trace;

/// A parsed format string, reusable across payloads.
#[derive(Debug, Clone)]
pub struct FormatString {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Directive(FormatSpec),
    /// A directive that failed to parse. It is kept in place so decoding
    /// reports it as the failing directive when reached.
    Invalid { text: String, reason: Error },
}

impl FormatString {
    /// Tokenizes `format`. Malformed directives do not reject the whole
    /// string; they surface as decode-time errors, since a candidate
    /// format string is data, not trusted input.
    pub fn new(format: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = format;
        while let Some(at) = rest.find('%') {
            if at > 0 {
                segments.push(Segment::Literal(rest[..at].to_string()));
            }
            let after = &rest[at + 1..];
            let (consumed, parsed) = FormatSpec::take(after);
            segments.push(match parsed {
                Ok(spec) => Segment::Directive(spec),
                Err(reason) => Segment::Invalid {
                    text: format!("%{}", &after[..consumed]),
                    reason,
                },
            });
            rest = &after[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        FormatString { segments }
    }

    /// Number of non-literal directives (the expected argument count).
    pub fn directives(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| !matches!(segment, Segment::Literal(_)))
            .count()
    }

    /// Decodes `data` against this format string. Never fails: malformed
    /// payloads produce a result whose outcomes say what went wrong.
    pub fn format(&self, data: &[u8]) -> FormattedMessage {
        let mut buf = data;
        let mut pieces = Vec::with_capacity(self.segments.len());
        let mut args = Vec::with_capacity(self.directives());
        let mut halted = false;
        for segment in &self.segments {
            let arg = match segment {
                Segment::Literal(text) => {
                    pieces.push(Piece::Literal(text.clone()));
                    continue;
                }
                Segment::Directive(spec) if !halted => {
                    let total = buf.len();
                    spec.decode_from(&mut buf, total)
                }
                Segment::Directive(spec) => {
                    DecodedArg::skipped(spec.text().to_string(), Some(spec.clone()))
                }
                Segment::Invalid { text, reason } if !halted => {
                    DecodedArg::unparsed(text.clone(), reason.clone())
                }
                Segment::Invalid { text, .. } => DecodedArg::skipped(text.clone(), None),
            };
            if let ArgStatus::Error { reason, .. } = arg.status() {
                trace!(directive = arg.text(), error = %reason, "argument failed to decode");
                halted = true;
            }
            pieces.push(Piece::Arg(args.len()));
            args.push(arg);
        }
        FormattedMessage {
            pieces,
            args,
            remaining: buf.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
enum Piece {
    Literal(String),
    Arg(usize),
}

/// Result of decoding one payload against one format string. Constructed
/// once by [`FormatString::format`]; every accessor is a pure query.
#[derive(Debug, Clone)]
pub struct FormattedMessage {
    pieces: Vec<Piece>,
    args: Vec<DecodedArg>,
    remaining: Vec<u8>,
}

impl FormattedMessage {
    /// True when every directive decoded and no payload bytes remain.
    pub fn ok(&self) -> bool {
        self.remaining.is_empty() && self.args.iter().all(DecodedArg::ok)
    }

    /// The unconsumed payload tail.
    pub fn remaining(&self) -> &[u8] {
        &self.remaining
    }

    /// Per-directive outcomes, in directive order.
    pub fn args(&self) -> &[DecodedArg] {
        &self.args
    }

    /// Renders the message. With `render_errors`, failed and skipped
    /// directives become inline diagnostics (`<[%d ERROR]>`,
    /// `<[%d SKIPPED]>`); otherwise they echo their original directive
    /// text, preserving the format string where failure is tolerated.
    pub fn render(&self, render_errors: bool) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Arg(index) => out.push_str(&self.args[*index].render(render_errors)),
            }
        }
        out
    }

    /// Comparable rank for choosing among candidate format strings that
    /// share a token. `recency` is when this candidate was last
    /// associated with the token; `None` ranks as freshest.
    pub fn score(&self, recency: Option<DateTime<Utc>>) -> Score {
        let failed = self.args.iter().filter(|arg| !arg.ok()).count();
        Score {
            ok: self.ok(),
            fully_consumed: self.remaining.is_empty(),
            penalty: -(failed as i64),
            directives: self.args.len(),
            recency: recency.unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }
}

/// Decodes `data` against `format`, returning only the rendered text.
/// See [`FormattedMessage::render`] for the two error-rendering modes;
/// callers that need outcomes or scoring use [`FormatString::format`].
pub fn decode(format: &str, data: &[u8], render_errors: bool) -> String {
    FormatString::new(format).format(data).render(render_errors)
}
