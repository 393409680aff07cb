//! Ranking of candidate decodings.
//!
//! A hash-based token lookup can yield several candidate format strings
//! for one token. Each candidate is decoded against the same payload and
//! the highest-scoring result wins.

use chrono::{DateTime, Utc};

/// Comparable rank of a completed decode.
///
/// Fields compare lexicographically in declaration order and larger is
/// better on every field. A fully self-consistent decode is categorically
/// more trustworthy than a partial one; among partial decodes, the
/// penalty separates results by how much of the message is usable. The
/// remaining fields only break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score {
    /// Every directive decoded and the payload was fully consumed.
    pub ok: bool,
    /// The payload was fully consumed. Holds for many failed decodes too,
    /// since a failing attempt still advances as far as it can.
    pub fully_consumed: bool,
    /// Negated count of directives that did not decode (errors plus
    /// skips); zero when everything decoded.
    pub penalty: i64,
    /// Total number of directives in the format string, independent of
    /// outcome.
    pub directives: usize,
    /// When this candidate was last associated with its token. Candidates
    /// without a date rank as freshest.
    pub recency: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Score {
        Score {
            ok: false,
            fully_consumed: true,
            penalty: -1,
            directives: 2,
            recency: DateTime::<Utc>::MAX_UTC,
        }
    }

    #[test]
    fn test_field_dominance() {
        let ok = Score { ok: true, ..base() };
        assert!(ok > base());

        let partial = Score {
            fully_consumed: false,
            ..base()
        };
        assert!(base() > partial);

        let worse_penalty = Score {
            penalty: -2,
            ..base()
        };
        assert!(base() > worse_penalty);

        let fewer_directives = Score {
            directives: 1,
            ..base()
        };
        assert!(base() > fewer_directives);
    }

    #[test]
    fn test_recency_breaks_ties() {
        let stale = Score {
            recency: DateTime::<Utc>::MIN_UTC,
            ..base()
        };
        assert!(base() > stale);
        assert_eq!(base(), base());
    }
}
