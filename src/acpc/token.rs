use std::fmt::{self, Display};

use crate::core::{AmountError, format_acpc, parse_amount};
use crate::errors::TranslationError;

/// One action in the compact notation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompactToken {
    /// `f`
    Fold,
    /// `c`, a check or a call.
    Call,
    /// `r<amount>` where amount is the actor's hand total after the raise,
    /// in minor units.
    Raise(i64),
}

impl Display for CompactToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompactToken::Fold => write!(f, "f"),
            CompactToken::Call => write!(f, "c"),
            CompactToken::Raise(level) => write!(f, "r{}", format_acpc(*level)),
        }
    }
}

/// Split a compact sequence into its `/` separated segments of tokens.
///
/// Any number of segments is accepted, trailing empty ones included.
/// Raise amounts may have zero, one or two fraction digits.
///
/// ```
/// use hh_acpc::acpc::{CompactToken, parse_sequence};
///
/// let segments = parse_sequence("r6c/cr10.5f//").unwrap();
/// assert_eq!(4, segments.len());
/// assert_eq!(vec![CompactToken::Raise(600), CompactToken::Call], segments[0]);
/// assert_eq!(CompactToken::Raise(1050), segments[1][1]);
/// ```
pub fn parse_sequence(sequence: &str) -> Result<Vec<Vec<CompactToken>>, TranslationError> {
    sequence.split('/').map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Result<Vec<CompactToken>, TranslationError> {
    let mut tokens = Vec::new();
    let mut rest = segment;

    while let Some(c) = rest.chars().next() {
        rest = &rest[c.len_utf8()..];
        let token = match c {
            'f' => CompactToken::Fold,
            'c' => CompactToken::Call,
            'r' => {
                let end = rest
                    .find(|ch: char| !(ch.is_ascii_digit() || ch == '.'))
                    .unwrap_or(rest.len());
                let (digits, tail) = rest.split_at(end);
                rest = tail;
                let level = parse_amount(digits).map_err(|e| match e {
                    AmountError::Overflow(_) => TranslationError::AmountOverflow,
                    _ => TranslationError::MalformedToken(format!("r{digits}")),
                })?;
                CompactToken::Raise(level)
            }
            other => return Err(TranslationError::MalformedToken(other.to_string())),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Join segments back into a sequence string.
pub fn format_sequence(segments: &[Vec<CompactToken>]) -> String {
    segments
        .iter()
        .map(|tokens| tokens.iter().map(ToString::to_string).collect::<String>())
        .collect::<Vec<_>>()
        .join("/")
}
