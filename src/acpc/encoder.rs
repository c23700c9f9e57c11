use tracing::trace;

use crate::core::Street;
use crate::errors::TranslationError;

use super::token::{CompactToken, format_sequence};

/// A wagering line as the text format prints it. Amounts are street
/// level, the way `bets 10` or `raises 20 to 30` read, in minor units.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WagerEvent {
    Fold,
    Check,
    Call,
    Bet(i64),
    RaiseTo(i64),
}

/// The compact form of one street plus the level carried into the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStreet {
    pub tokens: Vec<CompactToken>,
    /// Hand cumulative level the next street's amounts sit on.
    pub carry: i64,
}

/// Encode one street.
///
/// `baseline` is the hand cumulative commitment everyone matched before
/// this street, which gets added to the street level amounts. `floor` is
/// the level that's already live when the street opens (the big blind
/// preflop, the baseline afterwards).
///
/// The carry is the highest level reached on the street, never a sum of
/// raise deltas, so streets with several raises don't double count.
pub fn encode_street(
    events: &[WagerEvent],
    baseline: i64,
    floor: i64,
) -> Result<EncodedStreet, TranslationError> {
    let mut tokens = Vec::with_capacity(events.len());
    let mut high = floor.max(baseline);

    for event in events {
        let token = match *event {
            WagerEvent::Fold => CompactToken::Fold,
            WagerEvent::Check | WagerEvent::Call => CompactToken::Call,
            WagerEvent::Bet(amount) | WagerEvent::RaiseTo(amount) => {
                let level = baseline
                    .checked_add(amount)
                    .ok_or(TranslationError::AmountOverflow)?;
                high = high.max(level);
                CompactToken::Raise(level)
            }
        };
        tokens.push(token);
    }

    Ok(EncodedStreet {
        tokens,
        carry: high,
    })
}

/// Encodes a whole hand, street by street.
///
/// ```
/// use hh_acpc::acpc::{SequenceEncoder, WagerEvent};
///
/// // 1/2 blinds in minor units.
/// let streets = [
///     vec![WagerEvent::RaiseTo(600), WagerEvent::Call],
///     vec![WagerEvent::Check, WagerEvent::Bet(800), WagerEvent::Fold],
///     vec![],
///     vec![],
/// ];
/// let sequence = SequenceEncoder::new(200).encode(&streets).unwrap();
/// assert_eq!("r6.00c/cr14.00f//", sequence);
/// ```
#[derive(Debug, Clone)]
pub struct SequenceEncoder {
    big_blind: i64,
}

impl SequenceEncoder {
    pub fn new(big_blind: i64) -> Self {
        Self { big_blind }
    }

    /// Encode all four streets, indexed by [`Street::index`]. Streets the
    /// hand never reached are empty and come out as empty segments.
    pub fn encode(&self, streets: &[Vec<WagerEvent>; 4]) -> Result<String, TranslationError> {
        let mut segments = Vec::with_capacity(streets.len());
        let mut baseline = 0;

        for (street, events) in Street::ALL.iter().zip(streets.iter()) {
            let floor = match street {
                Street::Preflop => self.big_blind,
                _ => baseline,
            };
            let encoded = encode_street(events, baseline, floor)?;
            trace!(%street, baseline, carry = encoded.carry, "Encoded street");
            baseline = encoded.carry;
            segments.push(encoded.tokens);
        }

        Ok(format_sequence(&segments))
    }
}
