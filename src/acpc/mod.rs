//! The compact action notation used by the ACPC tooling.
//!
//! A sequence has one `/` separated segment per street. Each segment is
//! a run of `f` (fold), `c` (check or call) and `r<amount>` (bet or raise)
//! tokens, where the amount is the actor's hand cumulative commitment
//! after the action. `r6.00c/cr14.00f//` is a raise to 6 and a call,
//! then a check, a bet of 8 on top of the 6 already in, and a fold.

/// Tokens and segment splitting.
mod token;
pub use self::token::{CompactToken, format_sequence, parse_sequence};

/// Text level wagering events to compact notation.
mod encoder;
pub use self::encoder::{EncodedStreet, SequenceEncoder, WagerEvent, encode_street};

/// Compact notation back to typed actions via a betting oracle.
mod decoder;
pub use self::decoder::{Action, DecodedHand, PositionedAction, StreetActions, decode};
