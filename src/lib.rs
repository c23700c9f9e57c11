//! Translate poker hand histories between the verbose PokerStars text
//! format and the compact positional action notation used by the ACPC
//! (Annual Computer Poker Competition) tooling.
//!
//! # Forward: text to ACPC
//!
//! ```
//! use hh_acpc::core::Position;
//! use hh_acpc::hand_history::HandRecord;
//!
//! let text = "PokerStars Hand #1: Hold'em No Limit (1/2) - 2016/07/29 23:25:05 ET
//! Table 'Alpha' 2-max Seat #1 is the button
//! Seat 1: alice (100 in chips)
//! Seat 2: bob (100 in chips)
//! alice: posts small blind 1
//! bob: posts big blind 2
//! *** HOLE CARDS ***
//! alice: raises 4 to 6
//! bob: folds
//! Uncalled bet (4) returned to alice
//! alice collected 4 from pot
//! *** SUMMARY ***
//! Total pot 4 | Rake 0
//! Seat 1: alice (button) (small blind) collected (4)
//! Seat 2: bob (big blind) folded before Flop";
//!
//! let record = HandRecord::parse(text).unwrap();
//! assert_eq!(record.sequence, "r6.00f///");
//! assert_eq!(record.winner, Position::Button);
//! ```
//!
//! # Reverse: ACPC to text
//!
//! A [`hand_history::HandRecord`] can be handed to the
//! [`hand_history::HistoryWriter`], which replays the sequence through a
//! fresh [`betting::TableState`] to reconstruct chip amounts.

/// Positions, streets and chip amounts shared by every other module.
pub mod core;

/// The betting oracle trait and the no-limit table that implements it.
pub mod betting;

/// Compact ACPC action notation: tokens, encoder and decoder.
pub mod acpc;

/// PokerStars style text hand histories: parsing and writing.
pub mod hand_history;

/// Error types for parsing and translation.
pub mod errors;

/// Helpers for working with many hands at once.
pub mod batch;

#[cfg(test)]
mod test_util;
