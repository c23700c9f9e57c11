//! The betting oracle is the authority on who acts next, how much each
//! position has put in, and whether an action is legal. The translator
//! only ever talks to it through the [`BettingOracle`] trait, and a fresh
//! instance is created for every hand so nothing leaks between hands.
//!
//! [`TableState`] is the no-limit hold'em implementation used by the
//! decoder and the history writer.
//!
//! ```
//! use hh_acpc::betting::{BettingOracle, NormalizedAction, TableStateBuilder};
//! use hh_acpc::core::{Position, Street};
//!
//! // Heads up, 100 chip stacks, 1/2 blinds (minor units).
//! let mut table = TableStateBuilder::new()
//!     .stacks(vec![10_000, 10_000])
//!     .big_blind(200)
//!     .build()
//!     .unwrap();
//!
//! // The button posts the small blind and acts first preflop.
//! assert_eq!(Some(Position::Button), table.acting_position());
//! table.apply(NormalizedAction::RaiseTo(600)).unwrap();
//! table.apply(NormalizedAction::Call).unwrap();
//!
//! assert_eq!(Street::Flop, table.street());
//! assert_eq!(1200, table.pot_total());
//! ```

mod errors;
mod table_state;

pub use errors::{IllegalActionError, TableStateBuilderError};
pub use table_state::{TableState, TableStateBuilder};

use crate::core::{Position, Street};

/// The only actions the compact notation can express, with amounts in
/// minor units.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalizedAction {
    Fold,
    /// Check or call, whichever matches the outstanding bet.
    Call,
    /// Raise (or bet) so the actor's hand total becomes this amount.
    RaiseTo(i64),
}

/// Per hand betting state the translator consults and drives.
///
/// All amounts are minor units. Investments are hand cumulative and
/// exclude antes.
pub trait BettingOracle {
    /// The position due to act, or `None` once the hand is finished.
    fn acting_position(&self) -> Option<Position>;

    /// How much `position` has committed so far this hand.
    fn investment(&self, position: Position) -> i64;

    /// The largest investment of any position.
    fn max_investment(&self) -> i64;

    /// The stack `position` started the hand with.
    fn starting_stack(&self, position: Position) -> i64;

    /// What `position` has left behind.
    fn remaining_stack(&self, position: Position) -> i64;

    /// The street currently being played. Once the hand is finished this
    /// is the last street that saw betting.
    fn street(&self) -> Street;

    /// Voluntary bets and raises made on the current street.
    fn aggressive_actions_this_street(&self) -> u8;

    fn is_finished(&self) -> bool;

    /// Everything in the middle, antes and blinds included.
    fn pot_total(&self) -> i64;

    /// Apply an action for the acting position, returning the chips it
    /// moved into the pot.
    fn apply(&mut self, action: NormalizedAction) -> Result<i64, IllegalActionError>;
}
