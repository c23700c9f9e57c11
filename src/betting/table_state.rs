use std::collections::BTreeMap;

use tracing::trace;

use crate::core::{PlayerBitSet, Position, Street, template};

use super::errors::{IllegalActionError, TableStateBuilderError};
use super::{BettingOracle, NormalizedAction};

/// Builder for constructing a `TableState` with validation.
///
/// Stacks are given in seating order starting with the button, the same
/// order as [`template`].
///
/// # Example
///
/// ```
/// use hh_acpc::betting::{BettingOracle, TableStateBuilder};
///
/// let table = TableStateBuilder::new()
///     .stacks(vec![10_000; 3])
///     .big_blind(200)
///     .build()
///     .unwrap();
///
/// // Small blind defaults to half the big blind.
/// assert_eq!(300, table.pot_total());
/// ```
#[derive(Default, Clone, Debug)]
pub struct TableStateBuilder {
    stacks: Option<Vec<i64>>,
    big_blind: Option<i64>,
    small_blind: Option<i64>,
    ante: Option<i64>,
}

impl TableStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the stacks in seating order. Required.
    pub fn stacks(mut self, stacks: Vec<i64>) -> Self {
        self.stacks = Some(stacks);
        self
    }

    /// Set the stacks from a position keyed map. Positions are sorted
    /// into seating order.
    pub fn position_stacks(mut self, stacks: &BTreeMap<Position, i64>) -> Self {
        self.stacks = Some(stacks.values().copied().collect());
        self
    }

    /// Set the big blind. Required.
    pub fn big_blind(mut self, bb: i64) -> Self {
        self.big_blind = Some(bb);
        self
    }

    /// Set the small blind. Defaults to `big_blind / 2`.
    pub fn small_blind(mut self, sb: i64) -> Self {
        self.small_blind = Some(sb);
        self
    }

    /// Set the ante. Defaults to `0`.
    pub fn ante(mut self, ante: i64) -> Self {
        self.ante = Some(ante);
        self
    }

    /// Build the `TableState` and post the forced bets.
    pub fn build(self) -> Result<TableState, TableStateBuilderError> {
        let stacks = self.stacks.ok_or(TableStateBuilderError::MissingStacks)?;
        let big_blind = self
            .big_blind
            .ok_or(TableStateBuilderError::MissingBigBlind)?;

        let positions = template(stacks.len())
            .ok_or(TableStateBuilderError::UnsupportedTableSize(stacks.len()))?;

        if big_blind <= 0 {
            return Err(TableStateBuilderError::InvalidBigBlind(big_blind));
        }

        let small_blind = self.small_blind.unwrap_or(big_blind / 2);
        if small_blind < 0 || small_blind > big_blind {
            return Err(TableStateBuilderError::InvalidSmallBlind(small_blind));
        }

        let ante = self.ante.unwrap_or(0);
        if ante < 0 {
            return Err(TableStateBuilderError::InvalidAnte(ante));
        }

        for (index, &value) in stacks.iter().enumerate() {
            if value <= 0 {
                return Err(TableStateBuilderError::InvalidStack { index, value });
            }
        }

        let num_players = stacks.len();
        let mut table = TableState {
            positions,
            num_players,
            starting_stacks: stacks.clone(),
            stacks,
            player_bet: vec![0; num_players],
            player_active: PlayerBitSet::new(num_players),
            player_all_in: PlayerBitSet::default(),
            big_blind,
            small_blind,
            ante,
            total_pot: 0,
            street: Street::Preflop,
            finished: false,
            round_data: RoundData::new(PlayerBitSet::new(num_players), big_blind, 0, 0),
        };
        table.post_forced_bets();
        Ok(table)
    }
}

/// Betting state that only lives for one street.
#[derive(Clone, PartialEq, Eq, Debug)]
struct RoundData {
    // Players that still owe an action this street.
    needs_action: PlayerBitSet,
    // The minimum raise size.
    min_raise: i64,
    // The hand cumulative investment to match.
    bet: i64,
    // What `bet` was when the street started.
    entry_level: i64,
    // Non-forced bets and raises.
    aggressive_count: u8,
    // Players who acted since the last full bet or raise.
    acted: PlayerBitSet,
    // Players an all in for less than a full raise didn't reopen the
    // betting for. They can only call or fold.
    raise_closed: PlayerBitSet,
    to_act_idx: usize,
}

impl RoundData {
    fn new(needs_action: PlayerBitSet, min_raise: i64, bet: i64, to_act_idx: usize) -> Self {
        RoundData {
            needs_action,
            min_raise,
            bet,
            entry_level: bet,
            aggressive_count: 0,
            acted: PlayerBitSet::default(),
            raise_closed: PlayerBitSet::default(),
            to_act_idx,
        }
    }

    /// Move `to_act_idx` to the first seat at or after `from` that still
    /// needs to act.
    fn seek_from(&mut self, from: usize, num_players: usize) {
        for offset in 0..num_players {
            let idx = (from + offset) % num_players;
            if self.needs_action.get(idx) {
                self.to_act_idx = idx;
                return;
            }
        }
    }
}

/// No-limit hold'em betting for a single hand, the oracle the decoder and
/// writer replay sequences through.
///
/// Seat indices follow the position template so index 0 is always the
/// button. Heads up the button posts the small blind and acts first
/// preflop, last after that.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TableState {
    positions: &'static [Position],
    num_players: usize,
    starting_stacks: Vec<i64>,
    /// How much is left in each player's stack.
    stacks: Vec<i64>,
    /// Hand cumulative investment, antes excluded.
    player_bet: Vec<i64>,
    /// Players still able to bet: not folded and not all in.
    player_active: PlayerBitSet,
    player_all_in: PlayerBitSet,
    big_blind: i64,
    small_blind: i64,
    ante: i64,
    total_pot: i64,
    street: Street,
    finished: bool,
    round_data: RoundData,
}

impl TableState {
    pub fn num_players(&self) -> usize {
        self.num_players
    }

    pub fn big_blind(&self) -> i64 {
        self.big_blind
    }

    pub fn small_blind(&self) -> i64 {
        self.small_blind
    }

    pub fn ante(&self) -> i64 {
        self.ante
    }

    /// The seat posting the small blind. Heads up that's the button.
    pub fn small_blind_idx(&self) -> usize {
        if self.num_players == 2 { 0 } else { 1 }
    }

    pub fn big_blind_idx(&self) -> usize {
        if self.num_players == 2 { 1 } else { 2 }
    }

    /// Players that haven't folded.
    pub fn num_players_in_hand(&self) -> usize {
        (self.player_active | self.player_all_in).count()
    }

    pub fn is_all_in(&self, position: Position) -> bool {
        self.idx(position)
            .is_some_and(|idx| self.player_all_in.get(idx))
    }

    pub fn has_folded(&self, position: Position) -> bool {
        self.idx(position).is_some_and(|idx| {
            !self.player_active.get(idx) && !self.player_all_in.get(idx)
        })
    }

    fn idx(&self, position: Position) -> Option<usize> {
        self.positions.iter().position(|p| *p == position)
    }

    fn post_forced_bets(&mut self) {
        if self.ante > 0 {
            for idx in 0..self.num_players {
                let posted = self.stacks[idx].min(self.ante);
                self.stacks[idx] -= posted;
                self.total_pot += posted;
                self.check_all_in(idx);
            }
        }

        let sb_idx = self.small_blind_idx();
        let bb_idx = self.big_blind_idx();
        self.post_blind(sb_idx, self.small_blind);
        self.post_blind(bb_idx, self.big_blind);

        // A big blind that's all in for less still leaves the full blind
        // to call.
        let posted = self.player_bet.iter().copied().max().unwrap_or(0);
        let bet = posted.max(self.big_blind);
        self.round_data = RoundData::new(self.player_active, self.big_blind, bet, 0);
        self.round_data.entry_level = 0;
        self.round_data.seek_from((bb_idx + 1) % self.num_players, self.num_players);

        // Blinds can put everyone all in before anyone acts.
        if self.round_data.needs_action.count() <= 1 && self.player_bet_is_matched() {
            self.finished = true;
        }
    }

    fn post_blind(&mut self, idx: usize, amount: i64) {
        let posted = self.stacks[idx].min(amount);
        self.commit(idx, posted);
        self.check_all_in(idx);
    }

    fn player_bet_is_matched(&self) -> bool {
        self.player_active
            .ones()
            .all(|idx| self.player_bet[idx] >= self.round_data.bet)
    }

    fn commit(&mut self, idx: usize, extra: i64) {
        self.stacks[idx] -= extra;
        self.player_bet[idx] += extra;
        self.total_pot += extra;
    }

    fn check_all_in(&mut self, idx: usize) {
        if self.stacks[idx] == 0 && self.player_active.get(idx) {
            self.player_active.disable(idx);
            self.player_all_in.enable(idx);
            self.round_data.needs_action.disable(idx);
        }
    }

    fn fold(&mut self, idx: usize) -> i64 {
        self.player_active.disable(idx);
        self.round_data.needs_action.disable(idx);
        0
    }

    fn call(&mut self, idx: usize) -> i64 {
        let owed = (self.round_data.bet - self.player_bet[idx]).max(0);
        let extra = owed.min(self.stacks[idx]);
        self.commit(idx, extra);
        self.round_data.needs_action.disable(idx);
        self.check_all_in(idx);
        extra
    }

    /// Whether `position` may bet or raise right now.
    pub fn can_raise(&self, position: Position) -> bool {
        self.idx(position).is_some_and(|idx| {
            self.player_active.get(idx)
                && !self.round_data.raise_closed.get(idx)
                && self.player_bet[idx] + self.stacks[idx] > self.round_data.bet
        })
    }

    fn raise_to(&mut self, idx: usize, level: i64) -> Result<i64, IllegalActionError> {
        if self.round_data.raise_closed.get(idx) {
            return Err(IllegalActionError::BettingNotReopened);
        }
        let current = self.round_data.bet;
        let most = self.player_bet[idx] + self.stacks[idx];
        if most <= current {
            return Err(IllegalActionError::NoChipsToRaise);
        }

        // Overbets are capped at the stack, which is an all in.
        let capped = level.min(most);
        if capped <= current {
            return Err(IllegalActionError::BetSizeDoesntRaise {
                attempted: level,
                current,
            });
        }

        let is_all_in = capped == most;
        let minimum = current + self.round_data.min_raise;
        if capped < minimum && !is_all_in {
            return Err(IllegalActionError::RaiseSizeTooSmall {
                attempted: level,
                minimum,
            });
        }

        let extra = capped - self.player_bet[idx];
        self.commit(idx, extra);
        // An opening bet always reopens, there was nothing to raise yet.
        let reopens = capped >= minimum || current == self.round_data.entry_level;
        self.round_data.min_raise = self.round_data.min_raise.max(capped - current);
        self.round_data.bet = capped;
        self.round_data.aggressive_count = self.round_data.aggressive_count.saturating_add(1);

        if reopens {
            self.round_data.acted = PlayerBitSet::default();
            self.round_data.raise_closed = PlayerBitSet::default();
        } else {
            self.round_data.raise_closed = self.round_data.acted & self.player_active;
        }

        // The bet went up so everyone else has to act again.
        self.round_data.needs_action = self.player_active;
        self.round_data.needs_action.disable(idx);
        self.check_all_in(idx);
        Ok(extra)
    }

    /// Move on to the next actor, the next street, or finish the hand.
    fn settle(&mut self, last_idx: usize) {
        if self.num_players_in_hand() <= 1 {
            self.finished = true;
            return;
        }

        if !self.round_data.needs_action.empty() {
            self.round_data.seek_from(last_idx + 1, self.num_players);
            return;
        }

        // Street is over. With one or no players able to bet the rest of
        // the board just runs out.
        match self.street.next() {
            Some(next) if self.player_active.count() > 1 => {
                trace!(from = %self.street, to = %next, "Advancing street");
                self.street = next;
                let bet = self.round_data.bet;
                self.round_data = RoundData::new(self.player_active, self.big_blind, bet, 0);
                self.round_data.seek_from(1 % self.num_players, self.num_players);
            }
            _ => self.finished = true,
        }
    }
}

impl BettingOracle for TableState {
    fn acting_position(&self) -> Option<Position> {
        if self.finished {
            None
        } else {
            self.positions.get(self.round_data.to_act_idx).copied()
        }
    }

    fn investment(&self, position: Position) -> i64 {
        self.idx(position)
            .map(|idx| self.player_bet[idx])
            .unwrap_or(0)
    }

    fn max_investment(&self) -> i64 {
        self.round_data.bet
    }

    fn starting_stack(&self, position: Position) -> i64 {
        self.idx(position)
            .map(|idx| self.starting_stacks[idx])
            .unwrap_or(0)
    }

    fn remaining_stack(&self, position: Position) -> i64 {
        self.idx(position).map(|idx| self.stacks[idx]).unwrap_or(0)
    }

    fn street(&self) -> Street {
        self.street
    }

    fn aggressive_actions_this_street(&self) -> u8 {
        self.round_data.aggressive_count
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn pot_total(&self) -> i64 {
        self.total_pot
    }

    fn apply(&mut self, action: NormalizedAction) -> Result<i64, IllegalActionError> {
        if self.finished {
            return Err(IllegalActionError::HandComplete);
        }

        let idx = self.round_data.to_act_idx;
        let moved = match action {
            NormalizedAction::Fold => self.fold(idx),
            NormalizedAction::Call => self.call(idx),
            NormalizedAction::RaiseTo(level) => self.raise_to(idx, level)?,
        };
        self.round_data.acted.enable(idx);
        trace!(position = %self.positions[idx], ?action, moved, "Applied action");

        self.settle(idx);
        Ok(moved)
    }
}
