use tracing::{debug, instrument, warn};

use crate::betting::{BettingOracle, NormalizedAction};
use crate::core::{Position, Street};
use crate::errors::TranslationError;

use super::encoder::WagerEvent;
use super::token::{CompactToken, parse_sequence};

/// A fully typed wagering action. Amounts are minor units.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fold,
    Check,
    /// Chips put in to match the bet.
    Call { amount: i64 },
    /// Opening bet on a street, street level.
    Bet { amount: i64 },
    /// `delta` is the increase over the bet faced, `to_level` the hand
    /// cumulative total the raiser reaches.
    Raise { delta: i64, to_level: i64 },
}

/// An action with who made it and what it cost.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionedAction {
    pub street: Street,
    pub position: Position,
    pub action: Action,
    /// Chips moved into the pot by this action.
    pub chips: i64,
    /// The action left the player with nothing behind.
    pub all_in: bool,
}

/// Everything that happened on one street.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetActions {
    pub street: Street,
    /// Hand cumulative level street amounts are measured from. Zero
    /// preflop.
    pub entry_level: i64,
    pub actions: Vec<PositionedAction>,
}

impl StreetActions {
    /// The actions as the text format would print them, street level.
    pub fn wager_events(&self) -> Vec<WagerEvent> {
        self.actions
            .iter()
            .map(|a| match a.action {
                Action::Fold => WagerEvent::Fold,
                Action::Check => WagerEvent::Check,
                Action::Call { .. } => WagerEvent::Call,
                Action::Bet { amount } => WagerEvent::Bet(amount),
                Action::Raise { to_level, .. } => WagerEvent::RaiseTo(to_level - self.entry_level),
            })
            .collect()
    }
}

/// The result of replaying a compact sequence.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHand {
    /// One entry per street that saw at least one action, in order.
    pub streets: Vec<StreetActions>,
    /// The pot once every action was applied.
    pub pot: i64,
    /// Whether the oracle considered the hand over.
    pub finished: bool,
}

impl DecodedHand {
    pub fn street(&self, street: Street) -> Option<&StreetActions> {
        self.streets.iter().find(|s| s.street == street)
    }

    pub fn actions(&self) -> impl Iterator<Item = &PositionedAction> {
        self.streets.iter().flat_map(|s| s.actions.iter())
    }

    /// The street `position` folded on, if it did.
    pub fn fold_street(&self, position: Position) -> Option<Street> {
        self.actions()
            .find(|a| a.position == position && a.action == Action::Fold)
            .map(|a| a.street)
    }

    /// True when the hand ended with a single player left.
    pub fn won_without_showdown(&self, num_players: usize) -> bool {
        let folds = self
            .actions()
            .filter(|a| a.action == Action::Fold)
            .count();
        folds + 1 >= num_players
    }
}

/// Replay `sequence` through `oracle` and recover the typed actions.
///
/// Street separators are only checked for syntax; which street an action
/// belongs to comes from the oracle. Decoding stops at the end of the
/// tokens or when the oracle says the hand is finished.
#[instrument(level = "trace", skip(oracle))]
pub fn decode<O: BettingOracle>(
    oracle: &mut O,
    sequence: &str,
) -> Result<DecodedHand, TranslationError> {
    let tokens: Vec<CompactToken> = parse_sequence(sequence)?.into_iter().flatten().collect();
    let mut streets: Vec<StreetActions> = Vec::new();
    let mut open: Option<StreetActions> = None;

    for (i, token) in tokens.iter().enumerate() {
        if oracle.is_finished() {
            warn!(
                ignored = tokens.len() - i,
                "Hand finished before the end of the sequence"
            );
            break;
        }

        let street = oracle.street();
        let position = oracle.acting_position();
        let illegal = |source| TranslationError::IllegalAction {
            street,
            position,
            token: token.to_string(),
            source,
        };
        let Some(position) = position else {
            return Err(illegal(crate::betting::IllegalActionError::HandComplete));
        };

        if open.as_ref().is_some_and(|s| s.street != street) {
            streets.extend(open.take());
        }
        let current = open.get_or_insert_with(|| StreetActions {
            street,
            entry_level: match street {
                Street::Preflop => 0,
                _ => oracle.max_investment(),
            },
            actions: Vec::new(),
        });

        let investment = oracle.investment(position);
        let max_before = oracle.max_investment();
        let aggressive = oracle.aggressive_actions_this_street();

        let normalized = match token {
            CompactToken::Fold => NormalizedAction::Fold,
            CompactToken::Call => NormalizedAction::Call,
            CompactToken::Raise(level) => NormalizedAction::RaiseTo(*level),
        };
        let chips = oracle.apply(normalized).map_err(illegal)?;

        // The oracle's accounting wins over the token, e.g. capped overbets.
        let level = oracle.investment(position);
        let action = match token {
            CompactToken::Fold => Action::Fold,
            CompactToken::Call if investment < max_before => Action::Call { amount: chips },
            CompactToken::Call => Action::Check,
            CompactToken::Raise(_) if street != Street::Preflop && aggressive == 0 => Action::Bet {
                amount: level - current.entry_level,
            },
            CompactToken::Raise(_) => Action::Raise {
                delta: level - max_before,
                to_level: level,
            },
        };

        let all_in = !matches!(action, Action::Fold | Action::Check)
            && oracle.remaining_stack(position) == 0;

        current.actions.push(PositionedAction {
            street,
            position,
            action,
            chips,
            all_in,
        });
    }
    streets.extend(open);

    let decoded = DecodedHand {
        streets,
        pot: oracle.pot_total(),
        finished: oracle.is_finished(),
    };
    debug!(
        actions = decoded.actions().count(),
        pot = decoded.pot,
        finished = decoded.finished,
        "Decoded sequence"
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betting::{IllegalActionError, TableState, TableStateBuilder};

    fn table(stacks: Vec<i64>, big_blind: i64) -> TableState {
        TableStateBuilder::new()
            .stacks(stacks)
            .big_blind(big_blind)
            .build()
            .unwrap()
    }

    #[test_log::test]
    fn test_heads_up_single_raise() {
        let mut oracle = table(vec![10_000, 10_000], 200);
        let decoded = decode(&mut oracle, "r6c/cc/cc/cc").unwrap();

        let preflop = decoded.street(Street::Preflop).unwrap();
        assert_eq!(
            Action::Raise {
                delta: 400,
                to_level: 600
            },
            preflop.actions[0].action
        );
        assert_eq!(Position::Button, preflop.actions[0].position);
        assert_eq!(500, preflop.actions[0].chips);
        assert_eq!(Action::Call { amount: 400 }, preflop.actions[1].action);
        assert_eq!(Position::BigBlind, preflop.actions[1].position);

        assert_eq!(4, decoded.streets.len());
        for street in &decoded.streets[1..] {
            assert!(street.actions.iter().all(|a| a.action == Action::Check));
        }
        assert_eq!(1_200, decoded.pot);
        assert!(decoded.finished);
    }

    #[test]
    fn test_bet_then_raise_on_flop() {
        let mut oracle = table(vec![10_000, 10_000], 200);
        let decoded = decode(&mut oracle, "r6c/r10r20c").unwrap();

        let flop = decoded.street(Street::Flop).unwrap();
        assert_eq!(600, flop.entry_level);
        assert_eq!(Position::BigBlind, flop.actions[0].position);
        assert_eq!(Action::Bet { amount: 400 }, flop.actions[0].action);
        assert_eq!(
            Action::Raise {
                delta: 1_000,
                to_level: 2_000
            },
            flop.actions[1].action
        );
        assert_eq!(Action::Call { amount: 1_000 }, flop.actions[2].action);
        assert_eq!(
            vec![
                WagerEvent::Bet(400),
                WagerEvent::RaiseTo(1_400),
                WagerEvent::Call
            ],
            flop.wager_events()
        );
    }

    #[test]
    fn test_fold_preflop_stops() {
        let mut oracle = table(vec![10_000, 10_000], 200);
        let decoded = decode(&mut oracle, "f//").unwrap();
        assert_eq!(1, decoded.streets.len());
        assert_eq!(1, decoded.actions().count());
        assert_eq!(Some(Street::Preflop), decoded.fold_street(Position::Button));
        assert!(decoded.won_without_showdown(2));
        assert!(decoded.finished);
    }

    #[test]
    fn test_trailing_tokens_after_finish_are_ignored() {
        let mut oracle = table(vec![10_000, 10_000], 200);
        let decoded = decode(&mut oracle, "fc/cc").unwrap();
        assert_eq!(1, decoded.actions().count());
    }

    #[test]
    fn test_illegal_raise_aborts() {
        let mut oracle = table(vec![10_000, 10_000], 200);
        let err = decode(&mut oracle, "r3c").unwrap_err();
        assert_eq!(
            TranslationError::IllegalAction {
                street: Street::Preflop,
                position: Some(Position::Button),
                token: "r3.00".to_string(),
                source: IllegalActionError::RaiseSizeTooSmall {
                    attempted: 300,
                    minimum: 400
                },
            },
            err
        );
    }

    #[test]
    fn test_all_in_detected_and_clamped() {
        let mut oracle = table(vec![10_000, 5_000], 200);
        let decoded = decode(&mut oracle, "r10r100c").unwrap();
        let preflop = decoded.street(Street::Preflop).unwrap();
        assert_eq!(
            Action::Raise {
                delta: 4_000,
                to_level: 5_000
            },
            preflop.actions[1].action
        );
        assert!(preflop.actions[1].all_in);
        assert_eq!(Action::Call { amount: 4_000 }, preflop.actions[2].action);
        assert!(!preflop.actions[2].all_in);
        assert!(decoded.finished);
        assert!(!decoded.won_without_showdown(2));
    }

    #[test]
    fn test_short_call_amount_comes_from_oracle() {
        let mut oracle = table(vec![10_000, 500], 200);
        let decoded = decode(&mut oracle, "r20c").unwrap();
        let call = decoded.street(Street::Preflop).unwrap().actions[1];
        assert_eq!(Action::Call { amount: 300 }, call.action);
        assert!(call.all_in);
    }

    #[test]
    fn test_short_big_blind_round_trips() {
        use crate::acpc::SequenceEncoder;

        let streets = [
            vec![WagerEvent::Call, WagerEvent::Call],
            vec![WagerEvent::Bet(400), WagerEvent::Call],
            vec![WagerEvent::Check, WagerEvent::Check],
            vec![WagerEvent::Check, WagerEvent::Check],
        ];
        let sequence = SequenceEncoder::new(200).encode(&streets).unwrap();
        assert_eq!("cc/r6.00c/cc/cc", sequence);

        let mut oracle = table(vec![10_000, 10_000, 150], 200);
        let decoded = decode(&mut oracle, &sequence).unwrap();
        for street in &decoded.streets {
            assert_eq!(streets[street.street.index()], street.wager_events());
        }
        assert_eq!(Action::Call { amount: 200 }, decoded.streets[0].actions[0].action);
        assert_eq!(Action::Bet { amount: 400 }, decoded.streets[1].actions[0].action);
        assert_eq!(1_350, decoded.pot);
    }

    #[test]
    fn test_reraise_after_short_all_in_is_illegal() {
        let mut oracle = table(vec![10_000, 900, 10_000], 200);
        let err = decode(&mut oracle, "r6r9cr30").unwrap_err();
        assert!(matches!(
            err,
            TranslationError::IllegalAction {
                position: Some(Position::Button),
                source: IllegalActionError::BettingNotReopened,
                ..
            }
        ));
    }

    #[test]
    fn test_three_handed_limp_and_checks() {
        let mut oracle = table(vec![10_000; 3], 200);
        let decoded = decode(&mut oracle, "ccc/ccc/ccc/ccc").unwrap();
        let preflop = decoded.street(Street::Preflop).unwrap();
        assert_eq!(Action::Call { amount: 200 }, preflop.actions[0].action);
        assert_eq!(Action::Call { amount: 100 }, preflop.actions[1].action);
        assert_eq!(Action::Check, preflop.actions[2].action);
        for street in [Street::Flop, Street::Turn, Street::River] {
            let s = decoded.street(street).unwrap();
            assert_eq!(3, s.actions.len());
            assert!(s.actions.iter().all(|a| a.action == Action::Check));
        }
        assert_eq!(600, decoded.pot);
    }

    #[test_log::test]
    fn test_random_hands_round_trip() {
        use rand::{SeedableRng, rngs::StdRng};

        use crate::acpc::SequenceEncoder;
        use crate::test_util::{assert_levels_monotone, assert_pot_conserved, random_hand};

        for num_players in 2..=10 {
            let mut rng = StdRng::seed_from_u64(420 + num_players as u64);
            for _ in 0..200 {
                let hand = random_hand(&mut rng, num_players);
                let sequence = SequenceEncoder::new(hand.big_blind)
                    .encode(&hand.events)
                    .unwrap();

                let mut oracle = hand.table();
                let decoded = decode(&mut oracle, &sequence).unwrap();

                let actions: Vec<PositionedAction> = decoded.actions().copied().collect();
                assert_eq!(hand.actions, actions, "{sequence}");
                assert_eq!(hand.pot, decoded.pot);
                assert!(decoded.finished);
                assert_pot_conserved(&decoded, hand.forced);
                assert_levels_monotone(&decoded);
                for street in &decoded.streets {
                    assert_eq!(hand.events[street.street.index()], street.wager_events());
                }
            }
        }
    }

    #[test]
    fn test_malformed_sequence() {
        let mut oracle = table(vec![10_000, 10_000], 200);
        assert_eq!(
            Err(TranslationError::MalformedToken("k".to_string())),
            decode(&mut oracle, "ck")
        );
    }
}
