use std::collections::BTreeMap;

use rand::Rng;

use crate::acpc::{Action, DecodedHand, PositionedAction, SequenceEncoder, WagerEvent};
use crate::betting::{BettingOracle, NormalizedAction, TableState, TableStateBuilder};
use crate::core::{Position, Street, template};
use crate::hand_history::HandRecord;

/// A hand played out with random legal actions, along with what a
/// decoder should recover from it.
#[derive(Debug, Clone)]
pub struct GeneratedHand {
    pub stacks: Vec<i64>,
    pub big_blind: i64,
    pub ante: i64,
    /// Street level events, the way the text format would print them.
    pub events: [Vec<WagerEvent>; 4],
    pub actions: Vec<PositionedAction>,
    /// Antes and blinds.
    pub forced: i64,
    pub pot: i64,
}

impl GeneratedHand {
    pub fn table(&self) -> TableState {
        TableStateBuilder::new()
            .stacks(self.stacks.clone())
            .big_blind(self.big_blind)
            .ante(self.ante)
            .build()
            .unwrap()
    }

    pub fn sequence(&self) -> String {
        SequenceEncoder::new(self.big_blind)
            .encode(&self.events)
            .unwrap()
    }

    /// A record for the hand with named players, a full board and the
    /// button as hero.
    pub fn record(&self) -> HandRecord {
        let positions = template(self.stacks.len()).unwrap();
        let folded: Vec<Position> = self
            .actions
            .iter()
            .filter(|a| a.action == Action::Fold)
            .map(|a| a.position)
            .collect();
        let winner = positions
            .iter()
            .copied()
            .find(|p| !folded.contains(p))
            .unwrap();

        let mut holecards: BTreeMap<Position, Option<String>> =
            positions.iter().map(|&p| (p, None)).collect();
        holecards.insert(Position::Button, Some("AcKd".to_string()));

        HandRecord {
            ante: self.ante,
            big_blind: self.big_blind,
            small_blind: None,
            stacks: positions.iter().copied().zip(self.stacks.clone()).collect(),
            sequence: self.sequence(),
            holecards,
            boardcards: "2c7h9s/Td/3s".to_string(),
            winner,
            players: positions
                .iter()
                .enumerate()
                .map(|(idx, &p)| (p, format!("player{idx}")))
                .collect(),
            hero: Some(Position::Button),
        }
    }
}

/// Play a hand of `num_players` to the end picking actions at random.
pub fn random_hand<R: Rng>(rng: &mut R, num_players: usize) -> GeneratedHand {
    let big_blind = 100 * rng.random_range(1..=5);
    let ante = if rng.random_bool(0.3) { big_blind / 4 } else { 0 };
    // Some stacks can't cover the blind or even the ante.
    let stacks: Vec<i64> = (0..num_players)
        .map(|_| {
            if rng.random_bool(0.15) {
                rng.random_range(1..2 * big_blind)
            } else {
                big_blind * rng.random_range(10..=150) + rng.random_range(0..100)
            }
        })
        .collect();

    let mut hand = GeneratedHand {
        stacks,
        big_blind,
        ante,
        events: Default::default(),
        actions: Vec::new(),
        forced: 0,
        pot: 0,
    };
    let mut table = hand.table();
    hand.forced = table.pot_total();

    let mut street = Street::Preflop;
    let mut entry_level = 0;
    let mut min_raise = big_blind;

    while let Some(position) = table.acting_position() {
        if table.street() != street {
            street = table.street();
            entry_level = table.max_investment();
            min_raise = big_blind;
        }

        let investment = table.investment(position);
        let current = table.max_investment();
        let most = investment + table.remaining_stack(position);
        let facing = current > investment;
        let roll: f64 = rng.random();

        let (normalized, event) = if facing && roll < 0.2 {
            (NormalizedAction::Fold, WagerEvent::Fold)
        } else if table.can_raise(position) && roll > 0.75 {
            let minimum = current + min_raise;
            let target = if minimum >= most || rng.random_bool(0.1) {
                most
            } else {
                rng.random_range(minimum..=most)
            };
            min_raise = min_raise.max(target - current);
            let event = if street != Street::Preflop && table.aggressive_actions_this_street() == 0
            {
                WagerEvent::Bet(target - entry_level)
            } else {
                WagerEvent::RaiseTo(target - entry_level)
            };
            (NormalizedAction::RaiseTo(target), event)
        } else if facing {
            (NormalizedAction::Call, WagerEvent::Call)
        } else {
            (NormalizedAction::Call, WagerEvent::Check)
        };

        let chips = table.apply(normalized).unwrap();
        let level = table.investment(position);
        let action = match event {
            WagerEvent::Fold => Action::Fold,
            WagerEvent::Check => Action::Check,
            WagerEvent::Call => Action::Call { amount: chips },
            WagerEvent::Bet(_) => Action::Bet {
                amount: level - entry_level,
            },
            WagerEvent::RaiseTo(_) => Action::Raise {
                delta: level - current,
                to_level: level,
            },
        };
        let all_in = !matches!(action, Action::Fold | Action::Check)
            && table.remaining_stack(position) == 0;

        hand.events[street.index()].push(event);
        hand.actions.push(PositionedAction {
            street,
            position,
            action,
            chips,
            all_in,
        });
    }

    assert!(table.is_finished());
    hand.pot = table.pot_total();
    hand
}

/// Forced bets plus every chip the actions moved is the whole pot.
pub fn assert_pot_conserved(decoded: &DecodedHand, forced: i64) {
    let moved: i64 = decoded.actions().map(|a| a.chips).sum();
    assert_eq!(forced + moved, decoded.pot);
}

/// Raise levels only go up within a street.
pub fn assert_levels_monotone(decoded: &DecodedHand) {
    for street in &decoded.streets {
        let levels: Vec<i64> = street
            .actions
            .iter()
            .filter_map(|a| match a.action {
                Action::Raise { to_level, .. } => Some(to_level),
                Action::Bet { amount } => Some(street.entry_level + amount),
                _ => None,
            })
            .collect();
        assert!(
            levels.windows(2).all(|w| w[0] < w[1]),
            "{:?} levels {levels:?}",
            street.street
        );
    }
}
