use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::acpc::{Action, DecodedHand, PositionedAction, decode};
use crate::betting::{BettingOracle, TableState};
use crate::core::{Position, Street, format_amount};
use crate::errors::TranslationError;

use super::record::HandRecord;

/// Configuration for the text a [`HistoryWriter`] produces.
#[derive(Debug, Clone)]
pub struct WriterConfig {
    pub site_name: String,
    pub hand_id: u64,
    pub table_name: String,
    /// Printed in front of every amount, e.g. `$`. Empty for chips.
    pub currency: String,
    /// Taken out of the pot before the winner collects. Minor units.
    pub rake: i64,
    pub start_time: DateTime<Utc>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            site_name: "PokerStars".to_string(),
            hand_id: 1,
            table_name: "hh_acpc".to_string(),
            currency: String::new(),
            rake: 0,
            start_time: Utc::now(),
        }
    }
}

/// Writes a [`HandRecord`] back out as a PokerStars style hand history.
///
/// The sequence is replayed on a fresh [`TableState`] to get the call
/// sizes, raise increments, all ins and the pot, none of which the
/// compact notation carries directly.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
///
/// use hh_acpc::core::Position;
/// use hh_acpc::hand_history::{HandRecord, HistoryWriter};
///
/// let record = HandRecord {
///     ante: 0,
///     big_blind: 200,
///     small_blind: None,
///     stacks: BTreeMap::from([(Position::Button, 10_000), (Position::BigBlind, 10_000)]),
///     sequence: "r6f".to_string(),
///     holecards: BTreeMap::new(),
///     boardcards: String::new(),
///     winner: Position::Button,
///     players: BTreeMap::new(),
///     hero: None,
/// };
/// let text = HistoryWriter::default().write(&record).unwrap();
/// assert!(text.contains("BTN: raises 4 to 6"));
/// assert!(text.contains("Seat 1: BTN (button) (small blind) won (8)"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HistoryWriter {
    config: WriterConfig,
}

impl HistoryWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut WriterConfig {
        &mut self.config
    }

    /// Render `record` as text.
    #[instrument(level = "debug", skip_all, fields(hand_id = self.config.hand_id))]
    pub fn write(&self, record: &HandRecord) -> Result<String, TranslationError> {
        let positions = record.validate()?;
        let board = record.board()?;
        let table = record.table()?;
        let mut replay = table.clone();
        let decoded = decode(&mut replay, &record.sequence)?;

        let mut out = HandText {
            config: &self.config,
            record,
            positions,
            lines: Vec::new(),
        };
        out.header(&table);
        out.streets(&decoded, &board);
        out.showdown(&decoded);
        out.summary(&decoded, &board, &table);

        debug!(
            lines = out.lines.len(),
            pot = decoded.pot,
            "Wrote hand history"
        );
        Ok(out.lines.join("\n"))
    }
}

/// The lines of one hand as they get built.
struct HandText<'a> {
    config: &'a WriterConfig,
    record: &'a HandRecord,
    positions: &'static [Position],
    lines: Vec<String>,
}

impl HandText<'_> {
    fn money(&self, amount: i64) -> String {
        format!("{}{}", self.config.currency, format_amount(amount))
    }

    fn name(&self, position: Position) -> String {
        self.record.player_name(position)
    }

    fn seat_number(&self, position: Position) -> usize {
        self.positions
            .iter()
            .position(|p| *p == position)
            .map_or(0, |idx| idx + 1)
    }

    fn header(&mut self, table: &TableState) {
        let time = self.config.start_time.format("%Y/%m/%d %H:%M:%S");
        self.lines.push(format!(
            "{} Hand #{}: Hold'em No Limit ({}/{}) - {time} UTC",
            self.config.site_name,
            self.config.hand_id,
            self.money(table.small_blind()),
            self.money(table.big_blind()),
        ));
        self.lines.push(format!(
            "Table '{}' {}-max Seat #1 is the button",
            self.config.table_name,
            self.positions.len()
        ));

        for &position in self.positions {
            self.lines.push(format!(
                "Seat {}: {} ({} in chips)",
                self.seat_number(position),
                self.name(position),
                self.money(table.starting_stack(position)),
            ));
        }

        if table.ante() > 0 {
            for &position in self.positions {
                let posted = table.starting_stack(position)
                    - table.remaining_stack(position)
                    - table.investment(position);
                let emptied = table.investment(position) == 0;
                self.post(table, position, "the ante", posted, emptied);
            }
        }

        for (idx, blind) in [
            (table.small_blind_idx(), "small blind"),
            (table.big_blind_idx(), "big blind"),
        ] {
            let position = self.positions[idx];
            self.post(table, position, blind, table.investment(position), true);
        }
    }

    /// A forced bet line. `last` marks the final post for the player, the
    /// one that can leave them all in. Nothing is printed for a zero post.
    fn post(
        &mut self,
        table: &TableState,
        position: Position,
        what: &str,
        amount: i64,
        last: bool,
    ) {
        if amount == 0 {
            return;
        }
        let all_in = if last && table.remaining_stack(position) == 0 {
            " and is all-in"
        } else {
            ""
        };
        self.lines.push(format!(
            "{}: posts {what} {}{all_in}",
            self.name(position),
            self.money(amount)
        ));
    }

    fn streets(&mut self, decoded: &DecodedHand, board: &[Vec<&str>; 4]) {
        let record = self.record;
        for street in Street::ALL {
            let actions = decoded.street(street);
            let cards = &board[street.index()];
            if street != Street::Preflop && actions.is_none() && cards.is_empty() {
                continue;
            }
            self.lines.push(street_marker(street, board));

            if street == Street::Preflop
                && let Some(hero) = record.hero
                && let Some(cards) = record.hole_cards(hero)
            {
                self.lines
                    .push(format!("Dealt to {} [{}]", self.name(hero), cards.join(" ")));
            }

            let Some(actions) = actions else {
                continue;
            };
            for action in &actions.actions {
                let line = self.action_line(action, actions.entry_level);
                self.lines.push(line);
            }
        }
    }

    fn action_line(&self, action: &PositionedAction, entry_level: i64) -> String {
        let verb = match action.action {
            Action::Fold => "folds".to_string(),
            Action::Check => "checks".to_string(),
            Action::Call { amount } => format!("calls {}", self.money(amount)),
            Action::Bet { amount } => format!("bets {}", self.money(amount)),
            Action::Raise { delta, to_level } => format!(
                "raises {} to {}",
                self.money(delta),
                self.money(to_level - entry_level)
            ),
        };
        let all_in = if action.all_in { " and is all-in" } else { "" };
        format!("{}: {verb}{all_in}", self.name(action.position))
    }

    fn collected(&self, decoded: &DecodedHand) -> i64 {
        decoded.pot - self.config.rake
    }

    fn reached_showdown(&self, decoded: &DecodedHand, position: Position) -> bool {
        !decoded.won_without_showdown(self.positions.len())
            && decoded.fold_street(position).is_none()
    }

    fn showdown(&mut self, decoded: &DecodedHand) {
        let winner = self.record.winner;
        if !decoded.won_without_showdown(self.positions.len()) {
            self.lines.push("*** SHOW DOWN ***".to_string());
            for &position in self.positions {
                if !self.reached_showdown(decoded, position) {
                    continue;
                }
                let line = match self.record.hole_cards(position) {
                    Some(cards) => format!("{}: shows [{}]", self.name(position), cards.join(" ")),
                    None => format!("{}: mucks hand", self.name(position)),
                };
                self.lines.push(line);
            }
        }
        self.lines.push(format!(
            "{} collected {} from pot",
            self.name(winner),
            self.money(self.collected(decoded))
        ));
    }

    fn summary(&mut self, decoded: &DecodedHand, board: &[Vec<&str>; 4], table: &TableState) {
        self.lines.push("*** SUMMARY ***".to_string());
        self.lines.push(format!(
            "Total pot {} | Rake {}",
            self.money(decoded.pot),
            self.money(self.config.rake)
        ));
        let all_cards = board.concat();
        if !all_cards.is_empty() {
            self.lines.push(format!("Board [{}]", all_cards.join(" ")));
        }

        let small_blind = self.positions[table.small_blind_idx()];
        for &position in self.positions {
            let mut tags: Vec<&str> = position.summary_tag().into_iter().collect();
            if position == small_blind && position != Position::SmallBlind {
                tags.push("small blind");
            }
            let tags: String = tags.iter().map(|t| format!(" ({t})")).collect();

            let cards = self.record.hole_cards(position);
            let showed = self.reached_showdown(decoded, position);
            let outcome = if position == self.record.winner {
                let won = format!("won ({})", self.money(self.collected(decoded)));
                match cards {
                    Some(cards) if showed => format!("showed [{}] and {won}", cards.join(" ")),
                    _ => won,
                }
            } else if let Some(street) = decoded.fold_street(position) {
                match street {
                    Street::Preflop => "folded before Flop".to_string(),
                    _ => format!("folded on the {street}"),
                }
            } else {
                match cards {
                    Some(cards) if showed => format!("showed [{}] and lost", cards.join(" ")),
                    _ => "mucked".to_string(),
                }
            };

            self.lines.push(format!(
                "Seat {}: {}{tags} {outcome}",
                self.seat_number(position),
                self.name(position)
            ));
        }
    }
}

/// `*** TURN *** [2c 7h 9s] [Td]` style markers, cards dealt on earlier
/// streets first and the new ones in their own brackets.
fn street_marker(street: Street, board: &[Vec<&str>; 4]) -> String {
    let marker = format!("*** {} ***", street.marker());
    let earlier = board[..street.index()].concat();
    let new = &board[street.index()];
    match (street, earlier.is_empty(), new.is_empty()) {
        (Street::Preflop, _, _) | (_, _, true) => marker,
        (_, true, false) => format!("{marker} [{}]", new.join(" ")),
        (_, false, false) => format!("{marker} [{}] [{}]", earlier.join(" "), new.join(" ")),
    }
}
