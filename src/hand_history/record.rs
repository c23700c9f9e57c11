use std::collections::{BTreeMap, BTreeSet};

use crate::acpc::{DecodedHand, decode};
use crate::betting::{TableState, TableStateBuilder};
use crate::core::{Position, Street, template};
use crate::errors::TranslationError;

/// One hand in position keyed form, the pivot between the two notations.
///
/// Amounts are minor units. Hole cards are concatenated two character
/// cards (`"AcKd"`). The board joins the flop, turn and river with `/`
/// (`"2c7h9s/Td/3s"`), leaving out streets that were never dealt.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandRecord {
    #[cfg_attr(feature = "serde", serde(default))]
    pub ante: i64,
    pub big_blind: i64,
    /// `None` means half the big blind.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub small_blind: Option<i64>,
    /// Starting stacks. The key set decides the table size.
    pub stacks: BTreeMap<Position, i64>,
    pub sequence: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub holecards: BTreeMap<Position, Option<String>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boardcards: String,
    pub winner: Position,
    /// Display names. Positions without one are written by label.
    #[cfg_attr(feature = "serde", serde(default))]
    pub players: BTreeMap<Position, String>,
    /// The player the history was recorded for, if any.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub hero: Option<Position>,
}

impl HandRecord {
    pub fn num_players(&self) -> usize {
        self.stacks.len()
    }

    pub fn small_blind_amount(&self) -> i64 {
        self.small_blind.unwrap_or(self.big_blind / 2)
    }

    /// The name to print for `position`.
    pub fn player_name(&self, position: Position) -> String {
        self.players
            .get(&position)
            .cloned()
            .unwrap_or_else(|| position.label().to_string())
    }

    /// Known hole cards for `position`, split into cards.
    pub fn hole_cards(&self, position: Position) -> Option<Vec<&str>> {
        self.holecards
            .get(&position)
            .and_then(Option::as_deref)
            .and_then(split_cards)
    }

    /// Check that every position key belongs to the template for the
    /// table size, returning that template.
    pub fn validate(&self) -> Result<&'static [Position], TranslationError> {
        let positions = template(self.num_players()).ok_or_else(|| {
            TranslationError::InconsistentPositionSet(format!(
                "{} stacks is not a supported table size",
                self.num_players()
            ))
        })?;
        let allowed: BTreeSet<Position> = positions.iter().copied().collect();

        let mut keyed = self
            .stacks
            .keys()
            .map(|p| ("stacks", *p))
            .chain(self.players.keys().map(|p| ("players", *p)))
            .chain(self.holecards.keys().map(|p| ("holecards", *p)))
            .chain(std::iter::once(("winner", self.winner)))
            .chain(self.hero.map(|p| ("hero", p)));

        match keyed.find(|(_, p)| !allowed.contains(p)) {
            Some((what, p)) => Err(TranslationError::InconsistentPositionSet(format!(
                "{what} has {p} which a {}-handed table doesn't have",
                positions.len()
            ))),
            None => Ok(positions),
        }
    }

    /// A fresh table seated from this record, forced bets posted.
    pub fn table(&self) -> Result<TableState, TranslationError> {
        self.validate()?;
        let mut builder = TableStateBuilder::new()
            .position_stacks(&self.stacks)
            .big_blind(self.big_blind)
            .ante(self.ante);
        if let Some(small_blind) = self.small_blind {
            builder = builder.small_blind(small_blind);
        }
        Ok(builder.build()?)
    }

    /// Replay the sequence on a fresh table.
    pub fn replay(&self) -> Result<DecodedHand, TranslationError> {
        let mut table = self.table()?;
        decode(&mut table, &self.sequence)
    }

    /// The board cards dealt on each street, preflop always empty.
    pub fn board(&self) -> Result<[Vec<&str>; 4], TranslationError> {
        let malformed = || TranslationError::MalformedBoard(self.boardcards.clone());
        let mut board: [Vec<&str>; 4] = Default::default();
        if self.boardcards.is_empty() {
            return Ok(board);
        }

        let segments: Vec<&str> = self.boardcards.split('/').collect();
        if segments.len() > 3 {
            return Err(malformed());
        }
        for (street, segment) in Street::ALL[1..].iter().zip(segments) {
            let cards = split_cards(segment).ok_or_else(malformed)?;
            if cards.is_empty() {
                continue;
            }
            if cards.len() != street.new_board_cards() {
                return Err(malformed());
            }
            board[street.index()] = cards;
        }

        // A turn without a flop, or a river without a turn.
        let dealt: Vec<bool> = board[1..].iter().map(|c| !c.is_empty()).collect();
        if dealt.windows(2).any(|w| !w[0] && w[1]) {
            return Err(malformed());
        }
        Ok(board)
    }

    /// Pretty printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<HandRecord, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Split `"AcKd"` into `["Ac", "Kd"]`. `None` if the text isn't whole two
/// character cards.
pub fn split_cards(text: &str) -> Option<Vec<&str>> {
    if !text.is_ascii() || text.len() % 2 != 0 {
        return None;
    }
    Some(
        (0..text.len())
            .step_by(2)
            .map(|i| &text[i..i + 2])
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acpc::Action;

    fn heads_up() -> HandRecord {
        HandRecord {
            ante: 0,
            big_blind: 200,
            small_blind: None,
            stacks: BTreeMap::from([(Position::Button, 10_000), (Position::BigBlind, 10_000)]),
            sequence: "r6c/cc/cc/cc".to_string(),
            holecards: BTreeMap::from([
                (Position::Button, Some("AcKd".to_string())),
                (Position::BigBlind, None),
            ]),
            boardcards: "2c7h9s/Td/3s".to_string(),
            winner: Position::Button,
            players: BTreeMap::new(),
            hero: Some(Position::Button),
        }
    }

    #[test]
    fn test_replay() {
        let decoded = heads_up().replay().unwrap();
        assert_eq!(1_200, decoded.pot);
        assert_eq!(
            Action::Raise {
                delta: 400,
                to_level: 600
            },
            decoded.streets[0].actions[0].action
        );
    }

    #[test]
    fn test_names_default_to_labels() {
        let mut record = heads_up();
        assert_eq!("BTN", record.player_name(Position::Button));
        record.players.insert(Position::Button, "alice".to_string());
        assert_eq!("alice", record.player_name(Position::Button));
    }

    #[test]
    fn test_hole_cards() {
        let record = heads_up();
        assert_eq!(Some(vec!["Ac", "Kd"]), record.hole_cards(Position::Button));
        assert_eq!(None, record.hole_cards(Position::BigBlind));
    }

    #[test]
    fn test_board_split() {
        let record = heads_up();
        let board = record.board().unwrap();
        assert!(board[0].is_empty());
        assert_eq!(vec!["2c", "7h", "9s"], board[1]);
        assert_eq!(vec!["Td"], board[2]);
        assert_eq!(vec!["3s"], board[3]);

        let mut flop_only = heads_up();
        flop_only.boardcards = "2c7h9s".to_string();
        assert!(flop_only.board().unwrap()[2].is_empty());
    }

    #[test]
    fn test_malformed_boards() {
        for bad in ["2c7h", "2c7h9s/TdJd", "2c7h9s/Td/3s/4s", "2c7h9s//3s", "2c7h9"] {
            let mut record = heads_up();
            record.boardcards = bad.to_string();
            assert_eq!(
                Err(TranslationError::MalformedBoard(bad.to_string())),
                record.board(),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_inconsistent_positions() {
        let mut record = heads_up();
        record.players.insert(Position::Cutoff, "carol".to_string());
        assert!(matches!(
            record.validate(),
            Err(TranslationError::InconsistentPositionSet(_))
        ));

        let mut record = heads_up();
        record.stacks.insert(Position::Cutoff, 10_000);
        assert!(matches!(
            record.validate(),
            Err(TranslationError::InconsistentPositionSet(_))
        ));

        let mut record = heads_up();
        record.winner = Position::SmallBlind;
        assert!(matches!(
            record.replay(),
            Err(TranslationError::InconsistentPositionSet(_))
        ));
    }

    #[test]
    fn test_too_many_stacks() {
        let mut record = heads_up();
        record.stacks = Position::ALL.iter().map(|&p| (p, 10_000)).collect();
        assert!(record.validate().is_ok());
        record.stacks.clear();
        assert!(matches!(
            record.validate(),
            Err(TranslationError::InconsistentPositionSet(_))
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_uses_labels() {
        let record = heads_up();
        let json = record.to_json().unwrap();
        assert!(json.contains("\"BTN\": 10000"));
        assert!(json.contains("\"winner\": \"BTN\""));
        assert_eq!(record, HandRecord::from_json(&json).unwrap());
    }
}
