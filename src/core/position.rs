use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// A seat's role relative to the button.
///
/// The declaration order is the order positions take around the table
/// starting from the button, so sorting positions gives the canonical
/// seating for any table size.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    #[cfg_attr(feature = "serde", serde(rename = "BTN"))]
    Button,
    #[cfg_attr(feature = "serde", serde(rename = "SB"))]
    SmallBlind,
    #[cfg_attr(feature = "serde", serde(rename = "BB"))]
    BigBlind,
    #[cfg_attr(feature = "serde", serde(rename = "UTG"))]
    UnderTheGun,
    #[cfg_attr(feature = "serde", serde(rename = "UTG+1"))]
    UnderTheGun1,
    #[cfg_attr(feature = "serde", serde(rename = "UTG+2"))]
    UnderTheGun2,
    #[cfg_attr(feature = "serde", serde(rename = "MP1"))]
    Middle1,
    #[cfg_attr(feature = "serde", serde(rename = "MP2"))]
    Middle2,
    #[cfg_attr(feature = "serde", serde(rename = "MP3"))]
    Middle3,
    #[cfg_attr(feature = "serde", serde(rename = "CO"))]
    Cutoff,
}

use Position::*;

const TWO: &[Position] = &[Button, BigBlind];
const THREE: &[Position] = &[Button, SmallBlind, BigBlind];
const FOUR: &[Position] = &[Button, SmallBlind, BigBlind, Cutoff];
const FIVE: &[Position] = &[Button, SmallBlind, BigBlind, UnderTheGun, Cutoff];
const SIX: &[Position] = &[Button, SmallBlind, BigBlind, UnderTheGun, Middle1, Cutoff];
const SEVEN: &[Position] = &[
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    Middle1,
    Middle2,
    Cutoff,
];
const EIGHT: &[Position] = &[
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    Middle1,
    Middle2,
    Middle3,
    Cutoff,
];
const NINE: &[Position] = &[
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    UnderTheGun1,
    Middle1,
    Middle2,
    Middle3,
    Cutoff,
];
const TEN: &[Position] = &[
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    UnderTheGun1,
    UnderTheGun2,
    Middle1,
    Middle2,
    Middle3,
    Cutoff,
];

/// Templates indexed by `num_players - 2`.
static TEMPLATES: [&[Position]; 9] = [TWO, THREE, FOUR, FIVE, SIX, SEVEN, EIGHT, NINE, TEN];

/// The canonical positions for a table of `num_players`, starting with
/// the button and going clockwise.
///
/// Returns `None` for table sizes outside of 2 to 10.
///
/// # Example
///
/// ```
/// use hh_acpc::core::{Position, template};
///
/// let heads_up = template(2).unwrap();
/// assert_eq!(heads_up, &[Position::Button, Position::BigBlind]);
/// assert!(template(11).is_none());
/// ```
pub fn template(num_players: usize) -> Option<&'static [Position]> {
    num_players
        .checked_sub(2)
        .and_then(|idx| TEMPLATES.get(idx))
        .copied()
}

impl Position {
    pub const ALL: [Position; 10] = [
        Button,
        SmallBlind,
        BigBlind,
        UnderTheGun,
        UnderTheGun1,
        UnderTheGun2,
        Middle1,
        Middle2,
        Middle3,
        Cutoff,
    ];

    /// The short label used in both formats, e.g. `UTG+1`.
    pub fn label(&self) -> &'static str {
        match self {
            Button => "BTN",
            SmallBlind => "SB",
            BigBlind => "BB",
            UnderTheGun => "UTG",
            UnderTheGun1 => "UTG+1",
            UnderTheGun2 => "UTG+2",
            Middle1 => "MP1",
            Middle2 => "MP2",
            Middle3 => "MP3",
            Cutoff => "CO",
        }
    }

    /// The role tag the text format prints in summary lines.
    pub fn summary_tag(&self) -> Option<&'static str> {
        match self {
            Button => Some("button"),
            SmallBlind => Some("small blind"),
            BigBlind => Some("big blind"),
            _ => None,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown position label {0:?}")]
pub struct PositionParseError(pub String);

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .iter()
            .find(|p| p.label() == s)
            .copied()
            .ok_or_else(|| PositionParseError(s.to_string()))
    }
}

/// One of the four betting rounds.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Street {
    #[default]
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Street> {
        Street::ALL.get(idx).copied()
    }

    pub fn next(&self) -> Option<Street> {
        Street::from_index(self.index() + 1)
    }

    /// The section marker the text format uses for this street's action.
    pub fn marker(&self) -> &'static str {
        match self {
            Street::Preflop => "HOLE CARDS",
            Street::Flop => "FLOP",
            Street::Turn => "TURN",
            Street::River => "RIVER",
        }
    }

    /// How many community cards are dealt when this street starts.
    pub fn new_board_cards(&self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn | Street::River => 1,
        }
    }
}

impl Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "Preflop"),
            Street::Flop => write!(f, "Flop"),
            Street::Turn => write!(f, "Turn"),
            Street::River => write!(f, "River"),
        }
    }
}
