use thiserror::Error;

use crate::betting::{IllegalActionError, TableStateBuilderError};
use crate::core::{AmountError, Position, Street};

/// Errors reading a text hand history.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("Missing mandatory section *** {0} ***")]
    MissingSection(&'static str),

    #[error("Malformed header line: {0:?}")]
    MalformedHeaderLine(String),

    #[error("Unsupported table size {0}, must be between 2 and 10")]
    UnsupportedTableSize(usize),

    #[error("Malformed amount in line {line:?}")]
    MalformedAmount {
        line: String,
        #[source]
        source: AmountError,
    },

    #[error("Action or summary line names unknown player {0:?}")]
    UnknownPlayer(String),

    #[error("No winner found in the summary")]
    MissingWinner,
}

/// Errors moving between the structured record and compact notation.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TranslationError {
    #[error("Illegal action {token:?} by {position:?} on the {street}")]
    IllegalAction {
        street: Street,
        position: Option<Position>,
        token: String,
        #[source]
        source: IllegalActionError,
    },

    #[error("Inconsistent position set: {0}")]
    InconsistentPositionSet(String),

    #[error("Chip amount overflowed")]
    AmountOverflow,

    #[error("Malformed compact token {0:?}")]
    MalformedToken(String),

    #[error("Malformed board {0:?}, expected 3/1/1 cards")]
    MalformedBoard(String),

    #[error("Unable to seat the table")]
    Table(#[from] TableStateBuilderError),
}

/// Either direction of a single hand going wrong.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ConversionError {
    #[error("Error parsing hand history")]
    Parse(#[from] ParseError),

    #[error("Error translating hand")]
    Translation(#[from] TranslationError),
}

/// A failure for one hand out of a batch, carrying enough to find it
/// again.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[error("Hand {index} failed to convert")]
pub struct HandError {
    /// Zero based index of the hand within the batch.
    pub index: usize,
    /// The raw input for the hand.
    pub raw: String,
    #[source]
    pub source: ConversionError,
}
