use thiserror::Error;

/// An action the betting oracle refused to apply.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum IllegalActionError {
    #[error("The hand is complete, no player can act")]
    HandComplete,
    #[error("Raise to {attempted} doesn't go above the current bet of {current}")]
    BetSizeDoesntRaise { attempted: i64, current: i64 },
    #[error("Raise to {attempted} is below the minimum raise to {minimum}")]
    RaiseSizeTooSmall { attempted: i64, minimum: i64 },
    #[error("The player doesn't have enough chips left to raise")]
    NoChipsToRaise,
    #[error("An all in for less than a full raise didn't reopen the betting")]
    BettingNotReopened,
}

/// Errors that can occur when building a `TableState`.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TableStateBuilderError {
    #[error("stacks are required")]
    MissingStacks,

    #[error("big_blind is required")]
    MissingBigBlind,

    #[error("num_players must be between 2 and 10, got {0}")]
    UnsupportedTableSize(usize),

    #[error("big_blind must be positive, got {0}")]
    InvalidBigBlind(i64),

    #[error("small_blind must be non-negative and at most the big blind, got {0}")]
    InvalidSmallBlind(i64),

    #[error("ante must be non-negative, got {0}")]
    InvalidAnte(i64),

    #[error("stack at index {index} must be positive, got {value}")]
    InvalidStack { index: usize, value: i64 },
}
