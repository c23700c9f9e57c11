//! This is the core module. Everything here is independent of the text
//! format and of the compact notation.

/// Table relative positions and the per size templates.
mod position;
/// Export `Position`, `Street` and the template lookup.
pub use self::position::{Position, PositionParseError, Street, template};

/// Fixed point chip amounts.
mod amount;
/// Export the amount codec.
pub use self::amount::{AmountError, MINOR_UNITS, format_acpc, format_amount, parse_amount};

/// Compact set of seat indices.
mod player_bit_set;
/// Export `PlayerBitSet`
pub use self::player_bit_set::PlayerBitSet;
