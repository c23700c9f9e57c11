//! PokerStars style text hand histories.
//!
//! Reading goes text -> [`Segments`] -> [`Header`] and [`SeatMap`] ->
//! [`HandRecord`], with the action lines encoded into the compact
//! sequence on the way. Writing replays a record's sequence and prints
//! the text back out with [`HistoryWriter`].

/// Splitting the text on `*** NAME ***` markers and reading the header.
mod segments;
pub use self::segments::{HEADER, HOLE_CARDS, Header, SHOW_DOWN, SUMMARY, Segments};

/// Seat to position assignment.
mod seats;
pub use self::seats::{Seat, SeatMap};

/// The position keyed hand record.
mod record;
pub use self::record::{HandRecord, split_cards};

mod parser;

/// Record to text.
mod writer;
pub use self::writer::{HistoryWriter, WriterConfig};
