use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::core::{Position, template};
use crate::errors::ParseError;

/// A seat line from the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    /// The site's seat number, not necessarily contiguous.
    pub number: u8,
    pub name: String,
    pub stack: i64,
}

/// Seats paired with the position each one plays this hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    /// Seating order starting at the button.
    seats: Vec<(Position, Seat)>,
    by_name: HashMap<String, Position>,
}

impl SeatMap {
    /// Rotate `seats` so the button comes first and zip them with the
    /// template for the table size.
    ///
    /// `seats` can be in any order; they are sorted by seat number first.
    pub fn assign(mut seats: Vec<Seat>, button_seat: u8) -> Result<SeatMap, ParseError> {
        let positions =
            template(seats.len()).ok_or(ParseError::UnsupportedTableSize(seats.len()))?;

        seats.sort_by_key(|s| s.number);
        let button_idx = seats
            .iter()
            .position(|s| s.number == button_seat)
            .ok_or_else(|| {
                ParseError::MalformedHeaderLine(format!("Seat #{button_seat} is the button"))
            })?;
        seats.rotate_left(button_idx);

        let seats: Vec<(Position, Seat)> = positions.iter().copied().zip(seats).collect();
        let by_name = seats
            .iter()
            .map(|(position, seat)| (seat.name.clone(), *position))
            .collect();
        trace!(num_players = seats.len(), button_seat, "Assigned positions");

        Ok(SeatMap { seats, by_name })
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn position_of(&self, name: &str) -> Option<Position> {
        self.by_name.get(name).copied()
    }

    /// Like [`SeatMap::position_of`] but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<Position, ParseError> {
        self.position_of(name)
            .ok_or_else(|| ParseError::UnknownPlayer(name.to_string()))
    }

    pub fn position_of_seat(&self, number: u8) -> Option<Position> {
        self.seats
            .iter()
            .find(|(_, seat)| seat.number == number)
            .map(|(position, _)| *position)
    }

    pub fn seat(&self, position: Position) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, seat)| seat)
    }

    /// Seats in seating order, button first.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Seat)> {
        self.seats.iter().map(|(position, seat)| (*position, seat))
    }

    pub fn stacks(&self) -> BTreeMap<Position, i64> {
        self.iter().map(|(p, seat)| (p, seat.stack)).collect()
    }

    pub fn players(&self) -> BTreeMap<Position, String> {
        self.iter().map(|(p, seat)| (p, seat.name.clone())).collect()
    }
}
