use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument, trace};

use crate::acpc::{SequenceEncoder, WagerEvent};
use crate::core::{AmountError, Position, Street, parse_amount};
use crate::errors::{ConversionError, ParseError};

use super::record::HandRecord;
use super::seats::SeatMap;
use super::segments::{Header, SHOW_DOWN, SUMMARY, Segments};

static ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.+?): (folds|checks|calls|bets|raises)(?: [$€£]?([\d.,]+))?(?: to [$€£]?([\d.,]+))?",
    )
    .expect("valid action regex")
});

static DEALT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Dealt to (.+?) \[([^\]]+)\]").expect("valid dealt regex"));

static SHOWS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?): shows \[([^\]]+)\]").expect("valid shows regex"));

static BOARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Board \[([^\]]+)\]").expect("valid board regex"));

static SHOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Seat (\d+): .*?\bshowed \[([^\]]+)\]").expect("valid showed regex")
});

static WINNER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Seat (\d+): .*?\b(?:collected|won) \(").expect("valid winner regex")
});

impl HandRecord {
    /// Parse one PokerStars style hand history.
    ///
    /// Positions come from rotating the seats to the button. Action lines
    /// on each street become wagering events that are encoded into the
    /// compact sequence. Hole cards are taken from `Dealt to`, `shows`
    /// and summary `showed` lines, the board and the winner from the
    /// summary.
    #[instrument(level = "debug", skip_all)]
    pub fn parse(text: &str) -> Result<HandRecord, ConversionError> {
        let segments = Segments::parse(text)?;
        let header = Header::parse(segments.header())?;
        let seats = SeatMap::assign(header.dealt_in(&segments), header.button_seat)?;

        let mut streets: [Vec<WagerEvent>; 4] = Default::default();
        for street in Street::ALL {
            for line in segments.street(street) {
                if let Some(event) = wager_event(line, &seats)? {
                    trace!(%street, ?event, "Action line");
                    streets[street.index()].push(event);
                }
            }
        }
        let sequence = SequenceEncoder::new(header.big_blind).encode(&streets)?;

        let mut holecards: BTreeMap<Position, Option<String>> =
            seats.iter().map(|(position, _)| (position, None)).collect();
        let mut hero = None;
        for line in segments.street(Street::Preflop) {
            if let Some(captures) = DEALT.captures(line) {
                let position = seats.require(&captures[1])?;
                hero.get_or_insert(position);
                holecards.insert(position, Some(compact_cards(&captures[2])));
            }
        }
        for line in segments.get(SHOW_DOWN).unwrap_or_default() {
            if let Some(captures) = SHOWS.captures(line) {
                let position = seats.require(&captures[1])?;
                holecards.insert(position, Some(compact_cards(&captures[2])));
            }
        }

        let mut boardcards = String::new();
        let mut winner = None;
        for line in segments.get(SUMMARY).unwrap_or_default() {
            if let Some(captures) = BOARD.captures(line) {
                boardcards = board_string(&captures[1]);
            }
            if let Some(captures) = SHOWED.captures(line) {
                let position = seat_position(&seats, &captures[1], line)?;
                holecards
                    .entry(position)
                    .or_default()
                    .get_or_insert_with(|| compact_cards(&captures[2]));
            }
            if winner.is_none()
                && let Some(captures) = WINNER.captures(line)
            {
                winner = Some(seat_position(&seats, &captures[1], line)?);
            }
        }
        let winner = winner.ok_or(ParseError::MissingWinner)?;

        let small_blind =
            (header.small_blind != header.big_blind / 2).then_some(header.small_blind);
        let record = HandRecord {
            ante: header.ante.unwrap_or(0),
            big_blind: header.big_blind,
            small_blind,
            stacks: seats.stacks(),
            sequence,
            holecards,
            boardcards,
            winner,
            players: seats.players(),
            hero,
        };
        debug!(
            hand_id = header.hand_id.as_deref().unwrap_or("?"),
            num_players = record.num_players(),
            sequence = %record.sequence,
            "Parsed hand"
        );
        Ok(record)
    }
}

/// The wagering event on `line`, or `None` for lines that aren't
/// actions (posts, chat, uncalled bets and so on).
fn wager_event(line: &str, seats: &SeatMap) -> Result<Option<WagerEvent>, ParseError> {
    let Some(captures) = ACTION.captures(line) else {
        return Ok(None);
    };
    seats.require(&captures[1])?;

    let amount = |idx: usize| -> Result<i64, ParseError> {
        let text = captures.get(idx).map(|m| m.as_str()).ok_or_else(|| {
            ParseError::MalformedAmount {
                line: line.to_string(),
                source: AmountError::Malformed(String::new()),
            }
        })?;
        parse_amount(text).map_err(|source| ParseError::MalformedAmount {
            line: line.to_string(),
            source,
        })
    };

    let event = match &captures[2] {
        "folds" => WagerEvent::Fold,
        "checks" => WagerEvent::Check,
        "calls" => WagerEvent::Call,
        "bets" => WagerEvent::Bet(amount(3)?),
        _ => WagerEvent::RaiseTo(amount(4)?),
    };
    Ok(Some(event))
}

fn seat_position(seats: &SeatMap, number: &str, line: &str) -> Result<Position, ParseError> {
    number
        .parse()
        .ok()
        .and_then(|n| seats.position_of_seat(n))
        .ok_or_else(|| ParseError::UnknownPlayer(line.to_string()))
}

/// `"Ac Kd"` to `"AcKd"`.
fn compact_cards(cards: &str) -> String {
    cards.split_whitespace().collect()
}

/// `"2c 7h 9s Td 3s"` to `"2c7h9s/Td/3s"`.
fn board_string(cards: &str) -> String {
    let cards: Vec<&str> = cards.split_whitespace().collect();
    let (flop, later) = cards.split_at(cards.len().min(3));
    std::iter::once(flop.concat())
        .chain(later.iter().map(|c| c.to_string()))
        .collect::<Vec<_>>()
        .join("/")
}
