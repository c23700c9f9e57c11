use std::sync::LazyLock;

use regex::Regex;

use crate::core::{Street, parse_amount};
use crate::errors::ParseError;

use super::seats::Seat;

/// Name of the pseudo section holding everything before the first marker.
pub const HEADER: &str = "HEADER";
pub const HOLE_CARDS: &str = "HOLE CARDS";
pub const SHOW_DOWN: &str = "SHOW DOWN";
pub const SUMMARY: &str = "SUMMARY";

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\* ([A-Z][A-Z -]*?) \*\*\*").expect("valid marker regex"));

static BLINDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([$€£]?([\d.,]+)/[$€£]?([\d.,]+)(?: [A-Z]{3})?\)").expect("valid blinds regex")
});

static HAND_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Hand #(\d+)").expect("valid hand id regex"));

static TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Table '([^']*)' (\d+)-max(?: \([^)]*\))? Seat #(\d+) is the button")
        .expect("valid table regex")
});

static SEAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Seat (\d+):? (.+?) \([$€£]?([\d.,]+) in chips[^)]*\)( is sitting out)?")
        .expect("valid seat regex")
});

static ANTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?): posts the ante [$€£]?([\d.,]+)").expect("valid ante regex")
});

/// A hand history split on its `*** NAME ***` markers.
///
/// Sections keep the order they appear in. Text following a marker on
/// the same line (the board for street markers) is the first line of the
/// section. Blank lines are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    sections: Vec<(String, Vec<String>)>,
}

impl Segments {
    /// Split `text` into sections.
    ///
    /// Fails when either of the mandatory `HOLE CARDS` or `SUMMARY`
    /// sections is missing. Streets the hand never reached are just
    /// absent.
    pub fn parse(text: &str) -> Result<Segments, ParseError> {
        let mut sections: Vec<(String, Vec<String>)> = Vec::new();
        let mut name = HEADER.to_string();
        let mut start = 0;

        for captures in MARKER.captures_iter(text) {
            let (Some(whole), Some(marker)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            push_section(&mut sections, name, &text[start..whole.start()]);
            name = marker.as_str().to_string();
            start = whole.end();
        }
        push_section(&mut sections, name, &text[start..]);

        let segments = Segments { sections };
        for mandatory in [HOLE_CARDS, SUMMARY] {
            if segments.get(mandatory).is_none() {
                return Err(ParseError::MissingSection(mandatory));
            }
        }
        Ok(segments)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn header(&self) -> &[String] {
        self.get(HEADER).unwrap_or_default()
    }

    /// The action lines for `street`, empty if the hand never got there.
    pub fn street(&self, street: Street) -> &[String] {
        self.get(street.marker()).unwrap_or_default()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(n, _)| n.as_str())
    }

    /// Whether `name` posts or acts in any section but the summary.
    fn has_actor(&self, name: &str) -> bool {
        let prefix = format!("{name}: ");
        self.sections
            .iter()
            .filter(|(n, _)| n != SUMMARY)
            .flat_map(|(_, lines)| lines.iter())
            .any(|line| line.starts_with(&prefix))
    }
}

fn push_section(sections: &mut Vec<(String, Vec<String>)>, name: String, body: &str) {
    let lines = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);

    // Repeated markers (run it twice boards) share one section.
    match sections.iter_mut().find(|(n, _)| *n == name) {
        Some((_, existing)) => existing.extend(lines),
        None => sections.push((name, lines.collect())),
    }
}

/// What the lines before `*** HOLE CARDS ***` say about the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub hand_id: Option<String>,
    pub table_name: String,
    pub small_blind: i64,
    pub big_blind: i64,
    pub max_seats: usize,
    pub button_seat: u8,
    /// Seats in the order they are listed.
    pub seats: Vec<Seat>,
    /// Numbers of the seats marked `is sitting out`.
    pub sitting_out: Vec<u8>,
    pub ante: Option<i64>,
}

impl Header {
    /// Parse the header lines.
    ///
    /// The blinds line, the table line and the seat lines are mandatory,
    /// the ante is optional.
    pub fn parse(lines: &[String]) -> Result<Header, ParseError> {
        let first = lines.first().map(String::as_str).unwrap_or_default();
        let malformed = |line: &str| ParseError::MalformedHeaderLine(line.to_string());

        let blinds = BLINDS.captures(first).ok_or_else(|| malformed(first))?;
        let small_blind = amount(first, &blinds[1])?;
        let big_blind = amount(first, &blinds[2])?;
        let hand_id = HAND_ID.captures(first).map(|c| c[1].to_string());

        let table_idx = lines
            .iter()
            .position(|l| l.starts_with("Table "))
            .ok_or_else(|| malformed(lines.get(1).map(String::as_str).unwrap_or_default()))?;
        let table_line = &lines[table_idx];
        let table = TABLE.captures(table_line).ok_or_else(|| malformed(table_line))?;
        let table_name = table[1].to_string();
        let max_seats = table[2].parse().map_err(|_| malformed(table_line))?;
        let button_seat = table[3].parse().map_err(|_| malformed(table_line))?;

        let mut seats = Vec::new();
        let mut sitting_out = Vec::new();
        for line in &lines[table_idx + 1..] {
            if !line.starts_with("Seat ") {
                break;
            }
            let captures = SEAT.captures(line).ok_or_else(|| malformed(line))?;
            let number = captures[1].parse().map_err(|_| malformed(line))?;
            if captures.get(4).is_some() {
                sitting_out.push(number);
            }
            seats.push(Seat {
                number,
                name: captures[2].to_string(),
                stack: amount(line, &captures[3])?,
            });
        }

        let mut ante = None;
        for line in &lines[table_idx + 1..] {
            if let Some(captures) = ANTE.captures(line) {
                let posted = amount(line, &captures[2])?;
                ante = Some(ante.map_or(posted, |a: i64| a.max(posted)));
            }
        }

        Ok(Header {
            hand_id,
            table_name,
            small_blind,
            big_blind,
            max_seats,
            button_seat,
            seats,
            sitting_out,
            ante,
        })
    }

    /// The seats dealt into the hand.
    ///
    /// Cash game players sitting out aren't dealt cards and never show up
    /// again. Tournament players sitting out still post and fold, so a
    /// seat marked as sitting out only counts when its player posts or
    /// acts somewhere before the summary.
    pub fn dealt_in(&self, segments: &Segments) -> Vec<Seat> {
        self.seats
            .iter()
            .filter(|seat| {
                !self.sitting_out.contains(&seat.number) || segments.has_actor(&seat.name)
            })
            .cloned()
            .collect()
    }
}

fn amount(line: &str, text: &str) -> Result<i64, ParseError> {
    parse_amount(text).map_err(|source| ParseError::MalformedAmount {
        line: line.to_string(),
        source,
    })
}
