//! Files of hand histories hold many hands separated by blank lines.
//! These helpers convert them one hand at a time so a bad hand doesn't
//! stop the rest; every failure carries the hand's index and raw text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::errors::HandError;
use crate::hand_history::{HandRecord, HistoryWriter};

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\r?\n[ \t]*){2,}").expect("valid separator regex"));

/// Separator [`join_hands`] puts between hands.
pub const HAND_SEPARATOR: &str = "\n\n\n";

/// Split a file into the text of each hand.
///
/// ```
/// use hh_acpc::batch::split_hands;
///
/// let hands = split_hands("hand one\nline two\n\n\n\nhand two\n");
/// assert_eq!(vec!["hand one\nline two", "hand two"], hands);
/// ```
pub fn split_hands(text: &str) -> Vec<&str> {
    let text = text.trim_start_matches('\u{feff}');
    BLANK_LINES
        .split(text)
        .map(str::trim)
        .filter(|hand| !hand.is_empty())
        .collect()
}

/// Join hands back into one file's worth of text.
pub fn join_hands<S: AsRef<str>>(hands: &[S]) -> String {
    hands
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(HAND_SEPARATOR)
}

/// Parse every hand in `text`.
pub fn parse_hands(text: &str) -> Vec<Result<HandRecord, HandError>> {
    let results: Vec<_> = split_hands(text)
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            HandRecord::parse(raw).map_err(|source| HandError {
                index,
                raw: raw.to_string(),
                source,
            })
        })
        .collect();
    log_failures("parse", &results);
    results
}

/// Write every record. Hand ids count up from the writer's configured
/// id.
pub fn write_hands(
    records: &[HandRecord],
    writer: &HistoryWriter,
) -> Vec<Result<String, HandError>> {
    let mut writer = writer.clone();
    let first_id = writer.config().hand_id;

    let results: Vec<_> = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            writer.config_mut().hand_id = first_id + index as u64;
            writer.write(record).map_err(|source| HandError {
                index,
                raw: record.sequence.clone(),
                source: source.into(),
            })
        })
        .collect();
    log_failures("write", &results);
    results
}

fn log_failures<T>(what: &str, results: &[Result<T, HandError>]) {
    let failed = results.iter().filter(|r| r.is_err()).count();
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        warn!(index = err.index, error = ?err.source, "Unable to {what} hand");
    }
    debug!(total = results.len(), failed, "Finished batch {what}");
}
