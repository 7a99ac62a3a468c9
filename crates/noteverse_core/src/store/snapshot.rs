//! JSON snapshot codec for the whole note collection.
//!
//! # Invariants
//! - `decode(encode(notes)) == notes` field-for-field.
//! - Decoded snapshots contain only valid notes with unique ids.
//! - `salvage` fails only when the text is not a JSON array; bad entries are
//!   dropped individually and reported with their index.

use crate::model::note::{Note, NoteId, NoteValidationError};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SnapshotError {
    Encode(serde_json::Error),
    Parse(serde_json::Error),
    InvalidNote(NoteValidationError),
    DuplicateId(NoteId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode note snapshot: {err}"),
            Self::Parse(err) => write!(f, "failed to parse note snapshot: {err}"),
            Self::InvalidNote(err) => write!(f, "invalid note in snapshot: {err}"),
            Self::DuplicateId(id) => write!(f, "duplicate note id {id} in snapshot"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Parse(err) => Some(err),
            Self::InvalidNote(err) => Some(err),
            Self::DuplicateId(_) => None,
        }
    }
}

/// Serializes notes as a JSON array in store order.
pub fn encode(notes: &[Note]) -> Result<String, SnapshotError> {
    serde_json::to_string(notes).map_err(SnapshotError::Encode)
}

/// Notes recovered from a parseable snapshot.
#[derive(Debug, Default)]
pub struct Salvaged {
    pub notes: Vec<Note>,
    /// `(position in the snapshot, reason)` for every dropped entry.
    pub dropped: Vec<(usize, SnapshotError)>,
}

impl Salvaged {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Parses and validates a JSON array of notes, rejecting any bad entry.
pub fn decode(raw: &str) -> Result<Vec<Note>, SnapshotError> {
    let salvaged = salvage(raw)?;
    match salvaged.dropped.into_iter().next() {
        Some((_, err)) => Err(err),
        None => Ok(salvaged.notes),
    }
}

/// Parses a JSON array of notes, keeping every valid entry.
///
/// Entries that do not deserialize, fail validation, or repeat an earlier id
/// are dropped; the first occurrence of an id wins.
///
/// # Errors
/// - `SnapshotError::Parse` when `raw` is not a JSON array.
pub fn salvage(raw: &str) -> Result<Salvaged, SnapshotError> {
    let entries: Vec<serde_json::Value> =
        serde_json::from_str(raw).map_err(SnapshotError::Parse)?;

    let mut salvaged = Salvaged::default();
    let mut seen = HashSet::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let note: Note = match serde_json::from_value(entry) {
            Ok(note) => note,
            Err(err) => {
                salvaged.dropped.push((index, SnapshotError::Parse(err)));
                continue;
            }
        };
        if let Err(err) = note.validate() {
            salvaged.dropped.push((index, SnapshotError::InvalidNote(err)));
            continue;
        }
        if !seen.insert(note.id) {
            salvaged
                .dropped
                .push((index, SnapshotError::DuplicateId(note.id)));
            continue;
        }
        salvaged.notes.push(note);
    }

    Ok(salvaged)
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, salvage, SnapshotError};
    use crate::model::note::{Note, Position};

    fn sample_notes() -> Vec<Note> {
        vec![
            Note::new(1, "Sun", "center", "#00ff88", "18/10/2026").with_position(Position::origin()),
            Note::new(2, "Orbit", "first ring", "#1A2B3C", "18/10/2026")
                .with_position(Position::new(-6.123_456_789, 1.5, 4.987_654_321)),
            Note::new(3, "Unplaced", "", "#ABCDEF", "19/10/2026"),
        ]
    }

    #[test]
    fn encode_then_decode_preserves_every_field() {
        let notes = sample_notes();
        let raw = encode(&notes).unwrap();
        assert_eq!(decode(&raw).unwrap(), notes);
    }

    #[test]
    fn wire_shape_uses_plain_field_names() {
        let raw = encode(&sample_notes()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["color"], "#00ff88");
        assert_eq!(value[1]["position"]["y"], 1.5);
        assert!(value[2].get("position").is_none());
    }

    #[test]
    fn decode_accepts_null_position() {
        let raw = r##"[{"id":4,"title":"t","content":"c","color":"#000000","date":"d","position":null}]"##;
        let notes = decode(raw).unwrap();
        assert_eq!(notes[0].position, None);
    }

    #[test]
    fn decode_rejects_garbage_and_duplicates() {
        assert!(matches!(decode("{not json"), Err(SnapshotError::Parse(_))));

        let duplicated = r##"[
            {"id":1,"title":"a","content":"","color":"#000000","date":"d"},
            {"id":1,"title":"b","content":"","color":"#000000","date":"d"}
        ]"##;
        assert!(matches!(
            decode(duplicated),
            Err(SnapshotError::DuplicateId(1))
        ));
    }

    #[test]
    fn decode_rejects_invalid_color() {
        let raw = r#"[{"id":1,"title":"a","content":"","color":"red","date":"d"}]"#;
        assert!(matches!(decode(raw), Err(SnapshotError::InvalidNote(_))));
    }

    #[test]
    fn salvage_keeps_good_entries_around_bad_ones() {
        let raw = r##"[
            {"id":1,"title":"sun","content":"","color":"#00ff88","date":"d"},
            {"id":2,"title":"precious","content":"keep me","color":"#123456","date":"d"},
            {"id":3,"title":"named","content":"","color":"red","date":"d"},
            {"id":2,"title":"again","content":"","color":"#123456","date":"d"},
            {"title":"no id"}
        ]"##;
        let salvaged = salvage(raw).unwrap();

        let titles: Vec<&str> = salvaged.notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["sun", "precious"]);
        assert!(!salvaged.is_clean());
        assert!(matches!(salvaged.dropped[0], (2, SnapshotError::InvalidNote(_))));
        assert!(matches!(salvaged.dropped[1], (3, SnapshotError::DuplicateId(2))));
        assert!(matches!(salvaged.dropped[2], (4, SnapshotError::Parse(_))));
    }

    #[test]
    fn salvage_fails_only_on_non_array_text() {
        assert!(matches!(salvage("{not json"), Err(SnapshotError::Parse(_))));
        assert!(matches!(salvage(r#"{"id":1}"#), Err(SnapshotError::Parse(_))));
        assert!(salvage("[]").unwrap().is_clean());
    }
}
