//! Definitions of chart body tokens.
//!
//! Every body line becomes at most one [`Token`]. The whole token list is materialized
//! before assembly so that hold chains can be resolved by index lookup over it.

use super::{LexError, LexWarning};
use crate::mer::command::{
    BonusType, ChartPos, GimmickType, GimmickValue, NoteType, TimeSignature,
};

/// A typed record lexed from one chart body line.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Token {
    /// A note record (object id 1).
    Note(NoteEvent),
    /// A gimmick record (any other known object id).
    Gimmick(GimmickEvent),
}

/// A note record. Trailing fields that were absent on the line stay [`None`], they are
/// never defaulted to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// The symbolic position of the note.
    pub pos: ChartPos,
    /// The kind of the note.
    pub note_type: NoteType,
    /// The bonus effect of the note.
    pub bonus_type: BonusType,
    /// This line's own reference index, used by hold chain back-references.
    pub index: Option<u32>,
    /// The ring lane the note starts at, in `0..60`.
    pub lane: Option<u32>,
    /// The arc size of the note, in `1..=60`.
    pub size: Option<u32>,
    /// Whether a hold segment is rendered.
    pub render: Option<bool>,
    /// The trailing reference field: the next segment index on hold starts and relays,
    /// or the direction id on mask notes.
    pub reference: Option<u32>,
}

/// A gimmick record.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GimmickEvent {
    /// The symbolic position of the gimmick.
    pub pos: ChartPos,
    /// The kind of the gimmick.
    pub gimmick_type: GimmickType,
    /// The payload, if the kind has one and the line carried it.
    pub value: Option<GimmickValue>,
}

fn required<T: std::str::FromStr>(
    fields: &[&str],
    at: usize,
    field: &'static str,
    line: usize,
) -> Result<T, LexError> {
    let raw = fields
        .get(at)
        .ok_or(LexError::ExpectedField { line, field })?;
    raw.parse()
        .map_err(|_| LexError::MalformedNumber {
            line,
            found: (*raw).to_owned(),
        })
}

fn optional<T: std::str::FromStr>(
    fields: &[&str],
    at: usize,
    line: usize,
) -> Result<Option<T>, LexError> {
    let Some(raw) = fields.get(at) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|_| LexError::MalformedNumber {
            line,
            found: (*raw).to_owned(),
        })
}

impl Token {
    /// Lexes one chart body line into a token.
    ///
    /// Returns `Ok(None)` for lines that produce nothing: the no-op object id 0 and
    /// lines with an unknown object or note type id (those also push a [`LexWarning`]).
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] when a numeric field is malformed or a structurally
    /// required field (measure, tick, object id, note type id) is missing. Such an
    /// error aborts the whole chart load.
    pub fn parse(
        source: &str,
        line: usize,
        warnings: &mut Vec<LexWarning>,
    ) -> Result<Option<Self>, LexError> {
        let fields: Vec<&str> = source.split_whitespace().collect();

        let measure = required(&fields, 0, "measure", line)?;
        let tick = required(&fields, 1, "tick", line)?;
        let object_id: u32 = required(&fields, 2, "object id", line)?;
        let pos = ChartPos::new(measure, tick);

        if object_id == 0 {
            return Ok(None);
        }
        if object_id == 1 {
            return Self::parse_note(&fields, pos, line, warnings);
        }
        Self::parse_gimmick(&fields, object_id, pos, line, warnings)
    }

    fn parse_note(
        fields: &[&str],
        pos: ChartPos,
        line: usize,
        warnings: &mut Vec<LexWarning>,
    ) -> Result<Option<Self>, LexError> {
        let note_type_id: u32 = required(fields, 3, "note type id", line)?;

        // The chart terminator carries no further fields.
        if note_type_id == 14 {
            return Ok(Some(Self::Note(NoteEvent {
                pos,
                note_type: NoteType::EndChart,
                bonus_type: BonusType::None,
                index: None,
                lane: None,
                size: None,
                render: None,
                reference: None,
            })));
        }

        let Some((note_type, bonus_type)) = NoteType::from_id(note_type_id) else {
            warnings.push(LexWarning::UnknownNoteType {
                line,
                id: note_type_id,
            });
            return Ok(None);
        };

        Ok(Some(Self::Note(NoteEvent {
            pos,
            note_type,
            bonus_type,
            index: optional(fields, 4, line)?,
            lane: optional(fields, 5, line)?,
            size: optional(fields, 6, line)?,
            render: optional::<u32>(fields, 7, line)?.map(|flag| flag == 1),
            reference: optional(fields, 8, line)?,
        })))
    }

    fn parse_gimmick(
        fields: &[&str],
        object_id: u32,
        pos: ChartPos,
        line: usize,
        warnings: &mut Vec<LexWarning>,
    ) -> Result<Option<Self>, LexError> {
        let Some(gimmick_type) = GimmickType::from_object_id(object_id) else {
            warnings.push(LexWarning::UnknownObjectId {
                line,
                id: object_id,
            });
            return Ok(None);
        };

        let value = match gimmick_type {
            GimmickType::BeatsPerMinute => optional(fields, 3, line)?.map(GimmickValue::Bpm),
            GimmickType::HiSpeed => optional(fields, 3, line)?.map(GimmickValue::Speed),
            GimmickType::TimeSignature => {
                let numerator = optional(fields, 3, line)?;
                let denominator = optional(fields, 4, line)?;
                numerator.zip(denominator).map(|(numerator, denominator)| {
                    GimmickValue::TimeSignature(TimeSignature {
                        numerator,
                        denominator,
                    })
                })
            }
            // Stop and reverse markers carry no payload.
            _ => None,
        };

        Ok(Some(Self::Gimmick(GimmickEvent {
            pos,
            gimmick_type,
            value,
        })))
    }

    /// The note record inside this token, if it is one.
    #[must_use]
    pub const fn as_note(&self) -> Option<&NoteEvent> {
        match self {
            Self::Note(event) => Some(event),
            Self::Gimmick(_) => None,
        }
    }
}
