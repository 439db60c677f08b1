//! Assembling a [`Chart`] from the lexed token stream.
//!
//! Tokens are consumed in stream order and routed into the chart's collections:
//! plain notes, masks, the end-of-chart marker, hold chains (via the
//! [`hold`] resolver) and the five gimmick collections. Problems found here are
//! never fatal; they are collected as [`ParseWarning`]s and the load proceeds with
//! best-effort data.

mod hold;

use thiserror::Error;

use crate::mer::{
    command::{ChartPos, GimmickType, MaskDirection, NoteType},
    lex::token::{NoteEvent, Token},
    model::{Chart, ChartMetadata, ChartObject, Gimmick, Note},
};

/// A structural problem tolerated during chart assembly.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseWarning {
    /// A hold chain never reached its terminator before the stream ended. The
    /// partial chain is kept.
    #[error("hold chain starting at {0} is not terminated")]
    UnterminatedHold(ChartPos),
    /// A second end-of-chart marker was found. The first one wins.
    #[error("duplicate end of chart marker at {0}")]
    DuplicateEndOfChart(ChartPos),
    /// A gimmick whose kind requires a payload did not carry one. The gimmick is
    /// dropped so the tempo map never sees a valueless breakpoint.
    #[error("{gimmick_type:?} gimmick at {pos} is missing its value")]
    MissingGimmickValue {
        /// The position of the gimmick.
        pos: ChartPos,
        /// The kind of the gimmick.
        gimmick_type: GimmickType,
    },
    /// A note record was missing its lane or size field and was dropped.
    #[error("note at {0} is missing lane or size fields")]
    IncompleteNote(ChartPos),
    /// A mask note carried a direction id the format does not define. The mask is
    /// kept without a direction.
    #[error("unknown mask direction id {id} at {pos}")]
    UnknownMaskDirection {
        /// The position of the mask note.
        pos: ChartPos,
        /// The id found.
        id: u32,
    },
}

/// Output of the chart assembly phase.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct ParseOutput {
    /// The assembled chart. Its timeline is not resolved yet.
    pub chart: Chart,
    /// Structural problems tolerated during assembly.
    pub parse_warnings: Vec<ParseWarning>,
}

impl Chart {
    /// Assembles a chart from the lexed token stream and its header metadata.
    ///
    /// The resulting chart has every `time` unset; run
    /// [`resolve_times`](crate::mer::timing::resolve_times) afterwards.
    pub fn from_tokens(tokens: &[Token], metadata: ChartMetadata) -> ParseOutput {
        let mut chart = Self {
            metadata,
            ..Self::default()
        };
        let mut parse_warnings = vec![];
        // Index into `chart.notes` of the last plain note, the baseline for sync
        // tagging. Masks and hold starts never become the baseline.
        let mut last_plain: Option<usize> = None;

        for (stream_index, token) in tokens.iter().enumerate() {
            match token {
                Token::Note(event) => assemble_note(
                    &mut chart,
                    tokens,
                    stream_index,
                    event,
                    &mut last_plain,
                    &mut parse_warnings,
                ),
                Token::Gimmick(event) => {
                    let needs_value = matches!(
                        event.gimmick_type,
                        GimmickType::BeatsPerMinute
                            | GimmickType::TimeSignature
                            | GimmickType::HiSpeed
                    );
                    if needs_value && event.value.is_none() {
                        parse_warnings.push(ParseWarning::MissingGimmickValue {
                            pos: event.pos,
                            gimmick_type: event.gimmick_type,
                        });
                        continue;
                    }
                    let gimmick = Gimmick {
                        pos: event.pos,
                        gimmick_type: event.gimmick_type,
                        value: event.value,
                        time: None,
                    };
                    match event.gimmick_type {
                        GimmickType::BeatsPerMinute => chart.bpm_gimmicks.push(gimmick),
                        GimmickType::TimeSignature => {
                            chart.time_signature_gimmicks.push(gimmick);
                        }
                        GimmickType::HiSpeed => chart.hi_speed_gimmicks.push(gimmick),
                        GimmickType::StopStart | GimmickType::StopEnd => {
                            chart.stop_gimmicks.push(gimmick);
                        }
                        GimmickType::ReverseEffectStart
                        | GimmickType::ReverseEffectEnd
                        | GimmickType::ReverseNoteEnd => chart.reverse_gimmicks.push(gimmick),
                    }
                }
            }
        }

        ParseOutput {
            chart,
            parse_warnings,
        }
    }
}

fn assemble_note(
    chart: &mut Chart,
    tokens: &[Token],
    stream_index: usize,
    event: &NoteEvent,
    last_plain: &mut Option<usize>,
    parse_warnings: &mut Vec<ParseWarning>,
) {
    match event.note_type {
        NoteType::EndChart => {
            if chart.end_of_chart.is_some() {
                parse_warnings.push(ParseWarning::DuplicateEndOfChart(event.pos));
            } else {
                chart.end_of_chart = Some(ChartObject::new(event.pos));
            }
        }
        // Hold segments and ends are only ever consumed by the chain resolver.
        NoteType::HoldSegment | NoteType::HoldEnd => {}
        NoteType::MaskAdd | NoteType::MaskRemove => {
            let Some(mut note) = note_from_event(event, parse_warnings) else {
                return;
            };
            note.mask_direction = match event.reference {
                Some(id) => {
                    let direction = MaskDirection::from_id(id);
                    if direction.is_none() {
                        parse_warnings.push(ParseWarning::UnknownMaskDirection {
                            pos: event.pos,
                            id,
                        });
                    }
                    direction
                }
                None => None,
            };
            chart.masks.push(note);
        }
        NoteType::HoldStart => {
            let Some(mut note) = note_from_event(event, parse_warnings) else {
                return;
            };
            check_sync(&mut note, baseline(&mut chart.notes, *last_plain));
            let chain = hold::resolve_chain(
                tokens,
                stream_index,
                note,
                event.reference,
                parse_warnings,
            );
            chart.hold_notes.push(chain);
        }
        _ => {
            let Some(mut note) = note_from_event(event, parse_warnings) else {
                return;
            };
            check_sync(&mut note, baseline(&mut chart.notes, *last_plain));
            chart.notes.push(note);
            *last_plain = Some(chart.notes.len() - 1);
        }
    }
}

fn baseline(notes: &mut [Note], last_plain: Option<usize>) -> Option<&mut Note> {
    last_plain.and_then(|index| notes.get_mut(index))
}

/// Builds a [`Note`] from its lexed record. Notes without lane or size data cannot be
/// placed on the ring and are dropped with a warning. Shared with the hold chain
/// resolver, which builds its segments the same way.
fn note_from_event(event: &NoteEvent, parse_warnings: &mut Vec<ParseWarning>) -> Option<Note> {
    let (Some(lane), Some(size)) = (event.lane, event.size) else {
        parse_warnings.push(ParseWarning::IncompleteNote(event.pos));
        return None;
    };
    Some(Note {
        pos: event.pos,
        note_type: event.note_type,
        bonus_type: event.bonus_type,
        lane,
        size,
        render: event.render.unwrap_or(true),
        is_sync: false,
        mask_direction: None,
        time: None,
    })
}

/// Tags both notes as simultaneous when the current note shares the exact position of
/// the previous plain note.
///
/// This is a single backward-looking comparison, not an all-pairs scan: notes that
/// are simultaneous but not stream-adjacent stay untagged. Masks are exempt entirely.
fn check_sync(current: &mut Note, last: Option<&mut Note>) {
    let Some(last) = last else {
        return;
    };
    if current.note_type.is_mask() || last.note_type.is_mask() {
        return;
    }
    if current.pos == last.pos {
        current.is_sync = true;
        last.is_sync = true;
    }
}
