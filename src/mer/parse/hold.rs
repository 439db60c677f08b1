//! Hold chain reconstruction.
//!
//! Hold notes are encoded as a linked list by index, not by adjacency: the hold start
//! carries the index of its next segment, each relay segment carries its own index
//! plus the next one, and a hold end terminates the chain. Segment lines may be
//! interleaved with unrelated records anywhere later in the stream, so the resolver
//! scans forward over the materialized token slice matching reference indices.

use super::{ParseWarning, note_from_event};
use crate::mer::{
    command::NoteType,
    lex::token::Token,
    model::{HoldNote, Note},
};

/// Reconstructs one hold chain beginning with `start`, scanning `tokens` forward from
/// the hold start's own stream position.
///
/// A chain that never reaches a [`NoteType::HoldEnd`] before the stream ends is
/// malformed but accepted: the partial chain is returned and an
/// [`ParseWarning::UnterminatedHold`] is pushed. A hold start without a reference
/// field yields a single-segment chain, flagged the same way.
pub(super) fn resolve_chain(
    tokens: &[Token],
    start_index: usize,
    start: Note,
    reference: Option<u32>,
    parse_warnings: &mut Vec<ParseWarning>,
) -> HoldNote {
    let start_pos = start.pos;
    let mut segments = vec![start];

    let Some(mut sought) = reference else {
        parse_warnings.push(ParseWarning::UnterminatedHold(start_pos));
        return HoldNote { segments };
    };

    let remaining = tokens.get(start_index..).unwrap_or_default();
    let mut terminated = false;
    // Every sought index is looked up from the hold start again, so a chain
    // reconstructs the same way regardless of the physical order of its lines.
    // Offsets already in the chain are never matched again: a cyclic reference
    // runs out of candidates and leaves the partial chain, it never duplicates a
    // segment. Offset 0 is the hold start itself.
    let mut consumed = vec![0];
    let mut scan_from = 0;
    while segments.len() <= remaining.len() {
        let found = remaining
            .iter()
            .enumerate()
            .skip(scan_from)
            .find_map(|(offset, token)| {
                if consumed.contains(&offset) {
                    return None;
                }
                token
                    .as_note()
                    .filter(|event| event.index == Some(sought))
                    .map(|event| (offset, event))
            });
        let Some((offset, event)) = found else {
            break;
        };
        let Some(segment) = note_from_event(event, parse_warnings) else {
            // Unusable segment record; keep looking for another line with this index.
            scan_from = offset + 1;
            continue;
        };
        consumed.push(offset);
        segments.push(segment);
        match event.note_type {
            NoteType::HoldSegment => match event.reference {
                Some(next) => {
                    sought = next;
                    scan_from = 0;
                }
                None => break,
            },
            NoteType::HoldEnd => {
                terminated = true;
                break;
            }
            // Any other matched record is appended and the scan continues behind it
            // with the same sought index.
            _ => scan_from = offset + 1,
        }
    }

    if !terminated {
        parse_warnings.push(ParseWarning::UnterminatedHold(start_pos));
    }
    HoldNote { segments }
}
