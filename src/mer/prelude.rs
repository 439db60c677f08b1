//! Prelude module for the MER crate.
//!
//! Re-exports all public types of the `mer` module for convenient access:
//! `use mer_rs::mer::prelude::*;`.

pub use super::{
    MerOutput, MerWarning,
    command::{
        BonusType, ChartPos, GimmickType, GimmickValue, MaskDirection, NoteType,
        TICKS_PER_MEASURE, TimeSignature,
    },
    lex::{
        LexError, LexOutput, LexWarning,
        cursor::Cursor,
        parse_lex_tokens, parse_meta,
        token::{GimmickEvent, NoteEvent, Token},
    },
    model::{Chart, ChartMetadata, ChartObject, Gimmick, HoldNote, Note},
    parse::{ParseOutput, ParseWarning},
    parse_mer,
    timing::{TempoChange, TempoMap, TimingError, resolve_times},
    validate::{LoadError, check_load},
};
