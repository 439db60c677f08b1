//! Chart data built from a parsed MER file.
//!
//! A [`Chart`] is constructed fresh per load and fully rebuilt on reload; nothing is
//! mutated incrementally. Every object's `time` is [`None`] until the timeline has
//! been resolved by [`resolve_times`](crate::mer::timing::resolve_times).

use crate::mer::{
    command::{BonusType, ChartPos, GimmickType, GimmickValue, MaskDirection, NoteType},
    timing::TempoMap,
};

/// Metadata read from the `#KEY value` header of a MER file.
///
/// One struct covers both file flavors: song-metadata files (`meta.mer`, carrying
/// title/artist/BPM display data) and per-difficulty chart files (carrying audio and
/// offset data). Keys a file does not carry stay [`None`]. This is available without
/// timeline resolution, so catalog layers can read it cheaply.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartMetadata {
    /// Path of the music file to play, relative to the chart.
    pub music_file_path: Option<String>,
    /// Path of the audio file, as used by song-metadata files.
    pub audio: Option<String>,
    /// Audio offset in seconds.
    pub audio_offset: Option<f64>,
    /// Background movie offset in seconds.
    pub movie_offset: Option<f64>,
    /// Difficulty level of the chart.
    pub level: Option<f64>,
    /// Who placed the notes into the chart.
    pub author: Option<String>,
    /// Start of the song-select preview in seconds.
    pub preview_time: Option<f64>,
    /// Length of the song-select preview in seconds.
    pub preview_length: Option<f64>,
    /// Title of the song.
    pub title: Option<String>,
    /// Reading aid (furigana) of the title.
    pub rubi_title: Option<String>,
    /// Artist of the song.
    pub artist: Option<String>,
    /// BPM display text. Kept verbatim, charts use ranges like `90-180`.
    pub bpm: Option<String>,
}

/// A bare chart object: a symbolic position plus its resolved absolute time.
///
/// Used for the end-of-chart marker, which has no lane data.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartObject {
    /// The symbolic position of the object.
    pub pos: ChartPos,
    /// The absolute time in milliseconds, [`None`] until the timeline is resolved.
    pub time: Option<f64>,
}

impl ChartObject {
    /// Creates an unresolved object at `pos`.
    #[must_use]
    pub const fn new(pos: ChartPos) -> Self {
        Self { pos, time: None }
    }
}

/// A note on the ring.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note {
    /// The symbolic position of the note.
    pub pos: ChartPos,
    /// The kind of the note.
    pub note_type: NoteType,
    /// The bonus effect of the note.
    pub bonus_type: BonusType,
    /// The ring lane the note starts at, in `0..60`.
    pub lane: u32,
    /// The arc size of the note, in `1..=60`.
    pub size: u32,
    /// Whether the note is rendered. Only hold segments ever carry `false`.
    pub render: bool,
    /// Whether another note shares this note's exact position. Never set on masks.
    pub is_sync: bool,
    /// The sweep direction, only present on mask notes.
    pub mask_direction: Option<MaskDirection>,
    /// The absolute time in milliseconds, [`None`] until the timeline is resolved.
    pub time: Option<f64>,
}

/// An ordered, non-empty hold note chain.
///
/// The first segment is the [`HoldStart`](NoteType::HoldStart), the last one a
/// [`HoldEnd`](NoteType::HoldEnd) when the chain was properly terminated, and the
/// interior ones are [`HoldSegment`](NoteType::HoldSegment)s. Segments are strictly
/// increasing in position. The chain owns its notes exclusively; they appear in no
/// other collection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HoldNote {
    /// The segments of the chain, in play order.
    pub segments: Vec<Note>,
}

impl HoldNote {
    /// The hold start segment.
    #[must_use]
    pub fn start(&self) -> Option<&Note> {
        self.segments.first()
    }

    /// The last segment of the chain. Not necessarily a [`NoteType::HoldEnd`] when
    /// the source chain was unterminated.
    #[must_use]
    pub fn end(&self) -> Option<&Note> {
        self.segments.last()
    }

    /// Whether the chain reached its terminator and has at least a start and an end.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.segments.len() >= 2
            && self
                .end()
                .is_some_and(|note| note.note_type == NoteType::HoldEnd)
    }
}

/// A non-note chart event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gimmick {
    /// The symbolic position of the gimmick.
    pub pos: ChartPos,
    /// The kind of the gimmick.
    pub gimmick_type: GimmickType,
    /// The payload, if the kind has one and the source line carried it.
    pub value: Option<GimmickValue>,
    /// The absolute time in milliseconds, [`None`] until the timeline is resolved.
    pub time: Option<f64>,
}

impl Gimmick {
    /// The BPM payload, if this is a BPM change carrying one.
    #[must_use]
    pub const fn bpm(&self) -> Option<f64> {
        match self.value {
            Some(GimmickValue::Bpm(bpm)) => Some(bpm),
            _ => None,
        }
    }

    /// The time signature payload, if this is a time signature change carrying one.
    #[must_use]
    pub const fn time_signature(&self) -> Option<crate::mer::command::TimeSignature> {
        match self.value {
            Some(GimmickValue::TimeSignature(time_signature)) => Some(time_signature),
            _ => None,
        }
    }

    /// The speed payload, if this is a hi-speed change carrying one.
    #[must_use]
    pub const fn speed(&self) -> Option<f64> {
        match self.value {
            Some(GimmickValue::Speed(speed)) => Some(speed),
            _ => None,
        }
    }
}

/// A fully assembled chart.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chart {
    /// Header metadata of the chart file.
    pub metadata: ChartMetadata,
    /// All plain notes, in source order. Holds and masks live in their own
    /// collections.
    pub notes: Vec<Note>,
    /// All mask notes, in source order.
    pub masks: Vec<Note>,
    /// All hold note chains, in source order of their starts.
    pub hold_notes: Vec<HoldNote>,
    /// BPM change gimmicks, in source order.
    pub bpm_gimmicks: Vec<Gimmick>,
    /// Time signature change gimmicks, in source order.
    pub time_signature_gimmicks: Vec<Gimmick>,
    /// Hi-speed gimmicks, in source order.
    pub hi_speed_gimmicks: Vec<Gimmick>,
    /// Stop start/end gimmicks, in source order.
    pub stop_gimmicks: Vec<Gimmick>,
    /// Reverse effect/note-end gimmicks, in source order.
    pub reverse_gimmicks: Vec<Gimmick>,
    /// The chart terminator. The first one seen wins.
    pub end_of_chart: Option<ChartObject>,
    /// The tempo map merged from BPM and time signature changes. [`None`] when the
    /// chart carries no tempo data at all; timestamping is unavailable then.
    pub tempo_map: Option<TempoMap>,
}
