//! Definitions of chart value types.
//!
//! Types in this module are shared between the [Lex] phase, the [Parse] phase and the
//! output model.
//!
//! [Lex]: crate::mer::lex
//! [Parse]: crate::mer::parse

/// Ticks per measure. This is the fixed subdivision granularity of the MER format.
pub const TICKS_PER_MEASURE: u32 = 1920;

/// A symbolic position on the chart, made of a measure number and a tick offset in
/// `0..1920` within that measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartPos {
    /// The measure where the object is in.
    pub measure: u32,
    /// The tick offset in the measure. Expected to be less than [`TICKS_PER_MEASURE`].
    pub tick: u32,
}

impl ChartPos {
    /// Create a new position.
    #[must_use]
    pub const fn new(measure: u32, tick: u32) -> Self {
        Self { measure, tick }
    }

    /// The absolute tick count from the start of the chart.
    #[must_use]
    pub const fn total_ticks(self) -> u32 {
        self.measure * TICKS_PER_MEASURE + self.tick
    }

    /// Converts this position into a fraction of measures, e.g. tick 960 of measure 1
    /// becomes `1.5`.
    ///
    /// Do this conversion as late as possible. Chaining computations on measure
    /// fractions compounds floating point error, while tick arithmetic is exact.
    #[must_use]
    pub fn measure_fraction(self) -> f64 {
        f64::from(self.total_ticks()) / f64::from(TICKS_PER_MEASURE)
    }
}

impl std::fmt::Display for ChartPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.measure, self.tick)
    }
}

/// A time signature change payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature {
    /// Beats per measure.
    pub numerator: u32,
    /// The note value of one beat.
    pub denominator: u32,
}

impl TimeSignature {
    /// The common 4/4 signature.
    pub const FOUR_FOUR: Self = Self {
        numerator: 4,
        denominator: 4,
    };

    /// The ratio of this signature to a whole measure, `numerator / denominator`.
    #[must_use]
    pub fn ratio(self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The kind of a note object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteType {
    /// A plain touch note.
    Touch,
    /// A snap note flicked away from the center.
    SnapForward,
    /// A snap note flicked towards the center.
    SnapBackward,
    /// A swipe note in clockwise direction.
    SwipeClockwise,
    /// A swipe note in counterclockwise direction.
    SwipeCounterclockwise,
    /// The first segment of a hold note.
    HoldStart,
    /// An interior segment of a hold note.
    HoldSegment,
    /// The last segment of a hold note.
    HoldEnd,
    /// A chain note.
    Chain,
    /// A mask note revealing a part of the ring.
    MaskAdd,
    /// A mask note hiding a part of the ring.
    MaskRemove,
    /// The chart terminator.
    EndChart,
}

/// The bonus effect attached to a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BonusType {
    /// No bonus.
    #[default]
    None,
    /// A bonus note.
    Bonus,
    /// An R-Note.
    RNote,
}

impl NoteType {
    /// Decodes a note type id from a chart body line into the note type and its bonus
    /// effect. Returns [`None`] for ids the format does not define.
    #[must_use]
    pub const fn from_id(id: u32) -> Option<(Self, BonusType)> {
        Some(match id {
            1 => (Self::Touch, BonusType::None),
            2 => (Self::Touch, BonusType::Bonus),
            3 => (Self::SnapForward, BonusType::None),
            4 => (Self::SnapBackward, BonusType::None),
            5 => (Self::SwipeClockwise, BonusType::None),
            6 => (Self::SwipeCounterclockwise, BonusType::None),
            7 => (Self::SwipeClockwise, BonusType::Bonus),
            8 => (Self::SwipeCounterclockwise, BonusType::Bonus),
            9 => (Self::HoldStart, BonusType::None),
            10 => (Self::HoldSegment, BonusType::None),
            11 => (Self::HoldEnd, BonusType::None),
            12 => (Self::MaskAdd, BonusType::None),
            13 => (Self::MaskRemove, BonusType::None),
            14 => (Self::EndChart, BonusType::None),
            16 => (Self::Chain, BonusType::None),
            20 => (Self::Touch, BonusType::RNote),
            21 => (Self::SnapForward, BonusType::RNote),
            22 => (Self::SnapBackward, BonusType::RNote),
            23 => (Self::SwipeClockwise, BonusType::RNote),
            24 => (Self::SwipeCounterclockwise, BonusType::RNote),
            25 => (Self::HoldStart, BonusType::RNote),
            26 => (Self::Chain, BonusType::RNote),
            _ => return None,
        })
    }

    /// Whether this is a mask note ([`MaskAdd`](Self::MaskAdd) or
    /// [`MaskRemove`](Self::MaskRemove)).
    #[must_use]
    pub const fn is_mask(self) -> bool {
        matches!(self, Self::MaskAdd | Self::MaskRemove)
    }
}

/// The sweep direction of a mask note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MaskDirection {
    /// The mask sweeps counterclockwise.
    Counterclockwise,
    /// The mask sweeps clockwise.
    Clockwise,
    /// The mask grows from its center.
    Center,
}

impl MaskDirection {
    /// Decodes a mask direction id from the trailing field of a mask note line.
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        Some(match id {
            0 => Self::Counterclockwise,
            1 => Self::Clockwise,
            2 => Self::Center,
            _ => return None,
        })
    }
}

/// The kind of a gimmick, a non-note chart event altering tempo, time signature,
/// visual speed, stop or scroll-reverse behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GimmickType {
    /// A BPM change.
    BeatsPerMinute,
    /// A time signature change.
    TimeSignature,
    /// A visual scroll speed change.
    HiSpeed,
    /// The start of a scroll-reverse effect.
    ReverseEffectStart,
    /// The end of a scroll-reverse effect.
    ReverseEffectEnd,
    /// The end of the note window affected by a scroll-reverse effect.
    ReverseNoteEnd,
    /// The start of a chart stop.
    StopStart,
    /// The end of a chart stop.
    StopEnd,
}

impl GimmickType {
    /// Decodes an object id from a chart body line. Returns [`None`] for the note
    /// object id (1), the no-op id (0) and ids the format does not define.
    #[must_use]
    pub const fn from_object_id(id: u32) -> Option<Self> {
        Some(match id {
            2 => Self::BeatsPerMinute,
            3 => Self::TimeSignature,
            5 => Self::HiSpeed,
            6 => Self::ReverseEffectStart,
            7 => Self::ReverseEffectEnd,
            8 => Self::ReverseNoteEnd,
            9 => Self::StopStart,
            10 => Self::StopEnd,
            _ => return None,
        })
    }
}

/// The typed payload carried by a gimmick, when its kind has one.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GimmickValue {
    /// Beats per minute, carried by [`GimmickType::BeatsPerMinute`].
    Bpm(f64),
    /// A time signature, carried by [`GimmickType::TimeSignature`].
    TimeSignature(TimeSignature),
    /// A scroll speed multiplier, carried by [`GimmickType::HiSpeed`].
    Speed(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ordering_matches_total_ticks() {
        let a = ChartPos::new(1, 1919);
        let b = ChartPos::new(2, 0);
        assert!(a < b);
        assert_eq!(a.total_ticks() + 1, b.total_ticks());
    }

    #[test]
    fn measure_fraction() {
        assert_eq!(ChartPos::new(1, 960).measure_fraction(), 1.5);
        assert_eq!(ChartPos::new(0, 0).measure_fraction(), 0.0);
    }

    #[test]
    fn note_type_table() {
        assert_eq!(
            NoteType::from_id(9),
            Some((NoteType::HoldStart, BonusType::None))
        );
        assert_eq!(
            NoteType::from_id(25),
            Some((NoteType::HoldStart, BonusType::RNote))
        );
        assert_eq!(NoteType::from_id(15), None);
        assert_eq!(NoteType::from_id(0), None);
    }

    #[test]
    fn gimmick_type_table() {
        assert_eq!(
            GimmickType::from_object_id(2),
            Some(GimmickType::BeatsPerMinute)
        );
        assert_eq!(GimmickType::from_object_id(10), Some(GimmickType::StopEnd));
        assert_eq!(GimmickType::from_object_id(1), None);
        assert_eq!(GimmickType::from_object_id(0), None);
    }
}
