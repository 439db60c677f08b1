//! Tempo map construction and timeline stamping.
//!
//! BPM and time signature gimmicks merge into a piecewise [`TempoMap`]; every other
//! chart object is then stamped with an absolute millisecond time by integrating
//! from the nearest preceding tempo map entry. All arithmetic is `f64` and the
//! measure-fraction conversion happens as late as possible, so resolving the same
//! chart twice yields bit-identical times.

use itertools::Itertools;
use thiserror::Error;

use crate::mer::{
    command::{ChartPos, GimmickValue, TimeSignature},
    model::{Chart, Gimmick},
};

/// An error occurred when stamping the timeline.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimingError {
    /// The chart carries no BPM or no time signature events, so no tempo map exists
    /// and absolute times cannot be computed. Times stay unset; there is no sentinel.
    #[error("chart has no BPM and time signature data, cannot stamp absolute times")]
    MissingTempoData,
}

/// One breakpoint of the tempo map.
///
/// An entry carries the BPM and time signature *active from* its position, not just
/// the value that changed there, plus its own resolved absolute time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoChange {
    /// The symbolic position of the breakpoint.
    pub pos: ChartPos,
    /// The BPM active from this position on.
    pub bpm: f64,
    /// The time signature active from this position on.
    pub time_signature: TimeSignature,
    /// The absolute time of the breakpoint in milliseconds. Entry 0 is always `0.0`.
    pub time: f64,
}

/// The piecewise function mapping symbolic positions to absolute milliseconds,
/// anchored at BPM and time signature change points.
///
/// Invariants: the entry list is non-empty, strictly increasing in position, and
/// holds at most one entry per distinct position (simultaneous BPM and time
/// signature changes collapse into one entry carrying both).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TempoMap {
    entries: Vec<TempoChange>,
}

/// Integrates time forward from a breakpoint: milliseconds per whole measure are
/// `4 * time_signature_ratio * (60000 / bpm)`.
fn advance(base: &TempoChange, pos: ChartPos) -> f64 {
    let delta = pos.measure_fraction() - base.pos.measure_fraction();
    base.time + delta * 4.0 * base.time_signature.ratio() * (60_000.0 / base.bpm)
}

impl TempoMap {
    /// Merges the raw BPM and time signature gimmick lists into a tempo map.
    ///
    /// Returns [`None`] when either list is empty (or its first element carries no
    /// payload); tempo-dependent timing is unavailable then.
    ///
    /// Entry 0 is seeded with the BPM of the first BPM-list element and the time
    /// signature of the first time-signature-list element, regardless of which kind
    /// the positionally first gimmick is, and always has time `0.0`.
    #[must_use]
    pub fn from_gimmicks(
        bpm_gimmicks: &[Gimmick],
        time_signature_gimmicks: &[Gimmick],
    ) -> Option<Self> {
        let first_bpm = bpm_gimmicks.first()?.bpm()?;
        let first_time_signature = time_signature_gimmicks.first()?.time_signature()?;

        // Stable sort: simultaneous changes keep BPM-before-time-signature order,
        // which the folding below relies on only for determinism, not correctness.
        let merged = bpm_gimmicks
            .iter()
            .chain(time_signature_gimmicks)
            .sorted_by_key(|gimmick| gimmick.pos.total_ticks());

        let mut entries: Vec<TempoChange> = vec![];
        let mut last_bpm = first_bpm;
        let mut last_time_signature = first_time_signature;
        for gimmick in merged {
            let Some(last) = entries.last_mut() else {
                entries.push(TempoChange {
                    pos: gimmick.pos,
                    bpm: first_bpm,
                    time_signature: first_time_signature,
                    time: 0.0,
                });
                continue;
            };
            // A change at an already seen position folds into the previous entry
            // instead of producing a new one.
            let same_pos = last.pos == gimmick.pos;
            match gimmick.value {
                Some(GimmickValue::Bpm(bpm)) => {
                    last_bpm = bpm;
                    if same_pos {
                        last.bpm = bpm;
                    } else {
                        entries.push(TempoChange {
                            pos: gimmick.pos,
                            bpm,
                            time_signature: last_time_signature,
                            time: 0.0,
                        });
                    }
                }
                Some(GimmickValue::TimeSignature(time_signature)) => {
                    last_time_signature = time_signature;
                    if same_pos {
                        last.time_signature = time_signature;
                    } else {
                        entries.push(TempoChange {
                            pos: gimmick.pos,
                            bpm: last_bpm,
                            time_signature,
                            time: 0.0,
                        });
                    }
                }
                // The assembler never routes payload-less gimmicks here.
                _ => {}
            }
        }

        // Accumulate absolute times forward from entry 0.
        let mut base = *entries.first()?;
        for entry in entries.iter_mut().skip(1) {
            entry.time = advance(&base, entry.pos);
            base = *entry;
        }

        Some(Self { entries })
    }

    /// The breakpoints of the map, strictly increasing in position.
    #[must_use]
    pub fn entries(&self) -> &[TempoChange] {
        &self.entries
    }

    /// Computes the absolute time of a symbolic position in milliseconds.
    ///
    /// The base breakpoint is the one with the greatest position *strictly* below
    /// `pos`, falling back to entry 0. This is a per-object linear lookup; object
    /// order never matters for correctness.
    #[must_use]
    pub fn time_at(&self, pos: ChartPos) -> f64 {
        let target = pos.total_ticks();
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.pos.total_ticks() < target)
            .or_else(|| self.entries.first())
            .map_or(0.0, |base| advance(base, pos))
    }
}

/// Builds the chart's tempo map and stamps every timed object: notes, masks, every
/// hold segment, hi-speed/stop/reverse gimmicks and the end-of-chart marker.
///
/// # Errors
///
/// Returns [`TimingError::MissingTempoData`] when no tempo map can be built; in that
/// case no object is stamped and every `time` stays [`None`].
pub fn resolve_times(chart: &mut Chart) -> Result<(), TimingError> {
    chart.tempo_map = TempoMap::from_gimmicks(&chart.bpm_gimmicks, &chart.time_signature_gimmicks);

    let Chart {
        notes,
        masks,
        hold_notes,
        hi_speed_gimmicks,
        stop_gimmicks,
        reverse_gimmicks,
        end_of_chart,
        tempo_map,
        ..
    } = chart;
    let tempo_map = tempo_map.as_ref().ok_or(TimingError::MissingTempoData)?;

    for note in notes.iter_mut().chain(masks.iter_mut()) {
        note.time = Some(tempo_map.time_at(note.pos));
    }
    for chain in hold_notes {
        for segment in &mut chain.segments {
            segment.time = Some(tempo_map.time_at(segment.pos));
        }
    }
    for gimmick in hi_speed_gimmicks
        .iter_mut()
        .chain(stop_gimmicks.iter_mut())
        .chain(reverse_gimmicks.iter_mut())
    {
        gimmick.time = Some(tempo_map.time_at(gimmick.pos));
    }
    if let Some(end_of_chart) = end_of_chart {
        end_of_chart.time = Some(tempo_map.time_at(end_of_chart.pos));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mer::command::GimmickType;

    fn bpm(measure: u32, tick: u32, bpm: f64) -> Gimmick {
        Gimmick {
            pos: ChartPos::new(measure, tick),
            gimmick_type: GimmickType::BeatsPerMinute,
            value: Some(GimmickValue::Bpm(bpm)),
            time: None,
        }
    }

    fn time_sig(measure: u32, tick: u32, numerator: u32, denominator: u32) -> Gimmick {
        Gimmick {
            pos: ChartPos::new(measure, tick),
            gimmick_type: GimmickType::TimeSignature,
            value: Some(GimmickValue::TimeSignature(TimeSignature {
                numerator,
                denominator,
            })),
            time: None,
        }
    }

    #[test]
    fn empty_list_yields_no_map() {
        assert_eq!(TempoMap::from_gimmicks(&[], &[time_sig(0, 0, 4, 4)]), None);
        assert_eq!(TempoMap::from_gimmicks(&[bpm(0, 0, 120.0)], &[]), None);
    }

    #[test]
    fn entry_zero_has_time_zero() {
        let map = TempoMap::from_gimmicks(&[bpm(0, 0, 120.0)], &[time_sig(0, 0, 4, 4)])
            .expect("map must build");
        assert_eq!(map.entries()[0].time, 0.0);
        assert_eq!(map.entries()[0].bpm, 120.0);
    }

    #[test]
    fn one_measure_at_120_bpm_is_2000_ms() {
        let map = TempoMap::from_gimmicks(&[bpm(0, 0, 120.0)], &[time_sig(0, 0, 4, 4)])
            .expect("map must build");
        assert_eq!(map.time_at(ChartPos::new(1, 0)), 2000.0);
        assert_eq!(map.time_at(ChartPos::new(0, 960)), 1000.0);
    }

    #[test]
    fn simultaneous_changes_collapse_into_one_entry() {
        let map = TempoMap::from_gimmicks(
            &[bpm(0, 0, 120.0), bpm(2, 0, 240.0)],
            &[time_sig(0, 0, 4, 4), time_sig(2, 0, 3, 4)],
        )
        .expect("map must build");
        assert_eq!(map.entries().len(), 2);
        let second = map.entries()[1];
        assert_eq!(second.bpm, 240.0);
        assert_eq!(second.time_signature, TimeSignature { numerator: 3, denominator: 4 });
        // Two 4/4 measures at 120 BPM before the change.
        assert_eq!(second.time, 4000.0);
        // After the change one measure is 3/4 at 240 BPM: 750 ms.
        assert_eq!(map.time_at(ChartPos::new(3, 0)), 4750.0);
    }

    #[test]
    fn lookup_uses_strictly_preceding_entry() {
        let map = TempoMap::from_gimmicks(
            &[bpm(0, 0, 120.0), bpm(1, 0, 60.0)],
            &[time_sig(0, 0, 4, 4)],
        )
        .expect("map must build");
        // Exactly on the change: the base entry is the one before it, which lands on
        // the same absolute time.
        assert_eq!(map.time_at(ChartPos::new(1, 0)), 2000.0);
        // Past the change the new BPM applies.
        assert_eq!(map.time_at(ChartPos::new(2, 0)), 6000.0);
    }

    #[test]
    fn carried_values_fill_missing_fields() {
        let map = TempoMap::from_gimmicks(
            &[bpm(0, 0, 120.0)],
            &[time_sig(0, 0, 4, 4), time_sig(1, 0, 7, 8)],
        )
        .expect("map must build");
        assert_eq!(map.entries().len(), 2);
        assert_eq!(map.entries()[1].bpm, 120.0);
        assert_eq!(map.entries()[1].time_signature.ratio(), 0.875);
    }
}
