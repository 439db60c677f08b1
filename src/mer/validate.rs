//! Post-load consistency checks.
//!
//! These run only after timeline resolution has been attempted. A failed check does
//! not invalidate the in-memory chart by itself; the caller decides whether to
//! proceed, retry or refuse to start gameplay.

use thiserror::Error;

use crate::mer::model::Chart;

/// A reason the loaded chart is not ready for gameplay.
///
/// Checks run in this declaration order and the first failing one is reported.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadError {
    /// No audio clip is bound; the duration provider reported nothing.
    #[error("audio clip not found")]
    MissingAudio,
    /// The chart has no end-of-chart note.
    #[error("chart is missing end of chart note")]
    MissingEndOfChart,
    /// The last note is stamped past the end of the audio.
    #[error("chart is longer than audio")]
    ChartLongerThanAudio,
    /// The chart metadata carries no music file path.
    #[error("music file path is missing")]
    MissingMusicFilePath,
    /// The chart has no BPM and time signature data, so no timeline exists.
    #[error("chart is missing BPM and time signature data")]
    MissingTempoData,
}

/// Checks a resolved chart for the common load errors.
///
/// `audio_duration_seconds` comes from the external audio layer; [`None`] means no
/// clip is bound. The duration is compared against the last note's stamped time
/// (converted to milliseconds); the comparison is skipped while times are
/// unresolved, in which case the missing tempo data check reports instead.
///
/// # Errors
///
/// Returns the first failing [`LoadError`] in priority order.
pub fn check_load(chart: &Chart, audio_duration_seconds: Option<f64>) -> Result<(), LoadError> {
    let Some(audio_duration_seconds) = audio_duration_seconds else {
        return Err(LoadError::MissingAudio);
    };

    if chart.end_of_chart.is_none() {
        return Err(LoadError::MissingEndOfChart);
    }

    let last_note_time = chart.notes.last().and_then(|note| note.time);
    if last_note_time.is_some_and(|time| time > audio_duration_seconds * 1000.0) {
        return Err(LoadError::ChartLongerThanAudio);
    }

    if chart
        .metadata
        .music_file_path
        .as_deref()
        .is_none_or(str::is_empty)
    {
        return Err(LoadError::MissingMusicFilePath);
    }

    if chart.tempo_map.is_none() {
        return Err(LoadError::MissingTempoData);
    }

    Ok(())
}
