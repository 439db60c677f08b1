//! The parser module of MER (`.mer`) rhythm game chart files.
//!
//! Loading a chart is a strictly one-directional pipeline:
//!
//! 1. `lex` turns the raw text into a [`ChartMetadata`](model::ChartMetadata) header
//!    and a typed [`Token`](lex::token::Token) list.
//! 2. `parse` assembles the tokens into a [`Chart`]: plain notes, masks, hold chains
//!    reconstructed from index back-references, and per-kind gimmick collections.
//! 3. `timing` merges BPM and time signature changes into a
//!    [`TempoMap`](timing::TempoMap) and stamps every object with an absolute
//!    millisecond time.
//! 4. `validate` runs the post-load consistency checks.
//!
//! Malformed numerics abort the load with a [`LexError`]; structural oddities
//! (unterminated hold chains, duplicate end-of-chart markers) are tolerated and
//! surface as warnings in [`MerOutput`]. Every load owns its buffers end to end, so
//! loads of different charts can run on different threads freely.

pub mod command;
pub mod lex;
pub mod model;
pub mod parse;
pub mod prelude;
pub mod timing;
pub mod validate;

use thiserror::Error;

use self::{
    lex::{LexError, LexOutput, LexWarning},
    model::Chart,
    parse::{ParseOutput, ParseWarning},
    timing::TimingError,
};

/// A non-fatal problem occurred when loading a MER chart.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MerWarning {
    /// A warning from the lexical analyzer.
    #[error("warn: lex: {0}")]
    Lex(#[from] LexWarning),
    /// A warning from the chart assembler.
    #[error("warn: parse: {0}")]
    Parse(#[from] ParseWarning),
    /// Timeline stamping was unavailable. The chart keeps unresolved times and the
    /// [`validate`] checks report the missing tempo data.
    #[error("warn: timing: {0}")]
    Timing(#[from] TimingError),
}

/// Output of loading a MER chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct MerOutput {
    /// The loaded chart, timeline resolved when tempo data was present.
    pub chart: Chart,
    /// Non-fatal problems found along the way, in pipeline order.
    pub warnings: Vec<MerWarning>,
}

/// Parses a MER chart from source text and resolves its timeline.
///
/// Run [`validate::check_load`] on the result before starting gameplay.
///
/// # Example
///
/// ```
/// use mer_rs::mer::{MerOutput, parse_mer};
///
/// let source = "\
/// #MUSIC_FILE_PATH audio.ogg
/// #BODY
/// 0 0 2 120.00
/// 0 0 3 4 4
/// 1 0 1 1 0 30 10
/// 2 0 1 14
/// ";
/// let MerOutput { chart, warnings } = parse_mer(source).expect("chart must load");
/// assert!(warnings.is_empty());
/// // One 4/4 measure at 120 BPM takes 2000 ms.
/// assert_eq!(chart.notes[0].time, Some(2000.0));
/// ```
///
/// # Errors
///
/// Returns a [`LexError`] when the text is structurally unreadable; no partial chart
/// is produced then.
pub fn parse_mer(source: &str) -> Result<MerOutput, LexError> {
    let LexOutput {
        metadata,
        tokens,
        lex_warnings,
    } = lex::parse_lex_tokens(source)?;

    let ParseOutput {
        mut chart,
        parse_warnings,
    } = Chart::from_tokens(&tokens, metadata);

    let mut warnings: Vec<MerWarning> = lex_warnings.into_iter().map(MerWarning::Lex).collect();
    warnings.extend(parse_warnings.into_iter().map(MerWarning::Parse));

    if let Err(unresolved) = timing::resolve_times(&mut chart) {
        warnings.push(MerWarning::Timing(unresolved));
    }

    Ok(MerOutput { chart, warnings })
}
