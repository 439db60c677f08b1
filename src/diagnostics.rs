//! Fancy diagnostics support using `ariadne`.
//!
//! This module converts the line-keyed errors and warnings of the `mer` module into
//! `ariadne::Report`s without modifying the error type definitions. MER problems
//! carry a 1-based source line number; the span of that line is computed here so
//! ariadne can underline it.
//!
//! # Usage Example
//!
//! ```rust
//! use mer_rs::{diagnostics::emit_mer_warnings, mer::parse_mer};
//!
//! let source = "#BODY\n0 0 4\n0 0 2 120.00\n";
//! let output = parse_mer(source).expect("chart must load");
//!
//! // Render every warning with the offending line underlined.
//! emit_mer_warnings("chart.mer", source, &output.warnings);
//! ```

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::mer::{
    MerWarning,
    lex::{LexError, LexWarning},
};

/// Simple source container that holds the filename and source text.
pub struct SimpleSource<'a> {
    /// Name of the source file.
    name: &'a str,
    /// Source text content.
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Create a new source container instance.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Get source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// The byte span of a 1-based source line, without its line terminator. Lines
    /// out of range collapse to an empty span at the end of the text.
    fn line_span(&self, line: usize) -> std::ops::Range<usize> {
        let mut offset = 0;
        for (index, raw) in self.text.split_inclusive('\n').enumerate() {
            if index + 1 == line {
                let content = raw.trim_end_matches(['\n', '\r']);
                return offset..offset + content.len();
            }
            offset += raw.len();
        }
        self.text.len()..self.text.len()
    }
}

/// Trait for converting MER problems to `ariadne::Report`.
pub trait ToAriadne {
    /// Convert this problem to an ariadne report over `src`.
    fn to_report<'a>(&self, src: &SimpleSource<'a>)
    -> Report<'a, (String, std::ops::Range<usize>)>;
}

/// Helper to build a styled ariadne `Report` consistently.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: std::ops::Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, std::ops::Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

impl ToAriadne for LexError {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let line = match self {
            Self::MalformedNumber { line, .. } | Self::ExpectedField { line, .. } => *line,
        };
        build_report(
            src,
            ReportKind::Error,
            src.line_span(line),
            "lex error",
            self,
            Color::Red,
        )
    }
}

impl ToAriadne for LexWarning {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        let line = match self {
            Self::UnknownObjectId { line, .. } | Self::UnknownNoteType { line, .. } => *line,
        };
        build_report(
            src,
            ReportKind::Warning,
            src.line_span(line),
            "lex warning",
            self,
            Color::Yellow,
        )
    }
}

impl ToAriadne for MerWarning {
    fn to_report<'a>(
        &self,
        src: &SimpleSource<'a>,
    ) -> Report<'a, (String, std::ops::Range<usize>)> {
        match self {
            Self::Lex(lex) => lex.to_report(src),
            // Assembly and timing problems are keyed by chart position, not by a
            // source line; report them against the whole file.
            Self::Parse(_) | Self::Timing(_) => build_report(
                src,
                ReportKind::Warning,
                0..0,
                "load warning",
                self,
                Color::Yellow,
            ),
        }
    }
}

/// Convenience method: batch render a [`MerWarning`] list to the terminal.
pub fn emit_mer_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a MerWarning>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for warning in warnings {
        let report = warning.to_report(&simple);
        let _ = report.print((name.to_string(), ariadne_source.clone()));
    }
}

/// Collect `ariadne::Report` instances for a [`MerWarning`] list without printing.
///
/// Useful in tests to verify diagnostics can be generated while keeping test output
/// clean.
#[must_use]
pub fn collect_mer_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a MerWarning>,
) -> Vec<Report<'a, (String, std::ops::Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings
        .into_iter()
        .map(|warning| warning.to_report(&simple))
        .collect()
}
