//! Lexical analyzer of the MER chart format.
//!
//! A `.mer` file is line oriented: metadata header lines of the form `#KEY value` come
//! first, a `#BODY` marker separates them from the body, and every body line is a
//! whitespace-delimited record `measure tick object_id [fields...]`.
//!
//! The lexer walks the file once with an explicit [`Cursor`], fills a
//! [`ChartMetadata`] from the header and materializes the whole body into a
//! [`Token`] list. Malformed numerics abort the load; unknown ids only warn.

pub mod cursor;
pub mod token;

use thiserror::Error;

use self::{cursor::Cursor, token::Token};
use crate::mer::model::ChartMetadata;

/// An error occurred during lexical analysis. Any of these aborts the whole chart
/// load; no partial chart is produced.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum LexError {
    /// A numeric field could not be parsed.
    #[error("malformed number {found:?} at line {line}")]
    MalformedNumber {
        /// The 1-based source line of the field.
        line: usize,
        /// The text that failed to parse.
        found: String,
    },
    /// A structurally required field was missing from a body line.
    #[error("expected {field} at line {line}")]
    ExpectedField {
        /// The 1-based source line of the record.
        line: usize,
        /// What the expected field is.
        field: &'static str,
    },
}

/// A non-fatal problem found during lexical analysis. The offending line is skipped
/// and the load proceeds.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexWarning {
    /// A body line carried an object id the format does not define.
    #[error("unknown object id {id} at line {line}")]
    UnknownObjectId {
        /// The 1-based source line of the record.
        line: usize,
        /// The id found.
        id: u32,
    },
    /// A note record carried a note type id the format does not define.
    #[error("unknown note type id {id} at line {line}")]
    UnknownNoteType {
        /// The 1-based source line of the record.
        line: usize,
        /// The id found.
        id: u32,
    },
}

/// An error occurred when lexical analyzing the MER format file.
pub type Result<T> = std::result::Result<T, LexError>;

/// Output of the lexical analysis phase.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct LexOutput {
    /// Metadata read from the `#KEY value` header.
    pub metadata: ChartMetadata,
    /// The body records, in source order.
    pub tokens: Vec<Token>,
    /// Non-fatal problems found while lexing.
    pub lex_warnings: Vec<LexWarning>,
}

/// Analyzes and converts MER format text into a [`LexOutput`].
///
/// # Errors
///
/// Returns a [`LexError`] when any numeric field in the header or the body is
/// malformed, or a body record is missing a structurally required field.
pub fn parse_lex_tokens(source: &str) -> Result<LexOutput> {
    let mut cursor = Cursor::new(source);
    let metadata = parse_metadata(&mut cursor)?;

    let mut tokens = vec![];
    let mut lex_warnings = vec![];
    while !cursor.is_end() {
        let line = cursor.line_number();
        let Some(content) = cursor.next_line() else {
            break;
        };
        if content.is_empty() {
            continue;
        }
        if let Some(parsed) = Token::parse(content, line, &mut lex_warnings)? {
            tokens.push(parsed);
        }
    }

    Ok(LexOutput {
        metadata,
        tokens,
        lex_warnings,
    })
}

/// Parses only the metadata header of a MER file, stopping at `#BODY` or the end of
/// input. Useful for song-metadata files (`meta.mer`) and for reading display
/// metadata without resolving the timeline.
///
/// # Errors
///
/// Returns a [`LexError`] when a numeric metadata value is malformed.
pub fn parse_meta(source: &str) -> Result<ChartMetadata> {
    let mut cursor = Cursor::new(source);
    parse_metadata(&mut cursor)
}

/// Walks header lines until a `#BODY` marker or the end of input, leaving the cursor
/// on the first body line.
fn parse_metadata(cursor: &mut Cursor<'_>) -> Result<ChartMetadata> {
    let mut metadata = ChartMetadata::default();

    while !cursor.is_end() {
        if cursor.peek_line().is_some_and(|line| line.contains("#BODY")) {
            cursor.next_line();
            break;
        }
        let line_number = cursor.line_number();
        let Some(line) = cursor.next_line() else {
            break;
        };
        let Some(tagged) = line.strip_prefix('#') else {
            continue;
        };
        let (key, value) = match tagged.split_once(char::is_whitespace) {
            Some((key, value)) => (key, value.trim()),
            None => (tagged, ""),
        };
        match key {
            "MUSIC_FILE_PATH" => metadata.music_file_path = Some(value.to_owned()),
            "AUDIO" => metadata.audio = Some(value.to_owned()),
            "OFFSET" => metadata.audio_offset = parse_meta_number(value, line_number)?,
            "MOVIEOFFSET" => metadata.movie_offset = parse_meta_number(value, line_number)?,
            "LEVEL" => metadata.level = parse_meta_number(value, line_number)?,
            "AUTHOR" => metadata.author = Some(value.to_owned()),
            "PREVIEW_TIME" => metadata.preview_time = parse_meta_number(value, line_number)?,
            "PREVIEW_LENGTH" => metadata.preview_length = parse_meta_number(value, line_number)?,
            "TITLE" => metadata.title = Some(value.to_owned()),
            "RUBI_TITLE" => metadata.rubi_title = Some(value.to_owned()),
            "ARTIST" => metadata.artist = Some(value.to_owned()),
            "BPM" => metadata.bpm = Some(value.to_owned()),
            // Unrecognized tags are ignored, the format has editor-specific extras.
            _ => {}
        }
    }

    Ok(metadata)
}

fn parse_meta_number(value: &str, line: usize) -> Result<Option<f64>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| LexError::MalformedNumber {
            line,
            found: value.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mer::command::{ChartPos, GimmickType, GimmickValue, NoteType};

    #[test]
    fn parses_header_then_body() {
        const SRC: &str = "\
#MUSIC_FILE_PATH audio.ogg
#OFFSET 0.52
#MOVIEOFFSET -1.0
#BODY
0 0 2 120.00
0 0 3 4 4
0 0 1 1 0 30 10
";
        let output = parse_lex_tokens(SRC).expect("SRC must be lexed");
        assert_eq!(output.metadata.music_file_path.as_deref(), Some("audio.ogg"));
        assert_eq!(output.metadata.audio_offset, Some(0.52));
        assert_eq!(output.metadata.movie_offset, Some(-1.0));
        assert_eq!(output.tokens.len(), 3);
        assert!(output.lex_warnings.is_empty());

        let Token::Gimmick(bpm) = &output.tokens[0] else {
            panic!("expected a gimmick token");
        };
        assert_eq!(bpm.gimmick_type, GimmickType::BeatsPerMinute);
        assert_eq!(bpm.value, Some(GimmickValue::Bpm(120.0)));

        let Token::Note(note) = &output.tokens[2] else {
            panic!("expected a note token");
        };
        assert_eq!(note.pos, ChartPos::new(0, 0));
        assert_eq!(note.note_type, NoteType::Touch);
    }

    #[test]
    fn meta_only_file_needs_no_body() {
        const SRC: &str = "\
#TITLE Some Song
#RUBI_TITLE サムソング
#ARTIST Somebody
#BPM 90-180
";
        let metadata = parse_meta(SRC).expect("SRC must be lexed");
        assert_eq!(metadata.title.as_deref(), Some("Some Song"));
        assert_eq!(metadata.rubi_title.as_deref(), Some("サムソング"));
        assert_eq!(metadata.artist.as_deref(), Some("Somebody"));
        assert_eq!(metadata.bpm.as_deref(), Some("90-180"));
    }

    #[test]
    fn empty_numeric_metadata_is_absent() {
        let metadata = parse_meta("#PREVIEW_TIME \n#LEVEL 13.7\n").expect("must be lexed");
        assert_eq!(metadata.preview_time, None);
        assert_eq!(metadata.level, Some(13.7));
    }

    #[test]
    fn malformed_metadata_number_is_fatal() {
        let result = parse_meta("#OFFSET abc\n");
        assert_eq!(
            result,
            Err(LexError::MalformedNumber {
                line: 1,
                found: "abc".to_owned(),
            })
        );
    }

    #[test]
    fn blank_body_lines_are_skipped() {
        let output = parse_lex_tokens("#BODY\n\n   \n0 0 2 120.00\n").expect("must be lexed");
        assert_eq!(output.tokens.len(), 1);
    }
}
