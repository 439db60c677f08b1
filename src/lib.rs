//! The MER format parser and timeline resolver.
//!
//! MER (`.mer`) is a line-oriented text chart format for ring-based rhythm games. It
//! describes notes, hold note chains, ring masks and tempo gimmicks by symbolic
//! position (measure and tick, 1920 ticks per measure). This crate parses the format
//! and resolves every chart object to an absolute millisecond timestamp, producing
//! the timeline that scoring and rendering layers consume.
//!
//! In detail, our policies are:
//!
//! - Support only UTF-8 (as required `&str` to input).
//! - Parsing and timeline resolution are pure functions over the source text; no
//!   global state, no I/O. Audio playback, rendering and scoring live elsewhere.
//! - Malformed numerics fail the whole load; structural oddities found in shipped
//!   charts (unterminated hold chains, duplicate terminators) are tolerated and
//!   reported as warnings.
//!
//! ```
//! use mer_rs::mer::prelude::*;
//!
//! let source = "\
//! #MUSIC_FILE_PATH audio.ogg
//! #BODY
//! 0 0 2 180.00
//! 0 0 3 4 4
//! 0 0 1 1 0 30 10
//! 1 0 1 14
//! ";
//! let MerOutput { chart, warnings } = parse_mer(source).expect("chart must load");
//! assert!(warnings.is_empty());
//! assert_eq!(check_load(&chart, Some(90.0)), Ok(()));
//! ```

pub mod mer;

#[cfg(feature = "diagnostics")]
pub mod diagnostics;
