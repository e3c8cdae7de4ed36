//! # w2vgrep Search
//!
//! Streams text line by line and reports lines containing a token that is
//! semantically close to one of the queries.
//!
//! ## Pipeline
//!
//! ```text
//! input ──> LineSource ──> tokens (Unicode words)
//!                              │
//!                              ├──> exact text match       ──┐
//!                              └──> SimilarityEngine > t    ─┤
//!                                                            v
//!                      ContextRing ──> LineWriter (score, context, line, --)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::io::{self, BufReader};
//! use w2vgrep_search::{AnsiHighlighter, MatchOptions, StreamMatcher, TextLineWriter};
//! use w2vgrep_vector_store::{SimilarityEngine, VectorStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = VectorStore::load("model.bin")?;
//!     let options = MatchOptions::default().with_context(1, 1);
//!     let matcher = StreamMatcher::new(&store, &["king"], options)?;
//!
//!     let mut engine = SimilarityEngine::new();
//!     let mut writer = TextLineWriter::new(io::stdout().lock(), AnsiHighlighter::default());
//!     let input = BufReader::new(io::stdin());
//!     let summary = matcher.run(&mut engine, input, &mut writer, &AnsiHighlighter::default())?;
//!     eprintln!("{} of {} lines matched", summary.matched_lines, summary.lines);
//!     Ok(())
//! }
//! ```

mod context_ring;
mod error;
mod line_source;
mod matcher;
mod options;
mod output;

pub use context_ring::ContextRing;
pub use error::{Result, SearchError};
pub use line_source::{LineSource, NumberedLine, Unscanned};
pub use matcher::{LineMatch, ScanSummary, StreamMatcher, GROUP_SEPARATOR};
pub use options::{MatchOptions, OutputMode, DEFAULT_THRESHOLD};
pub use output::{
    highlight_token, AnsiHighlighter, HighlightTag, Highlighter, LineWriter, PlainHighlighter,
    TextLineWriter,
};
