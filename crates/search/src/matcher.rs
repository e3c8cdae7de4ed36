//! Line-by-line semantic matching over a text stream.

use std::borrow::Cow;
use std::io::BufRead;

use unicode_segmentation::UnicodeSegmentation;
use w2vgrep_vector_store::{Embedding, EmbeddingLookup, SimilarityEngine, VectorStoreError};

use crate::context_ring::ContextRing;
use crate::error::{Result, SearchError};
use crate::line_source::{LineSource, NumberedLine};
use crate::options::{MatchOptions, OutputMode};
use crate::output::{highlight_token, Highlighter, LineWriter};

/// Printed after each full-mode match group.
pub const GROUP_SEPARATOR: &str = "--";

#[derive(Debug)]
struct Query<'s> {
    text: String,
    /// `None` for out-of-vocabulary queries, which only match exactly.
    embedding: Option<&'s Embedding>,
}

/// First qualifying token of a line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch<'l> {
    /// Token as it appears in the line.
    pub token: &'l str,
    /// Index into [`StreamMatcher::queries`].
    pub query: usize,
    pub score: f64,
}

/// Counters for one [`StreamMatcher::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Lines read, including trailing context.
    pub lines: usize,
    pub matched_lines: usize,
}

pub struct StreamMatcher<'s, S: ?Sized> {
    store: &'s S,
    queries: Vec<Query<'s>>,
    options: MatchOptions,
}

impl<'s, S: EmbeddingLookup + ?Sized> StreamMatcher<'s, S> {
    /// Prepare queries against `store`.
    ///
    /// Queries are trimmed and blank ones dropped; duplicates collapse into
    /// one. Unknown queries are kept for exact matching and logged.
    pub fn new<Q: AsRef<str>>(store: &'s S, queries: &[Q], options: MatchOptions) -> Result<Self> {
        options.validate().map_err(SearchError::InvalidOptions)?;

        let mut prepared: Vec<Query<'s>> = Vec::new();
        for raw in queries {
            let trimmed = raw.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }
            let text = normalize(trimmed, options.ignore_case).into_owned();
            if prepared.iter().any(|q| q.text == text) {
                continue;
            }

            let embedding = lookup(store, &text)?;
            if embedding.is_none() {
                log::warn!("Query '{text}' not found in model; only exact matches will be reported");
            }
            prepared.push(Query { text, embedding });
        }

        if prepared.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        log::debug!(
            "Prepared {} queries ({} in vocabulary)",
            prepared.len(),
            prepared.iter().filter(|q| q.embedding.is_some()).count()
        );

        Ok(Self {
            store,
            queries: prepared,
            options,
        })
    }

    /// Normalized query texts in evaluation order.
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|q| q.text.as_str())
    }

    /// First token in `line` that matches any query.
    ///
    /// Tokens are tried left to right and, per token, queries in order. An
    /// exact (normalized) text match always qualifies; otherwise the score
    /// must be strictly above the threshold, so NaN never matches.
    pub fn find_match<'l>(
        &self,
        engine: &mut SimilarityEngine,
        line: &'l str,
    ) -> Result<Option<LineMatch<'l>>> {
        for token in line.unicode_words() {
            let candidate = normalize(token, self.options.ignore_case);
            // Resolved on first cache miss, then reused for the other queries.
            let mut candidate_vec: Option<Option<&Embedding>> = None;

            for (index, query) in self.queries.iter().enumerate() {
                if *candidate == *query.text {
                    return Ok(Some(LineMatch {
                        token,
                        query: index,
                        score: 1.0,
                    }));
                }
                let Some(query_vec) = query.embedding else {
                    continue;
                };

                let score = match engine.cached(&query.text, &candidate) {
                    Some(score) => score,
                    None => {
                        if candidate_vec.is_none() {
                            candidate_vec = Some(lookup(self.store, &candidate)?);
                        }
                        let Some(Some(vec)) = candidate_vec else {
                            continue;
                        };
                        match engine.score(&query.text, &candidate, query_vec, vec) {
                            Ok(score) => score,
                            Err(err) if err.is_recoverable() => {
                                log::debug!("Skipping '{candidate}' against '{}': {err}", query.text);
                                continue;
                            }
                            Err(err) => return Err(err.into()),
                        }
                    }
                };

                if score > self.options.threshold {
                    return Ok(Some(LineMatch {
                        token,
                        query: index,
                        score,
                    }));
                }
            }
        }
        Ok(None)
    }

    /// Scan `input` to the end, emitting matches through `writer`.
    ///
    /// Output written before a read or write failure stays written.
    pub fn run<R, W, H>(
        &self,
        engine: &mut SimilarityEngine,
        input: R,
        writer: &mut W,
        highlighter: &H,
    ) -> Result<ScanSummary>
    where
        R: BufRead,
        W: LineWriter + ?Sized,
        H: Highlighter + ?Sized,
    {
        let mut source = LineSource::new(input);
        let mut ring = ContextRing::new(if self.options.keeps_context() {
            self.options.before_context
        } else {
            0
        });
        let mut summary = ScanSummary::default();

        while let Some(line) = source.next_line().map_err(SearchError::Read)? {
            match self.find_match(engine, &line.text)? {
                Some(found) => {
                    summary.matched_lines += 1;
                    self.emit(&mut source, &mut ring, &line, &found, writer, highlighter)?;
                }
                None => ring.push(line),
            }
        }
        writer.flush().map_err(SearchError::Write)?;

        summary.lines = source.line_number();
        log::debug!(
            "Scanned {} lines, {} matched; {} similarity computations, {} cached pairs",
            summary.lines,
            summary.matched_lines,
            engine.computations(),
            engine.cache().len()
        );
        Ok(summary)
    }

    fn emit<R, W, H>(
        &self,
        source: &mut LineSource<R>,
        ring: &mut ContextRing,
        line: &NumberedLine,
        found: &LineMatch<'_>,
        writer: &mut W,
        highlighter: &H,
    ) -> Result<()>
    where
        R: BufRead,
        W: LineWriter + ?Sized,
        H: Highlighter + ?Sized,
    {
        let numbered = self.options.line_numbers;
        match self.options.mode {
            OutputMode::OnlyMatching => writer
                .write_line(found.token, line.number, false)
                .map_err(SearchError::Write),
            OutputMode::OnlyLines => {
                let text = highlight_token(&line.text, found.token, highlighter);
                writer
                    .write_line(&text, line.number, numbered)
                    .map_err(SearchError::Write)
            }
            OutputMode::Full => {
                let score = format!("Similarity: {:.4}", found.score);
                writer.write_line(&score, 0, false).map_err(SearchError::Write)?;

                for before in ring.flush() {
                    writer
                        .write_line(&before.text, before.number, numbered)
                        .map_err(SearchError::Write)?;
                }

                let text = highlight_token(&line.text, found.token, highlighter);
                writer
                    .write_line(&text, line.number, numbered)
                    .map_err(SearchError::Write)?;

                for after in source.take_unscanned(self.options.after_context) {
                    let after = after.map_err(SearchError::Read)?;
                    writer
                        .write_line(&after.text, after.number, numbered)
                        .map_err(SearchError::Write)?;
                }

                writer
                    .write_line(GROUP_SEPARATOR, 0, false)
                    .map_err(SearchError::Write)
            }
        }
    }
}

fn normalize(token: &str, ignore_case: bool) -> Cow<'_, str> {
    if ignore_case {
        Cow::Owned(token.to_lowercase())
    } else {
        Cow::Borrowed(token)
    }
}

/// `Ok(None)` for unknown tokens; other store failures propagate.
fn lookup<'s, S: EmbeddingLookup + ?Sized>(
    store: &'s S,
    token: &str,
) -> Result<Option<&'s Embedding>> {
    match store.embedding(token) {
        Ok(embedding) => Ok(Some(embedding)),
        Err(VectorStoreError::NotFound(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
