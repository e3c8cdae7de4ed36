use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use w2vgrep_search::{
    AnsiHighlighter, Highlighter, MatchOptions, PlainHighlighter, ScanSummary, StreamMatcher,
    TextLineWriter, DEFAULT_THRESHOLD,
};
use w2vgrep_vector_store::{SimilarityEngine, VectorStore};

use crate::config;
use crate::flags::{output_mode, ColorFlag};
use crate::patterns;

#[derive(Parser, Debug)]
#[command(name = "w2vgrep")]
#[command(about = "Semantic grep: find lines with words close to a query", long_about = None)]
#[command(version)]
pub(crate) struct GrepCli {
    /// Query word
    #[arg(required_unless_present = "pattern_file")]
    pub(crate) query: Option<String>,

    /// Input file (stdin when omitted)
    pub(crate) input: Option<PathBuf>,

    /// Path to the word2vec model (.bin or .8int.bin)
    #[arg(short = 'm', long = "model_path")]
    pub(crate) model_path: Option<PathBuf>,

    /// Similarity threshold; a token matches when its score is above it
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub(crate) threshold: f64,

    /// Lines to print after each match
    #[arg(short = 'A', long = "after-context", default_value_t = 0)]
    pub(crate) after_context: usize,

    /// Lines to print before each match
    #[arg(short = 'B', long = "before-context", default_value_t = 0)]
    pub(crate) before_context: usize,

    /// Lines to print before and after each match
    #[arg(short = 'C', long = "context", default_value_t = 0)]
    pub(crate) context: usize,

    /// Prefix lines with their line number
    #[arg(short = 'n', long = "line-number")]
    pub(crate) line_number: bool,

    /// Ignore case (word2vec models are case-sensitive)
    #[arg(short, long)]
    pub(crate) ignore_case: bool,

    /// Print only the matched token
    #[arg(short, long)]
    pub(crate) only_matching: bool,

    /// Print only the matched lines
    #[arg(short = 'l', long)]
    pub(crate) only_lines: bool,

    /// Read queries from a file, one per line
    #[arg(short = 'f', long = "file")]
    pub(crate) pattern_file: Option<PathBuf>,

    /// When to highlight matches
    #[arg(long, value_enum, default_value_t = ColorFlag::Auto)]
    pub(crate) color: ColorFlag,

    /// Enable verbose logging
    #[arg(short, long)]
    pub(crate) verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub(crate) quiet: bool,
}

impl GrepCli {
    pub(crate) fn match_options(&self) -> MatchOptions {
        let (before, after) = if self.context > 0 {
            (self.context, self.context)
        } else {
            (self.before_context, self.after_context)
        };
        MatchOptions::default()
            .with_threshold(self.threshold)
            .with_context(before, after)
            .with_ignore_case(self.ignore_case)
            .with_line_numbers(self.line_number)
            .with_mode(output_mode(self.only_matching, self.only_lines))
    }
}

pub(crate) fn run(cli: GrepCli) -> Result<()> {
    let queries = patterns::collect_queries(cli.query.as_deref(), cli.pattern_file.as_deref())?;
    let model_path = config::resolve_model_path(cli.model_path.clone())?;
    let store = VectorStore::load(&model_path)
        .with_context(|| format!("Failed to load model {}", model_path.display()))?;
    let matcher = StreamMatcher::new(&store, &queries, cli.match_options())?;

    let input: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let out = BufWriter::new(io::stdout().lock());

    let mut engine = SimilarityEngine::new();
    let result = if cli.color.enabled() {
        scan(&matcher, &mut engine, input, out, AnsiHighlighter::default())
    } else {
        scan(&matcher, &mut engine, input, out, PlainHighlighter)
    };

    match result {
        Ok(summary) => {
            log::debug!(
                "{} of {} lines matched",
                summary.matched_lines,
                summary.lines
            );
            Ok(())
        }
        Err(err) if err.is_broken_pipe() => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn scan<R, W, H>(
    matcher: &StreamMatcher<'_, VectorStore>,
    engine: &mut SimilarityEngine,
    input: R,
    out: W,
    highlighter: H,
) -> w2vgrep_search::Result<ScanSummary>
where
    R: BufRead,
    W: Write,
    H: Highlighter + Clone,
{
    let mut writer = TextLineWriter::new(out, highlighter.clone());
    matcher.run(engine, input, &mut writer, &highlighter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use w2vgrep_search::OutputMode;

    #[test]
    fn context_flag_sets_both_sides() {
        let cli = GrepCli::parse_from(["w2vgrep", "-A", "1", "-B", "4", "-C", "2", "king"]);
        let options = cli.match_options();
        assert_eq!((options.before_context, options.after_context), (2, 2));
    }

    #[test]
    fn grep_context_meanings() {
        let cli = GrepCli::parse_from(["w2vgrep", "-A", "1", "-B", "3", "king"]);
        let options = cli.match_options();
        assert_eq!(options.before_context, 3);
        assert_eq!(options.after_context, 1);
        assert_eq!(options.threshold, DEFAULT_THRESHOLD);
    }

    #[test]
    fn flags_map_to_options() {
        let cli = GrepCli::parse_from([
            "w2vgrep",
            "--model_path",
            "model.bin",
            "-t",
            "0.55",
            "-n",
            "-i",
            "-o",
            "-l",
            "king",
            "input.txt",
        ]);
        assert_eq!(cli.model_path, Some(PathBuf::from("model.bin")));
        assert_eq!(cli.input, Some(PathBuf::from("input.txt")));

        let options = cli.match_options();
        assert_eq!(options.threshold, 0.55);
        assert!(options.line_numbers);
        assert!(options.ignore_case);
        assert_eq!(options.mode, OutputMode::OnlyMatching);
    }

    #[test]
    fn query_or_pattern_file_is_required() {
        assert!(GrepCli::try_parse_from(["w2vgrep"]).is_err());
        assert!(GrepCli::try_parse_from(["w2vgrep", "-f", "patterns.txt"]).is_ok());
    }
}
