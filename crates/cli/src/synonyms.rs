use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use w2vgrep_search::DEFAULT_THRESHOLD;
use w2vgrep_vector_store::{similar_words, Neighbor, VectorStore, VectorStoreError};

use crate::config;
use crate::patterns;

#[derive(Parser, Debug)]
#[command(name = "w2v-synonyms")]
#[command(about = "List model words similar to a query", long_about = None)]
#[command(version)]
pub(crate) struct SynonymsCli {
    /// Query word
    #[arg(required_unless_present = "pattern_file")]
    pub(crate) query: Option<String>,

    /// Path to the word2vec model (.bin or .8int.bin)
    #[arg(short = 'm', long = "model_path")]
    pub(crate) model_path: Option<PathBuf>,

    /// Minimum similarity to list a word
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub(crate) threshold: f64,

    /// Lowercase queries before lookup
    #[arg(short, long)]
    pub(crate) ignore_case: bool,

    /// Read queries from a file, one per line
    #[arg(short = 'f', long = "file")]
    pub(crate) pattern_file: Option<PathBuf>,

    /// Print bare words, the query first
    #[arg(short, long)]
    pub(crate) only_matching: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub(crate) verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub(crate) quiet: bool,
}

pub(crate) fn run(cli: SynonymsCli) -> Result<()> {
    let queries = patterns::collect_queries(cli.query.as_deref(), cli.pattern_file.as_deref())?;
    let model_path = config::resolve_model_path(cli.model_path.clone())?;
    let store = VectorStore::load(&model_path)
        .with_context(|| format!("Failed to load model {}", model_path.display()))?;

    let mut out = BufWriter::new(io::stdout().lock());
    match write_listings(&store, &cli, &queries, &mut out).and_then(|()| out.flush()) {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other.context("Failed to write output"),
    }
}

fn write_listings<W: Write>(
    store: &VectorStore,
    cli: &SynonymsCli,
    queries: &[String],
    out: &mut W,
) -> io::Result<()> {
    for raw in queries {
        let query = raw.trim();
        if query.is_empty() {
            continue;
        }
        let query = if cli.ignore_case {
            query.to_lowercase()
        } else {
            query.to_string()
        };

        match similar_words(store, &query, cli.threshold) {
            Ok(neighbors) => {
                write_neighbors(out, &query, cli.threshold, &neighbors, cli.only_matching)?
            }
            Err(VectorStoreError::NotFound(_)) => {
                log::warn!("'{query}' not found in model");
            }
            Err(err) => log::warn!("Skipping '{query}': {err}"),
        }
    }
    Ok(())
}

fn write_neighbors<W: Write>(
    out: &mut W,
    query: &str,
    threshold: f64,
    neighbors: &[Neighbor],
    bare: bool,
) -> io::Result<()> {
    if bare {
        writeln!(out, "{query}")?;
        for neighbor in neighbors {
            writeln!(out, "{}", neighbor.word)?;
        }
    } else {
        writeln!(out, "Words similar to '{query}' with similarity >= {threshold:.2}:")?;
        for neighbor in neighbors {
            writeln!(out, "{} {:.4}", neighbor.word, neighbor.score)?;
        }
    }
    Ok(())
}
