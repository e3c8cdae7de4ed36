//! Command-line front ends: `w2vgrep` and `w2v-synonyms`.

use anyhow::Result;
use clap::Parser;

mod config;
mod flags;
mod grep;
mod patterns;
mod synonyms;

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub fn grep_entry() -> Result<()> {
    let cli = grep::GrepCli::parse();
    init_logging(cli.verbose, cli.quiet);
    grep::run(cli)
}

pub fn synonyms_entry() -> Result<()> {
    let cli = synonyms::SynonymsCli::parse();
    init_logging(cli.verbose, cli.quiet);
    synonyms::run(cli)
}
