//! Subcommand modules for the `mergetree` binary.

pub mod chain;
pub mod dot;
pub mod score;
pub mod stats;

use clap::{Arg, ArgMatches, Command};
use mergetree::libs::merge::{ScoringConfig, Segment};
use std::io::BufRead;

/// Scoring flags shared by every subcommand.
pub fn add_scoring_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("match")
            .long("match")
            .default_value("3")
            .allow_negative_numbers(true)
            .value_parser(clap::value_parser!(i64))
            .help("Score per matching column"),
    )
    .arg(
        Arg::new("mismatch")
            .long("mismatch")
            .default_value("-1")
            .allow_negative_numbers(true)
            .value_parser(clap::value_parser!(i64))
            .help("Score per mismatching column"),
    )
    .arg(
        Arg::new("gap_open")
            .long("gap-open")
            .default_value("-1")
            .allow_negative_numbers(true)
            .value_parser(clap::value_parser!(i64))
            .help("Score added for opening a gap between two segments"),
    )
    .arg(
        Arg::new("gap_extend")
            .long("gap-extend")
            .default_value("-1")
            .allow_negative_numbers(true)
            .value_parser(clap::value_parser!(i64))
            .help("Score added per base of the longer gap"),
    )
}

pub fn scoring_from(args: &ArgMatches) -> ScoringConfig {
    ScoringConfig::new(
        *args.get_one::<i64>("match").unwrap(),
        *args.get_one::<i64>("mismatch").unwrap(),
        *args.get_one::<i64>("gap_open").unwrap(),
        *args.get_one::<i64>("gap_extend").unwrap(),
    )
}

/// Segments from a TSV file, skipping blank and `#` lines.
pub fn read_segments(infile: &str) -> anyhow::Result<Vec<Segment>> {
    let reader = intspan::reader(infile);
    let mut segments = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let segment: Segment = line
            .parse()
            .map_err(|e| anyhow::anyhow!("{}:{}: {}", infile, i + 1, e))?;
        segments.push(segment);
    }

    Ok(segments)
}
