use super::{add_scoring_args, read_segments, scoring_from};
use clap::{Arg, ArgMatches, Command};
use mergetree::libs::merge::MergeTree;
use std::io::Write;

pub fn make_subcommand() -> Command {
    let cmd = Command::new("score")
        .about("Score an ordered chain of segments")
        .after_help(
            r###"
The segments are taken as one chain, in file order. Each one must lie
strictly after the previous one on both the query and the subject.

Score = sum(block scores) + sum(gap penalties between neighbours)

Examples:
  mergetree score chain.tsv
  mergetree score chain.tsv --match 1 --mismatch -2
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Segment file, `stdin` for standard input"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        );
    add_scoring_args(cmd)
}

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();

    let chain = read_segments(infile)?;
    let tree = MergeTree::new(scoring_from(args));
    let score = tree.score(&chain)?;

    let mut writer = intspan::writer(outfile);
    writeln!(writer, "{}", score)?;

    Ok(())
}
