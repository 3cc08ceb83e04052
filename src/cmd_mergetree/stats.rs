use super::{add_scoring_args, read_segments, scoring_from};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::info;
use mergetree::libs::merge::MergeTree;
use std::io::Write;

pub fn make_subcommand() -> Command {
    let cmd = Command::new("stats")
        .about("Build the DAG from segments and report its shape")
        .after_help(
            r###"
Output is a two column TSV:

    key         value
    size        segment nodes (duplicates collapse)
    links       edges, root edges included
    leaves      nodes without children
    best_score  score of the best chain
    chain       segments in the best chain

Examples:
  mergetree stats segments.tsv
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
            Arg::new("once")
                .long("once")
                .action(ArgAction::SetTrue)
                .help("Greedy search: stop at the first complete path"),
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
    let once = args.get_flag("once");

    let segments = read_segments(infile)?;
    let mut tree = MergeTree::new(scoring_from(args));
    tree.add_segments(&segments)?;
    info!("{} segments read, {} nodes", segments.len(), tree.size());

    let chain = tree.search(once);
    let best_score = if chain.is_empty() {
        0
    } else {
        tree.score(&chain)?
    };

    let mut writer = intspan::writer(outfile);
    writeln!(writer, "key\tvalue")?;
    writeln!(writer, "size\t{}", tree.size())?;
    writeln!(writer, "links\t{}", tree.links())?;
    writeln!(writer, "leaves\t{}", tree.leaves().len())?;
    writeln!(writer, "best_score\t{}", best_score)?;
    writeln!(writer, "chain\t{}", chain.len())?;

    Ok(())
}
