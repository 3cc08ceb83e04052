use super::{add_scoring_args, read_segments, scoring_from};
use clap::{Arg, ArgAction, ArgMatches, Command};
use mergetree::libs::merge::MergeTree;
use std::io::Write;

pub fn make_subcommand() -> Command {
    let cmd = Command::new("dot")
        .about("Build the DAG from segments and export it")
        .after_help(
            r###"
Without --text, writes Graphviz DOT. Edges on the best chain are bold.

Examples:
  mergetree dot segments.tsv | dot -Tpng -o dag.png
  mergetree dot segments.tsv --text
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
            Arg::new("text")
                .long("text")
                .action(ArgAction::SetTrue)
                .help("Indented text instead of DOT"),
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

    let segments = read_segments(infile)?;
    let mut tree = MergeTree::new(scoring_from(args));
    tree.add_segments(&segments)?;
    tree.search(false);

    let out = if args.get_flag("text") {
        tree.to_text()
    } else {
        tree.to_dot()
    };

    let mut writer = intspan::writer(outfile);
    writer.write_all(out.as_bytes())?;

    Ok(())
}
