extern crate clap;
use clap::*;

mod cmd_mergetree;

fn main() -> anyhow::Result<()> {
    let app = Command::new("mergetree")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`mergetree` - Merge local alignment segments into composite alignments")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v info, -vv debug)"),
        )
        .subcommand(cmd_mergetree::chain::make_subcommand())
        .subcommand(cmd_mergetree::score::make_subcommand())
        .subcommand(cmd_mergetree::stats::make_subcommand())
        .subcommand(cmd_mergetree::dot::make_subcommand())
        .after_help(
            r###"Subcommands:

* chain - Best chain of BLAST tabular hits per query/subject/strand
* score - Score an ordered chain of segments
* stats - Build the DAG from segments and report its shape
* dot   - Build the DAG from segments and export it to Graphviz

Segment files are tab separated:
    q_start  q_end  s_start  s_end  strand  [mismatches]

"###,
        );

    let matches = app.get_matches();

    env_logger::Builder::new()
        .filter_level(match matches.get_count("verbose") {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Check which subcomamnd the user ran...
    match matches.subcommand() {
        Some(("chain", sub_matches)) => cmd_mergetree::chain::execute(sub_matches),
        Some(("score", sub_matches)) => cmd_mergetree::score::execute(sub_matches),
        Some(("stats", sub_matches)) => cmd_mergetree::stats::execute(sub_matches),
        Some(("dot", sub_matches)) => cmd_mergetree::dot::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
