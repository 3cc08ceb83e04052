use super::{add_scoring_args, scoring_from};
use clap::{Arg, ArgAction, ArgMatches, Command};
use fxhash::FxHashMap;
use log::{info, warn};
use mergetree::libs::blast::BlastHit;
use mergetree::libs::merge::{
    MergeTree, Progress, ScoringConfig, Segment, SegmentKey, Strand, INTERRUPT_INTERVAL,
};
use rayon::prelude::*;
use std::io::{BufRead, Write};

pub fn make_subcommand() -> Command {
    let cmd = Command::new("chain")
        .about("Chain BLAST tabular hits into the best composite alignment")
        .after_help(
            r###"
Processing:
  1. Read BLAST tabular hits (-outfmt 6, the 12 default columns).
     A hit with sstart > send lies on the minus strand.
  2. Group hits by (query, subject, strand), keeping input order.
  3. Insert every hit of a group into a merge tree, a DAG whose edges
     connect hits that follow each other on both sequences.
  4. Extract the highest scoring chain:
     Score = sum(block scores) + sum(gap_open + gap_extend * max(q_gap, s_gap))
  5. Write one header line per group, followed by the chained hits:
     #query  subject  strand  score  hits  [partial]

Notes:
  * Duplicate coordinates are chained once.
  * --max-visits caps the node visits spent inserting a group's hits, and
    separately those spent searching its tree. The cap is checked every
    100 visits, so a phase may overrun it by up to 99 visits.
    Groups that hit the cap are marked `partial`.

Examples:
  # Best chain per query/subject pair
  mergetree chain hits.tsv -o chains.tsv

  # Stiffer gaps, fast approximate search
  mergetree chain hits.tsv --gap-open -10 --gap-extend -2 --once
"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("BLAST tabular file, `stdin` for standard input"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .action(ArgAction::SetTrue)
                .help("Greedy search: stop at the first complete path"),
        )
        .arg(
            Arg::new("max_visits")
                .long("max-visits")
                .num_args(1)
                .value_parser(clap::value_parser!(u64))
                .help(format!(
                    "Node visits allowed for inserting, then for searching. Checked every {}",
                    INTERRUPT_INTERVAL
                )),
        )
        .arg(
            Arg::new("min_score")
                .long("min-score")
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64))
                .help("Drop chains scoring below this"),
        );
    add_scoring_args(cmd)
}

pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infile = args.get_one::<String>("infile").unwrap();
    let outfile = args.get_one::<String>("outfile").unwrap();
    let once = args.get_flag("once");
    let max_visits = args.get_one::<u64>("max_visits").copied();
    let min_score = args.get_one::<i64>("min_score").copied();
    let scoring = scoring_from(args);

    let groups = read_groups(infile)?;
    info!("{} query/subject groups", groups.len());

    let results: Vec<ChainResult> = groups
        .par_iter()
        .map(|group| merge_group(group, scoring, once, max_visits))
        .collect::<anyhow::Result<_>>()?;

    let mut writer = intspan::writer(outfile);
    for (group, result) in groups.iter().zip(results) {
        if result.hits.is_empty() {
            continue;
        }
        if min_score.is_some_and(|min| result.score < min) {
            continue;
        }

        write!(
            writer,
            "#{}\t{}\t{}\t{}\t{}",
            group.query,
            group.subject,
            group.strand,
            result.score,
            result.hits.len()
        )?;
        if result.partial {
            write!(writer, "\tpartial")?;
        }
        writeln!(writer)?;

        for idx in result.hits {
            writeln!(writer, "{}", group.lines[idx])?;
        }
    }

    Ok(())
}

struct Group {
    query: String,
    subject: String,
    strand: Strand,
    segments: Vec<Segment>,
    lines: Vec<String>,
}

struct ChainResult {
    score: i64,
    /// Indices into the group's lines
    hits: Vec<usize>,
    partial: bool,
}

fn read_groups(infile: &str) -> anyhow::Result<Vec<Group>> {
    let reader = intspan::reader(infile);
    let mut groups: Vec<Group> = Vec::new();
    let mut index: FxHashMap<(String, String, Strand), usize> = FxHashMap::default();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let hit: BlastHit = match line.parse() {
            Ok(h) => h,
            Err(e) => {
                warn!("Skipping BLAST line: {}", e);
                continue;
            }
        };
        let segment = hit.to_segment();
        if let Err(e) = segment.validate() {
            warn!("Skipping {} vs {}: {}", hit.query, hit.subject, e);
            continue;
        }

        let key = (hit.query.clone(), hit.subject.clone(), hit.strand());
        let idx = *index.entry(key).or_insert_with(|| {
            groups.push(Group {
                query: hit.query.clone(),
                subject: hit.subject.clone(),
                strand: hit.strand(),
                segments: Vec::new(),
                lines: Vec::new(),
            });
            groups.len() - 1
        });
        groups[idx].segments.push(segment);
        groups[idx].lines.push(line);
    }

    Ok(groups)
}

fn merge_group(
    group: &Group,
    scoring: ScoringConfig,
    once: bool,
    max_visits: Option<u64>,
) -> anyhow::Result<ChainResult> {
    let mut tree = MergeTree::new(scoring);

    let mut partial = false;
    set_budget(&mut tree, max_visits);
    let accepted = tree.add_segments(&group.segments)?;
    if tree.is_interrupted() {
        warn!(
            "{} vs {} ({}): insert interrupted, {} of {} hits used",
            group.query,
            group.subject,
            group.strand,
            accepted,
            group.segments.len()
        );
        partial = true;
        tree.reset_interrupted();
    }

    set_budget(&mut tree, max_visits);
    let chain = tree.search(once);
    if tree.is_interrupted() {
        warn!(
            "{} vs {} ({}): search interrupted",
            group.query, group.subject, group.strand
        );
        partial = true;
    }
    let score = tree.score(&chain)?;

    // first line carrying each coordinate set
    let mut first_line: FxHashMap<SegmentKey, usize> = FxHashMap::default();
    for (i, segment) in group.segments.iter().enumerate() {
        first_line.entry(segment.key()).or_insert(i);
    }
    let hits = chain
        .iter()
        .filter_map(|segment| first_line.get(&segment.key()).copied())
        .collect();

    Ok(ChainResult {
        score,
        hits,
        partial,
    })
}

/// Allow `max` more visits from the tree's current total.
fn set_budget(tree: &mut MergeTree, max: Option<u64>) {
    if let Some(max) = max {
        let limit = tree.visits().saturating_add(max);
        tree.set_interrupt_callback(move |progress: &Progress| progress.visits >= limit);
    }
}
