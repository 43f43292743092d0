use clap::*;

use chimr::libs::detect::{self, Mode};

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("detect")
        .about("Flags chimeric reads")
        .after_help(
            r###"
A read is chimeric when some window of its coverage profile drops below
max(threshold * baseline, 1). The baseline is the mean window coverage of all
reads times the multiplier. Reads shorter than window * (2 * flank + 1) are
never flagged, where flank = (max-jump + max-overhang) / window.

Modes:
* coverage - the coverage drop-out test
* cluster  - reads whose overlap partners do not form one connected group
* both     - coverage drop-outs confirmed by the cluster test

Names of chimeric reads are written one per line, in input order.

Examples:
1. Flag chimeras from minimap2 overlaps:
   chimr detect reads.fa.gz ovlp.paf -o chimeras.lst

2. Tune for short test data:
   chimr detect reads.tsv ovlp.paf --max-jump 50 --max-overhang 50

"###,
        );
    let cmd = super::input_args(cmd);
    super::coverage_args(cmd)
        .arg(
            Arg::new("mode")
                .long("mode")
                .num_args(1)
                .default_value("coverage")
                .value_parser(["coverage", "cluster", "both"])
                .help("Which test flags a read"),
        )
        .arg(super::parallel_arg())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let params = super::coverage_params(args)?;
    let mode: Mode = args.get_one::<String>("mode").unwrap().parse()?;
    super::init_pool(args)?;

    let mut writer = chimr::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    let (store, index) = super::load_inputs(args)?;
    let detection = detect::run(&store, &index, &params, mode)?;
    log::info!("Estimated coverage: {:.2}", detection.coverage);

    //----------------------------
    // Output
    //----------------------------
    for (id, name, _) in store.iter() {
        if detection.is_chimeric(id) {
            writer.write_fmt(format_args!("{}\n", name))?;
        }
    }

    Ok(())
}
