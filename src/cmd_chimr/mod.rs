//! Subcommand modules for the `chimr` binary.

pub mod cluster;
pub mod detect;
pub mod profile;

use clap::{value_parser, Arg, ArgMatches, Command};

use chimr::libs::coverage::CoverageParams;
use chimr::libs::overlap::{self, OverlapIndex};
use chimr::libs::seq::ReadStore;

/// Positional `reads` and `overlaps` shared by all subcommands.
pub fn input_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("reads")
            .required(true)
            .index(1)
            .help("Reads: FASTA, FASTQ or a `name<TAB>length` table"),
    )
    .arg(
        Arg::new("overlaps")
            .required(true)
            .index(2)
            .help("Read-vs-read overlaps in PAF format"),
    )
    .arg(
        Arg::new("outfile")
            .long("outfile")
            .short('o')
            .num_args(1)
            .default_value("stdout")
            .help("Output filename. [stdout] for screen"),
    )
}

pub fn load_inputs(args: &ArgMatches) -> anyhow::Result<(ReadStore, OverlapIndex)> {
    let store = ReadStore::from_path(args.get_one::<String>("reads").unwrap())?;
    let index = overlap::load_paf(args.get_one::<String>("overlaps").unwrap(), &store)?;
    Ok((store, index))
}

/// Options of the coverage test.
pub fn coverage_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("max_jump")
            .long("max-jump")
            .num_args(1)
            .default_value("1500")
            .value_parser(value_parser!(i64))
            .help("Bases trimmed from both ends of an overlap"),
    )
    .arg(
        Arg::new("max_overhang")
            .long("max-overhang")
            .num_args(1)
            .default_value("1500")
            .value_parser(value_parser!(i64))
            .help("Maximum unaligned overhang; with --max-jump sets the flank"),
    )
    .arg(
        Arg::new("window")
            .long("window")
            .num_args(1)
            .default_value("100")
            .value_parser(value_parser!(usize))
            .help("Bases per coverage window"),
    )
    .arg(
        Arg::new("threshold")
            .long("threshold")
            .num_args(1)
            .default_value("0.1")
            .value_parser(value_parser!(f64))
            .help("Fraction of the baseline below which a window is a drop-out"),
    )
    .arg(
        Arg::new("multiplier")
            .long("multiplier")
            .num_args(1)
            .default_value("2.5")
            .value_parser(value_parser!(f64))
            .help("Scales the mean window count to the baseline depth"),
    )
}

pub fn parallel_arg() -> Arg {
    Arg::new("parallel")
        .long("parallel")
        .short('p')
        .num_args(1)
        .default_value("1")
        .value_parser(value_parser!(usize))
        .help("Number of threads for parallel processing")
}

pub fn coverage_params(args: &ArgMatches) -> anyhow::Result<CoverageParams> {
    let params = CoverageParams {
        window: *args.get_one::<usize>("window").unwrap(),
        cov_threshold: *args.get_one::<f64>("threshold").unwrap(),
        depth_multiplier: *args.get_one::<f64>("multiplier").unwrap(),
        max_jump: *args.get_one::<i64>("max_jump").unwrap(),
        max_overhang: *args.get_one::<i64>("max_overhang").unwrap(),
    };
    params.validate()?;
    Ok(params)
}

pub fn init_pool(args: &ArgMatches) -> anyhow::Result<()> {
    let opt_parallel = *args.get_one::<usize>("parallel").unwrap();
    rayon::ThreadPoolBuilder::new()
        .num_threads(opt_parallel)
        .build_global()?;
    Ok(())
}
