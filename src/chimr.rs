extern crate clap;
use clap::*;

mod cmd_chimr;

fn main() -> anyhow::Result<()> {
    let app = Command::new("chimr")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`chimr` - Chimeric read detection for long-read assembly")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log progress to stderr; repeat for debug messages"),
        )
        .subcommand(cmd_chimr::detect::make_subcommand())
        .subcommand(cmd_chimr::profile::make_subcommand())
        .subcommand(cmd_chimr::cluster::make_subcommand())
        .after_help(
            r###"Subcommands:

* detect  - Flag chimeric reads
* profile - Per-read coverage profiles and the baseline depth
* cluster - Overlap-partner clustering of reads

Inputs:

* reads    - FASTA, FASTQ or a `name<TAB>length` table, optionally gzipped
* overlaps - all-vs-all overlaps in PAF, e.g. `minimap2 -x ava-ont`

"###,
        );

    let matches = app.get_matches();

    let level = match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match matches.subcommand() {
        Some(("detect", sub_matches)) => cmd_chimr::detect::execute(sub_matches),
        Some(("profile", sub_matches)) => cmd_chimr::profile::execute(sub_matches),
        Some(("cluster", sub_matches)) => cmd_chimr::cluster::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
