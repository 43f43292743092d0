use clap::*;
use itertools::Itertools;

use chimr::libs::coverage;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("profile")
        .about("Reports per-read coverage profiles")
        .after_help(
            r###"
Writes one line per read long enough to be judged:

    name<TAB>length<TAB>min<TAB>chimeric|normal<TAB>counts

`counts` lists the overlaps spanning each window, comma separated. The
estimated baseline coverage is logged with -v.

Examples:
1. chimr profile reads.fa ovlp.paf -v

"###,
        );
    let cmd = super::input_args(cmd);
    super::coverage_args(cmd).arg(super::parallel_arg())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let params = super::coverage_params(args)?;
    super::init_pool(args)?;

    let mut writer = chimr::writer(args.get_one::<String>("outfile").unwrap())?;

    let (store, index) = super::load_inputs(args)?;
    let profiles = coverage::build_profiles(&store, &index, &params)?;
    let baseline = coverage::estimate_coverage(&profiles, &params);
    log::info!("Estimated coverage: {:.2}", baseline);
    log::info!(
        "{} of {} reads are long enough to judge",
        profiles.len(),
        store.len()
    );

    for (id, name, len) in store.iter() {
        let profile = match profiles.get(&id) {
            Some(p) => p,
            None => continue,
        };
        let min = profile.iter().min().copied().unwrap_or(0);
        let status = if coverage::has_dropout(profile, baseline, &params) {
            "chimeric"
        } else {
            "normal"
        };
        writer.write_fmt(format_args!(
            "{}\t{}\t{}\t{}\t{}\n",
            name,
            len,
            min,
            status,
            profile.iter().join(",")
        ))?;
    }

    Ok(())
}
