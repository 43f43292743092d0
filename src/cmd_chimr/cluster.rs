use clap::*;
use rayon::prelude::*;

use chimr::libs::cluster;
use chimr::libs::seq::ReadId;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("cluster")
        .about("Groups the overlap partners of reads")
        .after_help(
            r###"
For each read, partners that overlap each other are merged into groups.
A read whose partners fall into a number of groups other than one is
reported as chimeric, including reads without any partner.

Output:

    name<TAB>groups<TAB>chimeric|normal

Examples:
1. All reads:
   chimr cluster reads.fa ovlp.paf

2. Selected reads:
   chimr cluster reads.fa ovlp.paf --read read7 --read read9

"###,
        );
    super::input_args(cmd)
        .arg(
            Arg::new("read")
                .long("read")
                .short('r')
                .num_args(1)
                .action(ArgAction::Append)
                .help("Only test this read; can be repeated"),
        )
        .arg(super::parallel_arg())
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    super::init_pool(args)?;
    let mut writer = chimr::writer(args.get_one::<String>("outfile").unwrap())?;

    let (store, index) = super::load_inputs(args)?;

    let reads: Vec<ReadId> = match args.get_many::<String>("read") {
        Some(names) => names
            .map(|name| {
                store
                    .id_of(name)
                    .ok_or_else(|| anyhow::anyhow!("read {} is not in the read store", name))
            })
            .collect::<anyhow::Result<_>>()?,
        None => store.iter().map(|(id, _, _)| id).collect(),
    };

    let results: Vec<(ReadId, usize)> = reads
        .par_iter()
        .map(|&id| -> anyhow::Result<(ReadId, usize)> {
            Ok((id, cluster::count_clusters(id, &index)?))
        })
        .collect::<anyhow::Result<_>>()?;

    for (id, groups) in results {
        let status = if groups != 1 { "chimeric" } else { "normal" };
        writer.write_fmt(format_args!(
            "{}\t{}\t{}\n",
            store.name_of(id),
            groups,
            status
        ))?;
    }

    Ok(())
}
