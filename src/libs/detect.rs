use std::collections::BTreeSet;

use crate::libs::cluster;
use crate::libs::coverage::{self, CoverageParams};
use crate::libs::overlap::OverlapIndex;
use crate::libs::seq::{ReadId, ReadStore};

/// Which heuristics decide that a read is chimeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Coverage drop-out only
    #[default]
    Coverage,
    /// Overlap-partner clustering only
    Cluster,
    /// Coverage drop-out confirmed by clustering
    Both,
}

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coverage" => Ok(Mode::Coverage),
            "cluster" => Ok(Mode::Cluster),
            "both" => Ok(Mode::Both),
            _ => Err(anyhow::anyhow!("Unknown mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub chimeras: BTreeSet<ReadId>,
    /// Baseline coverage of the run
    pub coverage: f64,
}

impl Detection {
    pub fn is_chimeric(&self, id: ReadId) -> bool {
        self.chimeras.contains(&id)
    }
}

pub fn run(
    store: &ReadStore,
    index: &OverlapIndex,
    params: &CoverageParams,
    mode: Mode,
) -> anyhow::Result<Detection> {
    let (by_coverage, coverage) = coverage::detect(store, index, params)?;

    let chimeras = match mode {
        Mode::Coverage => by_coverage,
        Mode::Cluster => {
            let reads: Vec<ReadId> = store.iter().map(|(id, _, _)| id).collect();
            cluster::detect(&reads, index)?
        }
        Mode::Both => {
            let reads: Vec<ReadId> = by_coverage.into_iter().collect();
            let confirmed = cluster::detect(&reads, index)?;
            log::info!(
                "{} of {} coverage drop-outs confirmed by clustering",
                confirmed.len(),
                reads.len()
            );
            confirmed
        }
    };

    Ok(Detection { chimeras, coverage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::overlap::Overlap;

    fn params() -> CoverageParams {
        CoverageParams {
            max_jump: 50,
            max_overhang: 50,
            ..Default::default()
        }
    }

    // r0 and r1 overlap along their full length. r2 joins r3 and r4 end to end,
    // and r3 and r4 share nothing.
    fn fixture() -> (ReadStore, OverlapIndex) {
        let mut store = ReadStore::new();
        for name in ["r0", "r1", "r2", "r3", "r4"] {
            store.insert(name, 1000);
        }
        let mut index = OverlapIndex::for_reads(&store);
        let mut pair = |a: ReadId, a_span: (i64, i64), b: ReadId, b_span: (i64, i64)| {
            index.add(a, Overlap::new(a_span.0, a_span.1, b));
            index.add(b, Overlap::new(b_span.0, b_span.1, a));
        };
        for _ in 0..4 {
            pair(0, (0, 1000), 1, (0, 1000));
        }
        for _ in 0..4 {
            pair(2, (0, 500), 3, (500, 1000));
            pair(2, (500, 1000), 4, (0, 500));
        }
        (store, index)
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("coverage".parse::<Mode>().unwrap(), Mode::Coverage);
        assert_eq!("cluster".parse::<Mode>().unwrap(), Mode::Cluster);
        assert_eq!("both".parse::<Mode>().unwrap(), Mode::Both);
        assert!("all".parse::<Mode>().is_err());
        assert_eq!(Mode::default(), Mode::Coverage);
    }

    #[test]
    fn test_run_coverage() {
        let (store, index) = fixture();
        let detection = run(&store, &index, &params(), Mode::Coverage).unwrap();
        assert!(detection.is_chimeric(2));
        assert!(!detection.is_chimeric(0));
        assert!(!detection.is_chimeric(1));
        assert!(detection.coverage > 0.0);
    }

    #[test]
    fn test_run_cluster() {
        let (store, index) = fixture();
        let detection = run(&store, &index, &params(), Mode::Cluster).unwrap();
        // r2 bridges two groups; r3 and r4 have a single partner each
        assert!(detection.is_chimeric(2));
        assert!(!detection.is_chimeric(0));
        assert!(!detection.is_chimeric(3));
        assert!(!detection.is_chimeric(4));
    }

    #[test]
    fn test_run_both_is_intersection() {
        let (store, index) = fixture();
        let by_coverage = run(&store, &index, &params(), Mode::Coverage).unwrap();
        let by_cluster = run(&store, &index, &params(), Mode::Cluster).unwrap();
        let both = run(&store, &index, &params(), Mode::Both).unwrap();

        let expected: BTreeSet<ReadId> = by_coverage
            .chimeras
            .intersection(&by_cluster.chimeras)
            .copied()
            .collect();
        assert_eq!(both.chimeras, expected);
        assert!(both.is_chimeric(2));
    }
}
