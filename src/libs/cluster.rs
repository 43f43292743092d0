use indexmap::IndexMap;
use rayon::prelude::*;
use std::collections::BTreeSet;

use crate::libs::disjoint_set::DisjointSet;
use crate::libs::overlap::OverlapIndex;
use crate::libs::seq::ReadId;

/// Groups the overlap partners of `read_id` by their own mutual overlaps and returns
/// the number of groups.
///
/// Partners are the distinct extension reads of `read_id`. Two partners join a group
/// when one appears among the other's extensions.
pub fn count_clusters(read_id: ReadId, index: &OverlapIndex) -> anyhow::Result<usize> {
    let mut node_of: IndexMap<ReadId, usize> = IndexMap::new();
    for ovlp in index.get(read_id)? {
        let next = node_of.len();
        node_of.entry(ovlp.ext_id).or_insert(next);
    }

    let mut forest = DisjointSet::new(node_of.len());
    for (&ext_id, &node) in &node_of {
        for ext_ovlp in index.get(ext_id)? {
            if let Some(&other) = node_of.get(&ext_ovlp.ext_id) {
                forest.union(node, other);
            }
        }
    }

    Ok(forest.num_sets())
}

/// True unless the partners of `read_id` form exactly one group.
///
/// A read without partners is reported as chimeric too: nothing ties its
/// neighborhood together.
pub fn is_chimeric(read_id: ReadId, index: &OverlapIndex) -> anyhow::Result<bool> {
    Ok(count_clusters(read_id, index)? != 1)
}

/// Runs the cluster test on every read in `reads`, in parallel.
pub fn detect(reads: &[ReadId], index: &OverlapIndex) -> anyhow::Result<BTreeSet<ReadId>> {
    let flagged: Vec<Option<ReadId>> = reads
        .par_iter()
        .map(|&id| -> anyhow::Result<Option<ReadId>> {
            Ok(is_chimeric(id, index)?.then_some(id))
        })
        .collect::<anyhow::Result<_>>()?;

    Ok(flagged.into_iter().flatten().collect())
}
