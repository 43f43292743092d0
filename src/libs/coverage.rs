//! Coverage drop-out detection.
//!
//! Every read long enough to judge gets a profile: the number of overlaps spanning each
//! fixed-size window, with a flank of windows trimmed from both ends. The mean over all
//! profiles, scaled up, is the baseline depth. A read with any window far below the
//! baseline is chimeric.

use fxhash::FxHashMap;
use rayon::prelude::*;
use std::collections::BTreeSet;

use crate::libs::overlap::{Overlap, OverlapIndex};
use crate::libs::seq::{ReadId, ReadStore};

/// Per-window overlap counts of one read.
pub type CoverageProfile = Vec<u32>;

/// Profiles keyed by read. Reads too short to judge have no entry.
pub type ProfileTable = FxHashMap<ReadId, CoverageProfile>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageParams {
    /// Bases per counting window
    pub window: usize,
    /// Fraction of the baseline below which a window is a drop-out
    pub cov_threshold: f64,
    /// Scales the mean window count up to the sequencing depth
    pub depth_multiplier: f64,
    pub max_jump: i64,
    pub max_overhang: i64,
}

impl Default for CoverageParams {
    fn default() -> Self {
        Self {
            window: 100,
            cov_threshold: 0.1,
            depth_multiplier: 2.5,
            max_jump: 1500,
            max_overhang: 1500,
        }
    }
}

impl CoverageParams {
    /// Rejects settings the window arithmetic cannot handle.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.window == 0 {
            anyhow::bail!("window must be positive");
        }
        if self.max_jump < 0 || self.max_overhang < 0 {
            anyhow::bail!(
                "max jump ({}) and max overhang ({}) must not be negative",
                self.max_jump,
                self.max_overhang
            );
        }
        Ok(())
    }

    /// Windows trimmed from each end of a profile.
    pub fn flank(&self) -> usize {
        (self.max_jump.saturating_add(self.max_overhang).max(0) as usize) / self.window
    }

    /// Profile length for a read, `None` if the read is too short to judge.
    pub fn profile_len(&self, read_len: usize) -> Option<usize> {
        let num_windows = read_len / self.window;
        let trimmed = self.flank().saturating_mul(2);
        if num_windows > trimmed {
            Some(num_windows - trimmed)
        } else {
            None
        }
    }

    /// Minimum count a window needs at the given baseline.
    pub fn min_count(&self, coverage: f64) -> f64 {
        (self.cov_threshold * coverage).max(1.0)
    }
}

/// Counts, per window, the overlaps that safely span it.
///
/// `max_jump` bases are trimmed from both ends of each overlap before its span is
/// converted to windows.
pub fn build_profile(
    read_len: usize,
    overlaps: &[Overlap],
    params: &CoverageParams,
) -> Option<CoverageProfile> {
    let len = params.profile_len(read_len)?;
    let window = params.window as i64;
    let flank = params.flank() as i64;

    let mut profile = vec![0u32; len];
    for ovlp in overlaps {
        let start = ovlp.cur_begin.saturating_add(params.max_jump).div_euclid(window);
        let end = ovlp.cur_end.saturating_sub(params.max_jump).div_euclid(window);
        // Only windows inside the profile
        for pos in start.max(flank)..end.min(flank + len as i64) {
            profile[(pos - flank) as usize] += 1;
        }
    }

    Some(profile)
}

/// Builds profiles of all reads in parallel.
pub fn build_profiles(
    store: &ReadStore,
    index: &OverlapIndex,
    params: &CoverageParams,
) -> anyhow::Result<ProfileTable> {
    let reads: Vec<(ReadId, usize)> = store.iter().map(|(id, _, len)| (id, len)).collect();

    reads
        .par_iter()
        .filter(|(_, len)| params.profile_len(*len).is_some())
        .map(|&(id, len)| -> anyhow::Result<(ReadId, CoverageProfile)> {
            let overlaps = index.get(id)?;
            let profile = build_profile(len, overlaps, params).unwrap_or_default();
            Ok((id, profile))
        })
        .collect()
}

/// Mean window count over all profiles, times the depth multiplier.
/// Without any windows the mean is taken as 1.
pub fn estimate_coverage(profiles: &ProfileTable, params: &CoverageParams) -> f64 {
    let (sum, num_windows) = profiles
        .values()
        .flat_map(|profile| profile.iter())
        .fold((0u64, 0u64), |(sum, n), &cov| (sum + cov as u64, n + 1));

    let mean = if num_windows != 0 {
        sum as f64 / num_windows as f64
    } else {
        1.0
    };
    mean * params.depth_multiplier
}

/// True if any window falls below `max(cov_threshold * coverage, 1)`.
pub fn has_dropout(profile: &[u32], coverage: f64, params: &CoverageParams) -> bool {
    let min_count = params.min_count(coverage);
    profile.iter().any(|&cov| (cov as f64) < min_count)
}

/// Reads whose profile shows a drop-out against the baseline.
pub fn classify(
    profiles: &ProfileTable,
    coverage: f64,
    params: &CoverageParams,
) -> BTreeSet<ReadId> {
    profiles
        .par_iter()
        .filter(|(_, profile)| has_dropout(profile, coverage, params))
        .map(|(id, _)| *id)
        .collect()
}

/// Runs the full coverage test, returning the chimeric reads and the baseline.
pub fn detect(
    store: &ReadStore,
    index: &OverlapIndex,
    params: &CoverageParams,
) -> anyhow::Result<(BTreeSet<ReadId>, f64)> {
    log::info!("Detecting chimeric sequences");

    let profiles = build_profiles(store, index, params)?;
    let coverage = estimate_coverage(&profiles, params);
    log::debug!("Estimated coverage: {}", coverage);

    let chimeras = classify(&profiles, coverage, params);
    log::info!("{} sequences were marked as chimeric", chimeras.len());

    Ok((chimeras, coverage))
}
