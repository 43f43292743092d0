use anyhow::{anyhow, bail};
use fxhash::FxHashMap;
use std::io::BufRead;

use crate::libs::seq::{ReadId, ReadStore};

/// An alignment of the current read against an extension read.
/// `cur_begin` and `cur_end` are 0-based, half-open coordinates on the current read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub cur_begin: i64,
    pub cur_end: i64,
    pub ext_id: ReadId,
}

impl Overlap {
    pub fn new(cur_begin: i64, cur_end: i64, ext_id: ReadId) -> Self {
        Self {
            cur_begin,
            cur_end,
            ext_id,
        }
    }
}

/// Overlaps of each read, keyed by the current read.
#[derive(Debug, Clone, Default)]
pub struct OverlapIndex {
    overlaps_of: FxHashMap<ReadId, Vec<Overlap>>,
}

impl OverlapIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// An index with an empty entry for every read of the store.
    pub fn for_reads(store: &ReadStore) -> Self {
        let mut index = Self::new();
        for (id, _, _) in store.iter() {
            index.overlaps_of.insert(id, Vec::new());
        }
        index
    }

    pub fn add(&mut self, cur: ReadId, overlap: Overlap) {
        self.overlaps_of.entry(cur).or_default().push(overlap);
    }

    /// Overlaps of `id`. A read without an entry is a broken index.
    pub fn get(&self, id: ReadId) -> anyhow::Result<&[Overlap]> {
        self.overlaps_of
            .get(&id)
            .map(|v| v.as_slice())
            .ok_or_else(|| anyhow!("read {} is missing from the overlap index", id))
    }

    /// Number of reads with an entry.
    pub fn len(&self) -> usize {
        self.overlaps_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overlaps_of.is_empty()
    }

    /// Total number of stored overlap records.
    pub fn num_overlaps(&self) -> usize {
        self.overlaps_of.values().map(|v| v.len()).sum()
    }
}

/// The fields of a PAF line needed to index an overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PafRecord {
    pub q_name: String,
    pub q_len: i64,
    pub q_start: i64,
    pub q_end: i64,
    pub t_name: String,
    pub t_len: i64,
    pub t_start: i64,
    pub t_end: i64,
}

impl std::str::FromStr for PafRecord {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('\t').collect();
        if fields.len() < 12 {
            return Err(anyhow!("Invalid PAF line: fewer than 12 columns"));
        }

        let parse_i64 = |s: &str| {
            s.parse::<i64>()
                .map_err(|_| anyhow!("Invalid coordinate: {}", s))
        };

        let paf = PafRecord {
            q_name: fields[0].to_string(),
            q_len: parse_i64(fields[1])?,
            q_start: parse_i64(fields[2])?,
            q_end: parse_i64(fields[3])?,
            t_name: fields[5].to_string(),
            t_len: parse_i64(fields[6])?,
            t_start: parse_i64(fields[7])?,
            t_end: parse_i64(fields[8])?,
        };

        // 0 <= start <= end <= len on both reads
        for (name, len, start, end) in [
            (&paf.q_name, paf.q_len, paf.q_start, paf.q_end),
            (&paf.t_name, paf.t_len, paf.t_start, paf.t_end),
        ] {
            if start < 0 || start > end || end > len {
                bail!(
                    "Invalid PAF range on {}: {}-{} of length {}",
                    name,
                    start,
                    end,
                    len
                );
            }
        }

        Ok(paf)
    }
}

/// Builds the overlap index from PAF records. Each record is indexed on both reads.
pub fn read_paf<R: BufRead>(reader: R, store: &ReadStore) -> anyhow::Result<OverlapIndex> {
    let mut index = OverlapIndex::for_reads(store);

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let paf: PafRecord = line
            .parse()
            .map_err(|e: anyhow::Error| anyhow!("line {}: {}", i + 1, e))?;

        if paf.q_name == paf.t_name {
            continue;
        }

        let q_id = match store.id_of(&paf.q_name) {
            Some(id) => id,
            None => bail!("read {} on line {} is not in the read store", paf.q_name, i + 1),
        };
        let t_id = match store.id_of(&paf.t_name) {
            Some(id) => id,
            None => bail!("read {} on line {} is not in the read store", paf.t_name, i + 1),
        };

        index.add(q_id, Overlap::new(paf.q_start, paf.q_end, t_id));
        index.add(t_id, Overlap::new(paf.t_start, paf.t_end, q_id));
    }

    Ok(index)
}

pub fn load_paf(input: &str, store: &ReadStore) -> anyhow::Result<OverlapIndex> {
    let reader = crate::reader(input)?;
    let index = read_paf(reader, store)?;
    log::info!(
        "Loaded {} overlaps for {} reads from {}",
        index.num_overlaps(),
        index.len(),
        input
    );
    Ok(index)
}
