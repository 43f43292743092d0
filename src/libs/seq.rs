use anyhow::{anyhow, bail};
use indexmap::IndexMap;
use std::io::BufRead;

/// Dense identifier of a read, its insertion index in the [`ReadStore`].
pub type ReadId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeqFormat {
    Fasta,
    Fastq,
    Sizes,
}

/// Sniffs the format from the first byte of the stream without consuming it.
pub fn detect_format<R: BufRead + ?Sized>(reader: &mut R) -> anyhow::Result<SeqFormat> {
    let buf = reader.fill_buf()?;
    let format = match buf.first() {
        Some(b'>') => SeqFormat::Fasta,
        Some(b'@') => SeqFormat::Fastq,
        _ => SeqFormat::Sizes,
    };
    Ok(format)
}

/// Names and lengths of all reads, in input order.
#[derive(Debug, Clone, Default)]
pub struct ReadStore {
    len_of: IndexMap<String, usize>,
}

impl ReadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a read, returning its id. A name seen before keeps its id.
    ///
    /// ```
    /// let mut store = chimr::libs::seq::ReadStore::new();
    /// store.insert("read0", 1000);
    /// store.insert("read1", 250);
    /// assert_eq!(store.id_of("read1"), Some(1));
    /// assert_eq!(store.len_of(1), 250);
    /// ```
    pub fn insert(&mut self, name: &str, len: usize) -> ReadId {
        let (id, _) = self.len_of.insert_full(name.to_string(), len);
        id
    }

    pub fn len(&self) -> usize {
        self.len_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len_of.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<ReadId> {
        self.len_of.get_index_of(name)
    }

    pub fn name_of(&self, id: ReadId) -> &str {
        self.len_of
            .get_index(id)
            .map(|(name, _)| name.as_str())
            .unwrap_or_else(|| panic!("read {} is missing from the read store", id))
    }

    pub fn len_of(&self, id: ReadId) -> usize {
        self.len_of
            .get_index(id)
            .map(|(_, len)| *len)
            .unwrap_or_else(|| panic!("read {} is missing from the read store", id))
    }

    /// `(id, name, length)` in input order.
    pub fn iter(&self) -> impl Iterator<Item = (ReadId, &str, usize)> + '_ {
        self.len_of
            .iter()
            .enumerate()
            .map(|(id, (name, len))| (id, name.as_str(), *len))
    }

    /// Loads reads from FASTA, FASTQ or a `name<TAB>length` table.
    ///
    /// ```
    /// let store = chimr::libs::seq::ReadStore::from_path("tests/chimr/reads.tsv").unwrap();
    /// assert_eq!(store.len(), 6);
    /// assert_eq!(store.id_of("s"), Some(5));
    /// assert_eq!(store.len_of(5), 250);
    /// ```
    pub fn from_path(input: &str) -> anyhow::Result<Self> {
        let mut reader = crate::reader(input)?;
        let mut store = Self::new();

        match detect_format(&mut reader)? {
            SeqFormat::Fasta => {
                let mut fa_in = noodles_fasta::io::Reader::new(reader);
                for result in fa_in.records() {
                    let record = result?;
                    let name = String::from_utf8(record.name().into())?;
                    store.insert(&name, record.sequence().len());
                }
            }
            SeqFormat::Fastq => {
                let mut fq_in = noodles_fastq::io::Reader::new(reader);
                for result in fq_in.records() {
                    let record = result?;
                    let name = String::from_utf8(record.name().to_vec())?;
                    store.insert(&name, record.sequence().len());
                }
            }
            SeqFormat::Sizes => {
                for (i, line) in reader.lines().enumerate() {
                    let line = line?;
                    if line.trim().is_empty() || line.starts_with('#') {
                        continue;
                    }
                    let fields: Vec<&str> = line.split('\t').collect();
                    if fields.len() < 2 {
                        bail!("Invalid size line {}: expected name and length", i + 1);
                    }
                    let len = fields[1]
                        .trim()
                        .parse::<usize>()
                        .map_err(|_| anyhow!("Invalid length on line {}: {}", i + 1, fields[1]))?;
                    store.insert(fields[0], len);
                }
            }
        }

        log::info!("Loaded {} reads from {}", store.len(), input);
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn load(content: &str, file_name: &str) -> ReadStore {
        let dir = tempdir().unwrap();
        let path = dir.path().join(file_name);
        {
            let mut file = std::fs::File::create(&path).unwrap();
            write!(file, "{}", content).unwrap();
        }
        ReadStore::from_path(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn test_detect_format() {
        let mut fa = std::io::Cursor::new(b">r1\nACGT\n".to_vec());
        assert_eq!(detect_format(&mut fa).unwrap(), SeqFormat::Fasta);
        // Nothing consumed
        assert_eq!(fa.position(), 0);

        let mut fq = std::io::Cursor::new(b"@r1\nACGT\n+\nIIII\n".to_vec());
        assert_eq!(detect_format(&mut fq).unwrap(), SeqFormat::Fastq);

        let mut sizes = std::io::Cursor::new(b"r1\t4\n".to_vec());
        assert_eq!(detect_format(&mut sizes).unwrap(), SeqFormat::Sizes);
    }

    #[test]
    fn test_load_fasta() {
        let store = load(">r1\nACGT\n>r2\nACGTACGT\n", "reads.fa");
        assert_eq!(store.len(), 2);
        assert_eq!(store.id_of("r2"), Some(1));
        assert_eq!(store.len_of(0), 4);
        assert_eq!(store.len_of(1), 8);
    }

    #[test]
    fn test_load_fastq() {
        let store = load("@r1\nACGTA\n+\nIIIII\n@r2\nAC\n+\nII\n", "reads.fq");
        assert_eq!(store.len(), 2);
        assert_eq!(store.name_of(0), "r1");
        assert_eq!(store.len_of(0), 5);
        assert_eq!(store.len_of(1), 2);
    }

    #[test]
    fn test_load_sizes() {
        let store = load("# comment\nr1\t1000\n\nr2\t250\n", "reads.tsv");
        let reads: Vec<_> = store.iter().collect();
        assert_eq!(reads, vec![(0, "r1", 1000), (1, "r2", 250)]);
    }

    #[test]
    fn test_load_sizes_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.tsv");
        std::fs::write(&path, "r1\tlong\n").unwrap();
        let err = ReadStore::from_path(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_insert_keeps_id() {
        let mut store = ReadStore::new();
        assert_eq!(store.insert("r1", 10), 0);
        assert_eq!(store.insert("r2", 20), 1);
        assert_eq!(store.insert("r1", 30), 0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.len_of(0), 30);
    }
}
