use fxhash::FxHashMap;

use sigcorr_core::TrackError;
use sigcorr_core::models::SignalRecord;

/// Covered range of one chromosome inside a track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromBounds {
    pub chrom: String,
    pub start: u32,
    pub stop: u32,
}

///
/// Per-chromosome bounds of a track, in the order chromosomes were first seen.
///
#[derive(Debug, Clone, Default)]
pub struct ChromIndex {
    entries: Vec<ChromBounds>,
    lookup: FxHashMap<String, usize>,
}

impl ChromIndex {
    pub fn new() -> Self {
        ChromIndex::default()
    }

    /// Widen the bounds of `chrom` to cover `record`.
    pub fn observe(&mut self, chrom: &str, record: &SignalRecord) {
        match self.lookup.get(chrom) {
            Some(&idx) => {
                let bounds = &mut self.entries[idx];
                bounds.start = bounds.start.min(record.start);
                bounds.stop = bounds.stop.max(record.end);
            }
            None => {
                self.lookup.insert(chrom.to_string(), self.entries.len());
                self.entries.push(ChromBounds {
                    chrom: chrom.to_string(),
                    start: record.start,
                    stop: record.end,
                });
            }
        }
    }

    pub fn get(&self, chrom: &str) -> Result<&ChromBounds, TrackError> {
        self.lookup
            .get(chrom)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| TrackError::UnknownChromosome(chrom.to_string()))
    }

    pub fn contains(&self, chrom: &str) -> bool {
        self.lookup.contains_key(chrom)
    }

    pub fn chromosomes(&self) -> Vec<String> {
        self.entries.iter().map(|b| b.chrom.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_observe_keeps_first_seen_order_and_widens() {
        let mut index = ChromIndex::new();
        index.observe("chr2", &SignalRecord::new(100, 200, 1.0));
        index.observe("chr1", &SignalRecord::new(5, 10, 1.0));
        index.observe("chr2", &SignalRecord::new(20, 50, 1.0));
        index.observe("chr2", &SignalRecord::new(300, 400, 1.0));

        assert_eq!(index.chromosomes(), vec!["chr2", "chr1"]);
        let bounds = index.get("chr2").unwrap();
        assert_eq!((bounds.start, bounds.stop), (20, 400));
        assert!(index.get("chrM").is_err());
    }
}
