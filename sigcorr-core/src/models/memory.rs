use crate::errors::TrackError;
use crate::models::SignalRecord;
use crate::traits::{RecordIter, SignalTrack};

///
/// A labeled track held entirely in memory.
///
/// Chromosomes keep the order in which they were first pushed; records within a
/// chromosome are kept sorted by start.
///
#[derive(Debug, Clone, Default)]
pub struct MemoryTrack {
    label: String,
    chroms: Vec<(String, Vec<SignalRecord>)>,
}

impl MemoryTrack {
    pub fn new(label: impl Into<String>) -> Self {
        MemoryTrack {
            label: label.into(),
            chroms: Vec::new(),
        }
    }

    pub fn push(&mut self, chrom: &str, record: SignalRecord) {
        let chrom_idx = match self.chroms.iter().position(|(name, _)| name == chrom) {
            Some(idx) => idx,
            None => {
                self.chroms.push((chrom.to_string(), Vec::new()));
                self.chroms.len() - 1
            }
        };
        let records = &mut self.chroms[chrom_idx].1;
        let idx = records.partition_point(|r| r.start <= record.start);
        records.insert(idx, record);
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_record(mut self, chrom: &str, start: u32, end: u32, value: f64) -> Self {
        self.push(chrom, SignalRecord::new(start, end, value));
        self
    }

    ///
    /// Create a track with one single-base record per value, starting at `start`.
    ///
    pub fn from_values(label: impl Into<String>, chrom: &str, start: u32, values: &[f64]) -> Self {
        let mut track = MemoryTrack::new(label);
        for (offset, value) in values.iter().enumerate() {
            let pos = start + offset as u32;
            track.push(chrom, SignalRecord::new(pos, pos, *value));
        }
        track
    }

    fn records(&self, chrom: &str) -> Result<&[SignalRecord], TrackError> {
        self.chroms
            .iter()
            .find(|(name, _)| name == chrom)
            .map(|(_, records)| records.as_slice())
            .ok_or_else(|| TrackError::UnknownChromosome(chrom.to_string()))
    }
}

impl SignalTrack for MemoryTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn chromosomes(&self) -> Vec<String> {
        self.chroms
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn chrom_start(&self, chrom: &str) -> Result<u32, TrackError> {
        self.records(chrom)?
            .iter()
            .map(|r| r.start)
            .min()
            .ok_or_else(|| TrackError::UnknownChromosome(chrom.to_string()))
    }

    fn chrom_stop(&self, chrom: &str) -> Result<u32, TrackError> {
        self.records(chrom)?
            .iter()
            .map(|r| r.end)
            .max()
            .ok_or_else(|| TrackError::UnknownChromosome(chrom.to_string()))
    }

    fn query(&mut self, chrom: &str, start: u32, stop: u32) -> Result<RecordIter<'_>, TrackError> {
        let records = self.records(chrom)?;
        Ok(Box::new(
            records
                .iter()
                .filter(move |r| r.overlaps(start, stop))
                .copied()
                .map(Ok),
        ))
    }
}
