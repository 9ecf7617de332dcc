use std::path::Path;

use bigtools::BigWigRead;
use bigtools::utils::reopen::ReopenableFile;

use sigcorr_core::models::SignalRecord;
use sigcorr_core::{RecordIter, SignalTrack, TrackError};

use crate::index::ChromIndex;
use crate::utils::track_label;

fn bigwig_error(e: impl std::fmt::Display) -> TrackError {
    TrackError::BigWig(e.to_string())
}

///
/// A bigWig file read through `bigtools`.
///
/// The chrom table of a bigWig lists every sequence of the assembly, but only
/// chromosomes that actually carry data are reported; their bounds come from a
/// single pass over each chromosome on open.
///
pub struct BigWigTrack {
    label: String,
    reader: BigWigRead<ReopenableFile>,
    index: ChromIndex,
}

impl BigWigTrack {
    pub fn open<T: AsRef<Path>>(path: T) -> Result<Self, TrackError> {
        let path = path.as_ref();
        let label = track_label(path);
        let mut reader = BigWigRead::open_file(&*path.to_string_lossy()).map_err(bigwig_error)?;

        let chroms: Vec<(String, u32)> = reader
            .chroms()
            .iter()
            .map(|c| (c.name.clone(), c.length))
            .collect();

        let mut index = ChromIndex::new();
        for (chrom, length) in chroms {
            for value in reader.get_interval(&chrom, 0, length).map_err(bigwig_error)? {
                let value = value.map_err(bigwig_error)?;
                index.observe(
                    &chrom,
                    &SignalRecord::new(value.start + 1, value.end, f64::from(value.value)),
                );
            }
        }

        if index.is_empty() {
            return Err(TrackError::EmptyTrack(label));
        }

        Ok(BigWigTrack {
            label,
            reader,
            index,
        })
    }
}

impl SignalTrack for BigWigTrack {
    fn label(&self) -> &str {
        &self.label
    }

    fn chromosomes(&self) -> Vec<String> {
        self.index.chromosomes()
    }

    fn chrom_start(&self, chrom: &str) -> Result<u32, TrackError> {
        Ok(self.index.get(chrom)?.start)
    }

    fn chrom_stop(&self, chrom: &str) -> Result<u32, TrackError> {
        Ok(self.index.get(chrom)?.stop)
    }

    fn query(&mut self, chrom: &str, start: u32, stop: u32) -> Result<RecordIter<'_>, TrackError> {
        if !self.index.contains(chrom) {
            return Err(TrackError::UnknownChromosome(chrom.to_string()));
        }

        // bigWig intervals are 0-based half-open
        let values = self
            .reader
            .get_interval(chrom, start.saturating_sub(1), stop)
            .map_err(bigwig_error)?;

        Ok(Box::new(values.map(|value| {
            value
                .map(|v| SignalRecord::new(v.start + 1, v.end, f64::from(v.value)))
                .map_err(bigwig_error)
        })))
    }
}
