use crate::errors::TrackError;
use crate::models::SignalRecord;

/// Stream of records returned by [`SignalTrack::query`].
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<SignalRecord, TrackError>> + 'a>;

///
/// A read-only source of per-base genomic signal.
///
/// Implementors are never mutated by the correlation engine beyond whatever
/// internal cursor state `query` needs, which is why it takes `&mut self`.
///
pub trait SignalTrack {
    /// Identity of the track, used as its row/column label.
    fn label(&self) -> &str;

    /// Chromosomes with data, in a stable order and without duplicates.
    fn chromosomes(&self) -> Vec<String>;

    /// Minimum covered position on `chrom`.
    fn chrom_start(&self, chrom: &str) -> Result<u32, TrackError>;

    /// Maximum covered position on `chrom`.
    fn chrom_stop(&self, chrom: &str) -> Result<u32, TrackError>;

    ///
    /// Records overlapping the inclusive range `[start, stop]` on `chrom`,
    /// ordered by start. Records may extend past either end of the range.
    ///
    fn query(&mut self, chrom: &str, start: u32, stop: u32) -> Result<RecordIter<'_>, TrackError>;
}

impl<T: SignalTrack + ?Sized> SignalTrack for Box<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn chromosomes(&self) -> Vec<String> {
        (**self).chromosomes()
    }

    fn chrom_start(&self, chrom: &str) -> Result<u32, TrackError> {
        (**self).chrom_start(chrom)
    }

    fn chrom_stop(&self, chrom: &str) -> Result<u32, TrackError> {
        (**self).chrom_stop(chrom)
    }

    fn query(&mut self, chrom: &str, start: u32, stop: u32) -> Result<RecordIter<'_>, TrackError> {
        (**self).query(chrom, start, stop)
    }
}
