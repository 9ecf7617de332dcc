//! Shared machinery for line-oriented track formats.
//!
//! A [`TextTrack`] is parametrised by a [`RecordParser`] that turns lines into
//! records. Opening a track streams the file once to build a [`ChromIndex`];
//! each query re-opens the file and streams it again, yielding only the records
//! on the requested chromosome that overlap the requested range. A query stops
//! reading at the last line that holds a record of its chromosome.

use std::io::{BufRead, BufReader, Lines, Read};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fxhash::FxHashMap;

use sigcorr_core::models::SignalRecord;
use sigcorr_core::{RecordIter, SignalTrack, TrackError};

use crate::index::ChromIndex;
use crate::utils::{get_dynamic_reader, track_label};

///
/// Turns the data lines of one text format into records.
///
pub trait RecordParser: Default {
    ///
    /// Parse one non-header line. Returns `Ok(None)` for lines that only change
    /// parser state (e.g. wiggle declarations).
    ///
    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<Option<SignalRecord>, TrackError>;

    /// Chromosome of the record most recently returned by `parse_line`.
    fn chrom(&self) -> &str;
}

/// Lines shared by all UCSC text formats that never carry data.
pub fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return true;
    }
    matches!(trimmed.split_whitespace().next(), Some("track") | Some("browser"))
}

///
/// A track backed by a (possibly gzip-compressed) text file.
///
#[derive(Debug, Clone)]
pub struct TextTrack<P: RecordParser> {
    path: PathBuf,
    label: String,
    index: ChromIndex,
    /// Line number of the last record of each chromosome.
    last_lines: FxHashMap<String, usize>,
    _parser: PhantomData<fn() -> P>,
}

impl<P: RecordParser> TextTrack<P> {
    ///
    /// Open and index a track file.
    ///
    /// # Arguments
    /// - path: path to the file, `.gz` accepted
    ///
    pub fn open<T: AsRef<Path>>(path: T) -> Result<Self, TrackError> {
        let path = path.as_ref().to_path_buf();
        let label = track_label(&path);
        let mut index = ChromIndex::new();
        let mut last_lines = FxHashMap::default();

        let mut records = RecordStream::<P>::new(get_dynamic_reader(&path)?);
        while let Some(record) = records.next() {
            let record = record?;
            let chrom = records.parser.chrom();
            index.observe(chrom, &record);
            match last_lines.get_mut(chrom) {
                Some(last) => *last = records.line_no,
                None => {
                    last_lines.insert(chrom.to_string(), records.line_no);
                }
            }
        }

        if index.is_empty() {
            return Err(TrackError::EmptyTrack(label));
        }

        log::debug!(
            "Indexed {} chromosome(s) in {}",
            index.chromosomes().len(),
            path.display()
        );

        Ok(TextTrack {
            path,
            label,
            index,
            last_lines,
            _parser: PhantomData,
        })
    }
}

impl<P: RecordParser> SignalTrack for TextTrack<P> {
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
        let Some(&last_line) = self.last_lines.get(chrom) else {
            return Err(TrackError::UnknownChromosome(chrom.to_string()));
        };
        let chrom = chrom.to_string();
        let records = RecordStream::<P>::new(get_dynamic_reader(&self.path)?);

        Ok(Box::new(records.filter_with_chrom(last_line, move |record_chrom, record| {
            record_chrom == chrom && record.overlaps(start, stop)
        })))
    }
}

///
/// Every record of a text file, in file order. A failure ends the stream after
/// it has been yielded.
///
struct RecordStream<P: RecordParser> {
    lines: Lines<BufReader<Box<dyn Read>>>,
    line_no: usize,
    parser: P,
    done: bool,
}

impl<P: RecordParser> RecordStream<P> {
    fn new(reader: BufReader<Box<dyn Read>>) -> Self {
        RecordStream {
            lines: reader.lines(),
            line_no: 0,
            parser: P::default(),
            done: false,
        }
    }

    ///
    /// Records accepted by `keep`, read no further than line `last_line`.
    ///
    fn filter_with_chrom<F>(
        mut self,
        last_line: usize,
        keep: F,
    ) -> impl Iterator<Item = Result<SignalRecord, TrackError>>
    where
        F: Fn(&str, &SignalRecord) -> bool,
    {
        std::iter::from_fn(move || {
            loop {
                if self.line_no >= last_line {
                    return None;
                }
                match self.next()? {
                    Ok(record) if keep(self.parser.chrom(), &record) => return Some(Ok(record)),
                    Ok(_) => continue,
                    Err(e) => return Some(Err(e)),
                }
            }
        })
    }
}

impl<P: RecordParser> Iterator for RecordStream<P> {
    type Item = Result<SignalRecord, TrackError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            self.line_no += 1;

            if is_header_line(&line) {
                continue;
            }

            match self.parser.parse_line(&line, self.line_no) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("", true)]
    #[case("   ", true)]
    #[case("# comment", true)]
    #[case("track type=bedGraph name=x", true)]
    #[case("browser position chr1:1-100", true)]
    #[case("chr1\t0\t10\t1.0", false)]
    #[case("trackless\t0\t10\t1.0", false)]
    #[case("fixedStep chrom=chr1 start=1 step=1", false)]
    fn test_is_header_line(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(is_header_line(line), expected);
    }
}
