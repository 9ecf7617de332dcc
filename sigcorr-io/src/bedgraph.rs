use sigcorr_core::TrackError;
use sigcorr_core::models::SignalRecord;

use crate::text::{RecordParser, TextTrack};

/// A bedGraph file, indexed on open and streamed on query.
pub type BedGraphTrack = TextTrack<BedGraphParser>;

///
/// Parser for `chrom start end value` lines. Coordinates on disk are 0-based
/// half-open and are converted to 1-based inclusive.
///
#[derive(Debug, Clone, Default)]
pub struct BedGraphParser {
    chrom: String,
}

impl RecordParser for BedGraphParser {
    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<Option<SignalRecord>, TrackError> {
        let mut fields = line.split_whitespace();
        let (Some(chrom), Some(start), Some(end), Some(value)) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(TrackError::parse(line_no, "expected 4 columns: chrom start end value"));
        };

        let start: u32 = start
            .parse()
            .map_err(|_| TrackError::parse(line_no, format!("invalid start: {}", start)))?;
        let end: u32 = end
            .parse()
            .map_err(|_| TrackError::parse(line_no, format!("invalid end: {}", end)))?;
        let value: f64 = value
            .parse()
            .map_err(|_| TrackError::parse(line_no, format!("invalid value: {}", value)))?;

        if end <= start {
            return Err(TrackError::parse(
                line_no,
                format!("end ({}) must be greater than start ({})", end, start),
            ));
        }

        if self.chrom != chrom {
            self.chrom.clear();
            self.chrom.push_str(chrom);
        }

        Ok(Some(SignalRecord::new(start + 1, end, value)))
    }

    fn chrom(&self) -> &str {
        &self.chrom
    }
}
