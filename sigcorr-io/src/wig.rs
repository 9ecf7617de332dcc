use sigcorr_core::TrackError;
use sigcorr_core::models::SignalRecord;

use crate::text::{RecordParser, TextTrack};

/// A wiggle file, indexed on open and streamed on query.
pub type WigTrack = TextTrack<WigParser>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum StepMode {
    Variable { span: u32 },
    Fixed { next: u64, step: u32, span: u32 },
}

///
/// Parser for `variableStep` / `fixedStep` wiggle sections. Wiggle positions
/// are already 1-based; a data item at `p` with span `k` covers `[p, p+k-1]`.
///
#[derive(Debug, Clone, Default)]
pub struct WigParser {
    chrom: String,
    mode: Option<StepMode>,
}

/// Value of `key=` in a declaration line.
fn declaration_field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    line.split_whitespace()
        .filter_map(|token| token.split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

fn parse_field<T: std::str::FromStr>(value: &str, what: &str, line_no: usize) -> Result<T, TrackError> {
    value
        .parse()
        .map_err(|_| TrackError::parse(line_no, format!("invalid {}: {}", what, value)))
}

/// Last base covered by an item at `pos` spanning `span` bases.
fn span_end(pos: u32, span: u32, line_no: usize) -> Result<u32, TrackError> {
    pos.checked_add(span - 1)
        .ok_or_else(|| TrackError::parse(line_no, format!("position {} + span {} overflows", pos, span)))
}

impl WigParser {
    fn declare(&mut self, line: &str, line_no: usize) -> Result<(), TrackError> {
        let chrom = declaration_field(line, "chrom")
            .ok_or_else(|| TrackError::parse(line_no, "declaration without chrom="))?;
        let span = match declaration_field(line, "span") {
            Some(v) => parse_field(v, "span", line_no)?,
            None => 1,
        };
        if span == 0 {
            return Err(TrackError::parse(line_no, "span must be positive"));
        }

        let mode = if line.starts_with("variableStep") {
            StepMode::Variable { span }
        } else {
            let start = declaration_field(line, "start")
                .ok_or_else(|| TrackError::parse(line_no, "fixedStep without start="))?;
            let step = declaration_field(line, "step")
                .ok_or_else(|| TrackError::parse(line_no, "fixedStep without step="))?;
            StepMode::Fixed {
                next: u64::from(parse_field::<u32>(start, "start", line_no)?),
                step: parse_field(step, "step", line_no)?,
                span,
            }
        };

        self.chrom.clear();
        self.chrom.push_str(chrom);
        self.mode = Some(mode);
        Ok(())
    }
}

impl RecordParser for WigParser {
    fn parse_line(&mut self, line: &str, line_no: usize) -> Result<Option<SignalRecord>, TrackError> {
        let line = line.trim();
        if line.starts_with("variableStep") || line.starts_with("fixedStep") {
            self.declare(line, line_no)?;
            return Ok(None);
        }

        match self.mode.as_mut() {
            Some(StepMode::Variable { span }) => {
                let mut fields = line.split_whitespace();
                let (Some(pos), Some(value)) = (fields.next(), fields.next()) else {
                    return Err(TrackError::parse(line_no, "expected: position value"));
                };
                let pos: u32 = parse_field(pos, "position", line_no)?;
                let value: f64 = parse_field(value, "value", line_no)?;
                let end = span_end(pos, *span, line_no)?;
                Ok(Some(SignalRecord::new(pos, end, value)))
            }
            Some(StepMode::Fixed { next, step, span }) => {
                let value: f64 = parse_field(line, "value", line_no)?;
                let start = u32::try_from(*next)
                    .map_err(|_| TrackError::parse(line_no, format!("position {} out of range", next)))?;
                let end = span_end(start, *span, line_no)?;
                *next += u64::from(*step);
                Ok(Some(SignalRecord::new(start, end, value)))
            }
            None => Err(TrackError::parse(
                line_no,
                "data line before any fixedStep/variableStep declaration",
            )),
        }
    }

    fn chrom(&self) -> &str {
        &self.chrom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use sigcorr_core::SignalTrack;
    use std::io::Write;

    fn parse_all(lines: &[&str]) -> Vec<(String, SignalRecord)> {
        let mut parser = WigParser::default();
        let mut out = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            if let Some(record) = parser.parse_line(line, i + 1).unwrap() {
                out.push((parser.chrom().to_string(), record));
            }
        }
        out
    }

    #[rstest]
    fn test_variable_step() {
        let records = parse_all(&["variableStep chrom=chr1 span=5", "11\t1.5", "101 2.0"]);
        assert_eq!(
            records,
            vec![
                ("chr1".to_string(), SignalRecord::new(11, 15, 1.5)),
                ("chr1".to_string(), SignalRecord::new(101, 105, 2.0)),
            ]
        );
    }

    #[rstest]
    fn test_fixed_step_advances_by_step() {
        let records = parse_all(&[
            "fixedStep chrom=chr3 start=400 step=100 span=10",
            "1.0",
            "2.0",
            "fixedStep chrom=chr4 start=1 step=1",
            "3.0",
        ]);
        assert_eq!(
            records,
            vec![
                ("chr3".to_string(), SignalRecord::new(400, 409, 1.0)),
                ("chr3".to_string(), SignalRecord::new(500, 509, 2.0)),
                ("chr4".to_string(), SignalRecord::new(1, 1, 3.0)),
            ]
        );
    }

    #[rstest]
    #[case(&["1.0"])]
    #[case(&["fixedStep chrom=chr1 step=1", "1.0"])]
    #[case(&["variableStep span=2", "1 1.0"])]
    #[case(&["variableStep chrom=chr1", "1"])]
    #[case(&["fixedStep chrom=chr1 start=1 step=1", "n/a"])]
    #[case(&["variableStep chrom=chr1 span=10", "4294967290 1.0"])]
    #[case(&["fixedStep chrom=chr1 start=4294967295 step=1 span=2", "1.0"])]
    #[case(&["fixedStep chrom=chr1 start=4294967295 step=1", "1.0", "2.0"])]
    fn test_malformed_wig(#[case] lines: &[&str]) {
        let mut parser = WigParser::default();
        let failed = lines
            .iter()
            .enumerate()
            .any(|(i, line)| parser.parse_line(line, i + 1).is_err());
        assert!(failed);
    }

    #[rstest]
    fn test_items_ending_at_last_position() {
        let records = parse_all(&[
            "fixedStep chrom=chr1 start=4294967295 step=100",
            "1.0",
            "variableStep chrom=chr2 span=6",
            "4294967290 2.0",
        ]);
        assert_eq!(
            records,
            vec![
                ("chr1".to_string(), SignalRecord::new(u32::MAX, u32::MAX, 1.0)),
                ("chr2".to_string(), SignalRecord::new(4294967290, u32::MAX, 2.0)),
            ]
        );
    }

    #[rstest]
    fn test_wig_track_query() {
        let mut f = tempfile::Builder::new().suffix(".wig").tempfile().unwrap();
        writeln!(f, "track type=wiggle_0").unwrap();
        writeln!(f, "fixedStep chrom=chr1 start=1 step=10 span=10").unwrap();
        for v in [1.0, 2.0, 3.0] {
            writeln!(f, "{}", v).unwrap();
        }
        writeln!(f, "variableStep chrom=chr2").unwrap();
        writeln!(f, "7 9.0").unwrap();
        f.flush().unwrap();

        let mut track = WigTrack::open(f.path()).unwrap();
        assert_eq!(track.chromosomes(), vec!["chr1", "chr2"]);
        assert_eq!(track.chrom_stop("chr1").unwrap(), 30);
        assert_eq!(track.chrom_start("chr2").unwrap(), 7);

        let hits: Vec<SignalRecord> = track
            .query("chr1", 15, 21)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            hits,
            vec![SignalRecord::new(11, 20, 2.0), SignalRecord::new(21, 30, 3.0)]
        );
    }
}
