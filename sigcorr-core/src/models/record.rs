///
/// One run of constant signal: every base in `[start, end]` carries `value`.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRecord {
    pub start: u32,
    pub end: u32,
    pub value: f64,
}

impl SignalRecord {
    pub fn new(start: u32, end: u32, value: f64) -> Self {
        SignalRecord { start, end, value }
    }

    /// Whether the record shares at least one base with `[start, stop]`.
    pub fn overlaps(&self, start: u32, stop: u32) -> bool {
        self.start <= stop && self.end >= start
    }
}
