//! Tab-separated rendering of a [`CorrelationMatrix`].
//!
//! ```text
//! pearson   a.wig   b.wig
//! a.wig     1.0     0.93
//! b.wig     0.93    1.0
//! ```

use std::io::{self, Write};

use crate::matrix::CorrelationMatrix;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatrixFormatter {
    precision: Option<usize>,
}

impl MatrixFormatter {
    pub fn new() -> Self {
        MatrixFormatter::default()
    }

    /// Fixed number of decimal places; `None` prints the shortest exact form.
    pub fn with_precision(mut self, precision: Option<usize>) -> Self {
        self.precision = precision;
        self
    }

    pub fn format_value(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        match self.precision {
            Some(precision) => format!("{:.*}", precision, value),
            // Debug formatting keeps the decimal point on whole numbers
            None => format!("{:?}", value),
        }
    }

    pub fn write<W: Write>(&self, matrix: &CorrelationMatrix, writer: &mut W) -> io::Result<()> {
        write!(writer, "{}", matrix.metric())?;
        for label in matrix.labels() {
            write!(writer, "\t{}", label)?;
        }
        writeln!(writer)?;

        for (i, label) in matrix.labels().iter().enumerate() {
            write!(writer, "{}", label)?;
            for value in matrix.values().row(i) {
                write!(writer, "\t{}", self.format_value(*value))?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    pub fn render(&self, matrix: &CorrelationMatrix) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.write(matrix, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}
