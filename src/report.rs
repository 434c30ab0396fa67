//! Per-run counters.

use std::fmt;

use serde::Serialize;

/// Progress of one run.
///
/// Both counters only grow. After a fatal error they still describe how far
/// the run got.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Input lines read, blank and comment lines included.
    pub lines_examined: usize,
    /// Metrics encoded and written to the output.
    pub records_processed: usize,
}

impl RunReport {
    /// `(lines_examined, records_processed)`
    pub fn finalize(&self) -> (usize, usize) {
        (self.lines_examined, self.records_processed)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} metrics from {} lines",
            self.records_processed, self.lines_examined
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(RunReport::default().finalize(), (0, 0));
    }

    #[test]
    fn display_matches_summary_line() {
        let report = RunReport {
            lines_examined: 9,
            records_processed: 3,
        };
        assert_eq!(report.to_string(), "Processed 3 metrics from 9 lines");
    }

    #[test]
    fn serializes_counters() {
        let report = RunReport {
            lines_examined: 2,
            records_processed: 1,
        };
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["lines_examined"], 2);
        assert_eq!(json["records_processed"], 1);
    }
}
