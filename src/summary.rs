//! Per-row statistics over a load matrix
//!
//! Condenses each CPU row and the overall row to mean, peak and the number of
//! windows above 100%. Over-capacity windows on a CPU row mean intervals on
//! that CPU overlapped each other in the input.

use crate::load::LoadMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistics for one matrix row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSummary {
    /// "cpu0", "cpu1", ... or "overall"
    pub label: String,
    pub mean: f64,
    pub peak: f64,
    /// Start of the first window reaching `peak`
    pub peak_window_start_ns: i64,
    /// Windows with load above 100%
    pub over_capacity_windows: usize,
}

impl RowSummary {
    fn from_row(label: String, row: &[f64], timestamps: &[f64]) -> Self {
        let mean = if row.is_empty() {
            0.0
        } else {
            row.iter().sum::<f64>() / row.len() as f64
        };

        let (peak_idx, peak) = row
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0_f64), |best, (i, v)| if v > best.1 { (i, v) } else { best });

        Self {
            label,
            mean,
            peak,
            peak_window_start_ns: timestamps.get(peak_idx).copied().unwrap_or(0.0) as i64,
            over_capacity_windows: row.iter().filter(|&&v| v > 100.0).count(),
        }
    }
}

impl fmt::Display for RowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8} {:>8.2} {:>8.2} {:>16}",
            self.label, self.mean, self.peak, self.peak_window_start_ns
        )?;
        if self.over_capacity_windows > 0 {
            write!(f, "  ({} windows over 100%)", self.over_capacity_windows)?;
        }
        Ok(())
    }
}

/// Summary of a whole load matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub num_cpus: usize,
    pub num_windows: usize,
    pub cpus: Vec<RowSummary>,
    pub overall: RowSummary,
}

impl LoadSummary {
    /// Summarize every row of `matrix`
    ///
    /// # Example
    /// ```
    /// use cpuload::load::{compute, Interval, TraceParameters};
    /// use cpuload::summary::LoadSummary;
    ///
    /// let m = compute(&[Interval::new(0, 100, 1)], TraceParameters::new(200, 100, 100)).unwrap();
    /// let summary = LoadSummary::from_matrix(&m);
    /// assert_eq!(summary.cpus[1].peak, 100.0);
    /// assert_eq!(summary.overall.mean, 25.0);
    /// ```
    pub fn from_matrix(matrix: &LoadMatrix) -> Self {
        let timestamps = matrix.timestamps();
        let cpus = matrix
            .cpu_rows()
            .enumerate()
            .map(|(cpu, row)| RowSummary::from_row(format!("cpu{}", cpu), row, timestamps))
            .collect();

        Self {
            num_cpus: matrix.num_cpus(),
            num_windows: matrix.num_windows(),
            cpus,
            overall: RowSummary::from_row("overall".to_string(), matrix.overall(), timestamps),
        }
    }

    /// CPUs whose row went above 100% in at least one window
    pub fn over_capacity_cpus(&self) -> Vec<&RowSummary> {
        self.cpus
            .iter()
            .filter(|row| row.over_capacity_windows > 0)
            .collect()
    }

    /// Render as a text table
    pub fn to_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "{:>8} {:>8} {:>8} {:>16}\n",
            "row", "mean %", "peak %", "peak at (ns)"
        ));
        out.push_str(&format!(
            "{:->8} {:->8} {:->8} {:->16}\n",
            "", "", "", ""
        ));
        for row in &self.cpus {
            out.push_str(&format!("{}\n", row));
        }
        out.push_str(&format!("{}\n", self.overall));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{compute, Interval, TraceParameters};

    #[test]
    fn test_row_summary_values() {
        let row = RowSummary::from_row("cpu0".into(), &[10.0, 50.0, 30.0], &[0.0, 10.0, 20.0]);
        assert_eq!(row.mean, 30.0);
        assert_eq!(row.peak, 50.0);
        assert_eq!(row.peak_window_start_ns, 10);
        assert_eq!(row.over_capacity_windows, 0);
    }

    #[test]
    fn test_empty_row() {
        let row = RowSummary::from_row("cpu0".into(), &[], &[]);
        assert_eq!(row.mean, 0.0);
        assert_eq!(row.peak, 0.0);
    }

    #[test]
    fn test_over_capacity_detection() {
        let m = compute(
            &[Interval::new(0, 100, 0), Interval::new(0, 100, 0)],
            TraceParameters::new(100, 100, 100),
        )
        .unwrap();
        let summary = LoadSummary::from_matrix(&m);
        assert_eq!(summary.cpus[0].over_capacity_windows, 1);
        assert_eq!(summary.overall.over_capacity_windows, 0);
        assert_eq!(summary.over_capacity_cpus().len(), 1);
    }

    #[test]
    fn test_table_contains_rows() {
        let m = compute(
            &[Interval::new(0, 50, 0), Interval::new(0, 100, 1)],
            TraceParameters::new(100, 100, 100),
        )
        .unwrap();
        let table = LoadSummary::from_matrix(&m).to_table();
        assert!(table.contains("cpu0"));
        assert!(table.contains("cpu1"));
        assert!(table.contains("overall"));
        assert!(table.contains("75.00"));
    }
}
