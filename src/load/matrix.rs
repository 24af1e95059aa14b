// Result matrix of a load computation

use serde::Serialize;

/// Dense load matrix with the fixed row layout
/// `[cpu_0, ..., cpu_{n-1}, overall, timestamp]`
///
/// Every row holds one value per window. Per-CPU rows and the overall row are
/// percentages; the timestamp row holds each window's start in nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadMatrix {
    rows: Vec<Vec<f64>>,
    num_cpus: usize,
    window_size_ns: i64,
    window_step_ns: i64,
}

impl LoadMatrix {
    pub(crate) fn from_parts(
        mut per_cpu: Vec<Vec<f64>>,
        overall: Vec<f64>,
        timestamps: Vec<f64>,
        window_size_ns: i64,
        window_step_ns: i64,
    ) -> Self {
        let num_cpus = per_cpu.len();
        per_cpu.reserve(2);
        per_cpu.push(overall);
        per_cpu.push(timestamps);

        Self {
            rows: per_cpu,
            num_cpus,
            window_size_ns,
            window_step_ns,
        }
    }

    pub fn num_cpus(&self) -> usize {
        self.num_cpus
    }

    pub fn num_windows(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn window_size_ns(&self) -> i64 {
        self.window_size_ns
    }

    pub fn window_step_ns(&self) -> i64 {
        self.window_step_ns
    }

    /// All rows in layout order
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Load row of one logical CPU
    pub fn cpu_row(&self, cpu: usize) -> Option<&[f64]> {
        if cpu < self.num_cpus {
            Some(&self.rows[cpu])
        } else {
            None
        }
    }

    /// Per-CPU rows in id order
    pub fn cpu_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows[..self.num_cpus].iter().map(Vec::as_slice)
    }

    /// Overall load row, capped at 100%
    pub fn overall(&self) -> &[f64] {
        &self.rows[self.num_cpus]
    }

    /// Window start times in nanoseconds
    pub fn timestamps(&self) -> &[f64] {
        &self.rows[self.num_cpus + 1]
    }

    /// Cell at `(row, window)` in layout order
    pub fn cell(&self, row: usize, window: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(window)).copied()
    }

    /// Hand the raw rows to the caller
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LoadMatrix {
        LoadMatrix::from_parts(
            vec![vec![10.0, 20.0], vec![30.0, 40.0]],
            vec![20.0, 30.0],
            vec![0.0, 50.0],
            100,
            50,
        )
    }

    #[test]
    fn test_layout() {
        let m = sample();
        assert_eq!(m.num_cpus(), 2);
        assert_eq!(m.num_windows(), 2);
        assert_eq!(m.rows().len(), 4);
        assert_eq!(m.cpu_row(1), Some(&[30.0, 40.0][..]));
        assert_eq!(m.cpu_row(2), None);
        assert_eq!(m.overall(), &[20.0, 30.0]);
        assert_eq!(m.timestamps(), &[0.0, 50.0]);
        assert_eq!(m.cpu_rows().count(), 2);
    }

    #[test]
    fn test_cell_access() {
        let m = sample();
        assert_eq!(m.cell(0, 1), Some(20.0));
        assert_eq!(m.cell(3, 1), Some(50.0));
        assert_eq!(m.cell(4, 0), None);
        assert_eq!(m.cell(0, 9), None);
    }

    #[test]
    fn test_into_rows() {
        let rows = sample().into_rows();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2], vec![20.0, 30.0]);
    }
}
