// Per-CPU accumulation row
//
// Cells hold occupied nanoseconds, not percentages. Integer addition keeps the
// row exact and independent of the order intervals arrive in; percentages are
// derived once the worker is done.

use super::config::CapPolicy;
use super::geometry::WindowGeometry;
use super::interval::Interval;

/// One row of per-window occupied time for a single logical CPU
///
/// Owned and written by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuAccumulator {
    occupied_ns: Vec<u64>,
}

impl CpuAccumulator {
    /// Zero-initialized row with one cell per window
    pub fn new(num_windows: usize) -> Self {
        Self {
            occupied_ns: vec![0; num_windows],
        }
    }

    /// Add an interval's overlap with every window it touches
    ///
    /// Returns `false` when the interval contributes nothing (outside the
    /// trace, empty after clamping, or falling between windows).
    pub fn add_interval(&mut self, geometry: &WindowGeometry, interval: Interval) -> bool {
        let Some(clamped) = geometry.clamp(interval) else {
            return false;
        };
        let Some(windows) = geometry.window_range(clamped) else {
            return false;
        };

        for w in windows {
            let overlap = geometry.overlap_ns(clamped, w);
            if let Some(cell) = self.occupied_ns.get_mut(w) {
                *cell = cell.saturating_add(overlap);
            }
        }
        true
    }

    pub fn occupied_ns(&self) -> &[u64] {
        &self.occupied_ns
    }

    /// Occupied time of window `w` after applying the capping policy
    pub fn effective_ns(&self, w: usize, window_size_ns: i64, policy: CapPolicy) -> u64 {
        let raw = self.occupied_ns.get(w).copied().unwrap_or(0);
        match policy {
            CapPolicy::AggregateOnly => raw,
            CapPolicy::PerCpu => raw.min(window_size_ns.max(0) as u64),
        }
    }

    /// Load percentage per window (`occupied / window_size * 100`)
    pub fn to_percentages(&self, window_size_ns: i64, policy: CapPolicy) -> Vec<f64> {
        let size = window_size_ns as f64;
        (0..self.occupied_ns.len())
            .map(|w| self.effective_ns(w, window_size_ns, policy) as f64 * 100.0 / size)
            .collect()
    }
}
