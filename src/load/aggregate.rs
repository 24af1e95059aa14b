// Cross-CPU aggregation into the overall load row
//
// Summation happens in nanoseconds, before any percentage conversion, and the
// sum is capped at full capacity (window_size * num_cpus).

use super::accumulator::CpuAccumulator;
use super::config::CapPolicy;

/// Overall load per window, in `[0, 100]`
///
/// `rows` must hold one accumulator per CPU in id order; every row has
/// `num_windows` cells. An empty `rows` yields an all-zero result.
pub fn overall_load(
    rows: &[CpuAccumulator],
    num_windows: usize,
    window_size_ns: i64,
    policy: CapPolicy,
) -> Vec<f64> {
    let capacity = window_size_ns.max(0) as u128 * rows.len() as u128;
    if capacity == 0 {
        return vec![0.0; num_windows];
    }

    (0..num_windows)
        .map(|w| {
            let raw: u128 = rows
                .iter()
                .map(|row| u128::from(row.effective_ns(w, window_size_ns, policy)))
                .sum();
            let capped = raw.min(capacity);
            (capped * 100) as f64 / capacity as f64
        })
        .collect()
}
