// CPU running intervals

use serde::{Deserialize, Serialize};

/// A half-open `[start_ns, end_ns)` range during which `cpu_id` was running
///
/// Intervals may lie partially or entirely outside the trace. Intervals on the
/// same CPU are expected not to overlap, but nothing enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start_ns: i64,
    pub end_ns: i64,
    pub cpu_id: i64,
}

impl Interval {
    pub fn new(start_ns: i64, end_ns: i64, cpu_id: i64) -> Self {
        Self {
            start_ns,
            end_ns,
            cpu_id,
        }
    }
}

/// An interval already clamped into `[0, trace_duration_ns)` and non-empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClampedInterval {
    pub start_ns: i64,
    pub end_ns: i64,
}
