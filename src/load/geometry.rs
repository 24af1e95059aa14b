// Window geometry for the sliding-window load engine
//
// Windows are never materialized. Window `w` is the half-open range
// [w * step, w * step + size), and the set of windows an interval can touch is
// derived in closed form instead of scanning every window per interval.

use super::interval::{ClampedInterval, Interval};
use super::validate::ValidationError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Scalar parameters describing the trace and the window family
///
/// All three values are nanoseconds and must be strictly positive.
///
/// # Example
/// ```
/// use cpuload::load::TraceParameters;
///
/// let params = TraceParameters::new(1_000, 500, 250);
/// assert_eq!(params.num_windows(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceParameters {
    /// Total trace length; the trace is assumed to start at 0
    pub trace_duration_ns: i64,

    /// Width of every window
    pub window_size_ns: i64,

    /// Distance between the starts of two consecutive windows
    pub window_step_ns: i64,
}

impl TraceParameters {
    pub fn new(trace_duration_ns: i64, window_size_ns: i64, window_step_ns: i64) -> Self {
        Self {
            trace_duration_ns,
            window_size_ns,
            window_step_ns,
        }
    }

    /// Reject non-positive parameters
    pub fn validate(&self) -> Result<(), ValidationError> {
        let checks = [
            ("window_step_ns", self.window_step_ns),
            ("window_size_ns", self.window_size_ns),
            ("trace_duration_ns", self.trace_duration_ns),
        ];

        for (name, value) in checks {
            if value <= 0 {
                return Err(ValidationError::NonPositiveParameter { name, value });
            }
        }

        Ok(())
    }

    /// Number of windows the trace is split into
    ///
    /// Only meaningful for validated parameters; returns 1 otherwise.
    pub fn num_windows(&self) -> usize {
        num_windows(
            self.trace_duration_ns,
            self.window_size_ns,
            self.window_step_ns,
        )
    }
}

/// Window count for a trace: `1 + floor((duration - size) / step)`, or 1 when
/// the trace is shorter than a single window
pub fn num_windows(trace_duration_ns: i64, window_size_ns: i64, window_step_ns: i64) -> usize {
    if window_step_ns <= 0 || trace_duration_ns < window_size_ns {
        return 1;
    }
    let extra = (trace_duration_ns - window_size_ns) / window_step_ns;
    usize::try_from(extra).map_or(usize::MAX, |n| n.saturating_add(1))
}

/// Ceiling division for a non-negative dividend and a positive divisor
fn ceil_div(a: i64, b: i64) -> i64 {
    a / b + i64::from(a % b != 0)
}

/// Immutable window family handed to every worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    trace_duration_ns: i64,
    window_size_ns: i64,
    window_step_ns: i64,
    num_windows: usize,
}

impl WindowGeometry {
    /// Build the geometry from parameters, validating them first
    pub fn new(params: TraceParameters) -> Result<Self, ValidationError> {
        params.validate()?;
        Ok(Self {
            trace_duration_ns: params.trace_duration_ns,
            window_size_ns: params.window_size_ns,
            window_step_ns: params.window_step_ns,
            num_windows: params.num_windows(),
        })
    }

    pub fn num_windows(&self) -> usize {
        self.num_windows
    }

    pub fn window_size_ns(&self) -> i64 {
        self.window_size_ns
    }

    pub fn window_step_ns(&self) -> i64 {
        self.window_step_ns
    }

    /// Start of window `w`
    pub fn window_start(&self, w: usize) -> i64 {
        w as i64 * self.window_step_ns
    }

    /// Clamp an interval into `[0, trace_duration_ns)`
    ///
    /// Returns `None` when nothing of the interval remains inside the trace.
    pub fn clamp(&self, interval: Interval) -> Option<ClampedInterval> {
        if interval.start_ns >= self.trace_duration_ns || interval.end_ns <= 0 {
            return None;
        }
        let start_ns = interval.start_ns.max(0);
        let end_ns = interval.end_ns.min(self.trace_duration_ns);
        if start_ns >= end_ns {
            return None;
        }
        Some(ClampedInterval { start_ns, end_ns })
    }

    /// Inclusive range of windows a clamped interval can overlap
    ///
    /// `i_start` is the first window whose end exceeds the interval start,
    /// `i_end` the last window whose start precedes the interval end. `None`
    /// when the range is empty after clamping to the window count.
    pub fn window_range(&self, interval: ClampedInterval) -> Option<RangeInclusive<usize>> {
        let i_start = if interval.start_ns < self.window_size_ns {
            0
        } else {
            ceil_div(
                interval.start_ns - self.window_size_ns + 1,
                self.window_step_ns,
            )
        };
        let i_end = (interval.end_ns - 1) / self.window_step_ns;

        let last = self.num_windows as i64 - 1;
        let i_start = i_start.max(0);
        let i_end = i_end.min(last);

        if i_start > i_end {
            return None;
        }
        Some(i_start as usize..=i_end as usize)
    }

    /// Overlap length between a clamped interval and window `w`
    pub fn overlap_ns(&self, interval: ClampedInterval, w: usize) -> u64 {
        let window_start = self.window_start(w);
        let window_end = window_start + self.window_size_ns;
        let overlap_start = interval.start_ns.max(window_start);
        let overlap_end = interval.end_ns.min(window_end);
        // Negative overlap means the window and interval are disjoint
        u64::try_from(overlap_end - overlap_start).unwrap_or(0)
    }
}
