//! Window parameter planning
//!
//! Picks window size and step for a trace: either explicit millisecond values
//! from the command line, or a dynamic plan that yields roughly a fixed number
//! of non-overlapping windows across the trace.

use crate::load::{num_windows, TraceParameters};
use thiserror::Error;

/// Nanoseconds per millisecond
pub const NS_PER_MS: i64 = 1_000_000;

/// Target window count for the dynamic plan
pub const DEFAULT_DESIRED_POINTS: i64 = 200;

/// Largest window count a plan may produce
pub const DEFAULT_MAX_WINDOWS: usize = 2_000;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid trace duration calculated: {0}ns")]
    InvalidDuration(i64),

    #[error("Invalid window parameter {name}: {value}ms (must be > 0)")]
    InvalidWindow { name: &'static str, value: i64 },

    #[error("Trace of {duration_ns}ns is too short for {desired_points} points")]
    TraceTooShort { duration_ns: i64, desired_points: i64 },

    #[error(
        "Number of windows ({num_windows}) exceeds the maximum allowed ({max_windows}). \
         Please specify larger window size or larger window move."
    )]
    TooManyWindows {
        num_windows: usize,
        max_windows: usize,
    },
}

/// How window parameters are chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowPlan {
    /// Explicit window size in milliseconds
    pub window_size_ms: Option<i64>,

    /// Explicit window step in milliseconds
    pub window_step_ms: Option<i64>,

    /// Window count targeted when either explicit value is missing
    pub desired_points: i64,

    /// Upper bound on the resulting window count
    pub max_windows: usize,
}

impl Default for WindowPlan {
    fn default() -> Self {
        Self {
            window_size_ms: None,
            window_step_ms: None,
            desired_points: DEFAULT_DESIRED_POINTS,
            max_windows: DEFAULT_MAX_WINDOWS,
        }
    }
}

/// Outcome of planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindows {
    pub params: TraceParameters,
    pub num_windows: usize,
    /// True when size and step were derived from `desired_points`
    pub dynamic: bool,
}

impl WindowPlan {
    /// Explicit size and step in milliseconds
    pub fn explicit(window_size_ms: i64, window_step_ms: i64) -> Self {
        Self {
            window_size_ms: Some(window_size_ms),
            window_step_ms: Some(window_step_ms),
            ..Self::default()
        }
    }

    /// Resolve the plan against a trace duration
    ///
    /// # Example
    /// ```
    /// use cpuload::window_plan::WindowPlan;
    ///
    /// let resolved = WindowPlan::default().resolve(2_000_000_000).unwrap();
    /// assert!(resolved.dynamic);
    /// assert_eq!(resolved.params.window_size_ns, 10_000_000);
    /// assert_eq!(resolved.num_windows, 200);
    /// ```
    pub fn resolve(&self, trace_duration_ns: i64) -> Result<ResolvedWindows, PlanError> {
        if trace_duration_ns <= 0 {
            return Err(PlanError::InvalidDuration(trace_duration_ns));
        }

        let (window_size_ns, window_step_ns, dynamic) =
            match (self.window_size_ms, self.window_step_ms) {
                (Some(size), Some(step)) => {
                    (to_ns("window_size_ms", size)?, to_ns("window_step_ms", step)?, false)
                }
                _ => {
                    let (size, step) = dynamic_params(trace_duration_ns, self.desired_points)?;
                    (size, step, true)
                }
            };

        let count = num_windows(trace_duration_ns, window_size_ns, window_step_ns);
        if count > self.max_windows {
            return Err(PlanError::TooManyWindows {
                num_windows: count,
                max_windows: self.max_windows,
            });
        }

        Ok(ResolvedWindows {
            params: TraceParameters::new(trace_duration_ns, window_size_ns, window_step_ns),
            num_windows: count,
            dynamic,
        })
    }
}

/// Size and step giving approximately `desired_points` back-to-back windows
///
/// Size equals step, so windows tile the trace without overlapping.
pub fn dynamic_params(trace_duration_ns: i64, desired_points: i64) -> Result<(i64, i64), PlanError> {
    if desired_points <= 0 {
        return Err(PlanError::InvalidWindow {
            name: "desired_points",
            value: desired_points,
        });
    }
    let step = trace_duration_ns / desired_points;
    if step <= 0 {
        return Err(PlanError::TraceTooShort {
            duration_ns: trace_duration_ns,
            desired_points,
        });
    }
    Ok((step, step))
}

fn to_ns(name: &'static str, ms: i64) -> Result<i64, PlanError> {
    if ms <= 0 {
        return Err(PlanError::InvalidWindow { name, value: ms });
    }
    ms.checked_mul(NS_PER_MS)
        .ok_or(PlanError::InvalidWindow { name, value: ms })
}
