//! Windowed CPU load engine
//!
//! Turns a flat list of "CPU running" intervals into a dense load matrix: one
//! row per logical CPU, an overall row, and a timestamp row, sampled by a
//! fixed-size window sliding across the trace by a fixed step.
//!
//! # Design
//!
//! ```text
//! compute()
//!   ├─ validate columns, cpu ids, parameters   (nothing started on failure)
//!   ├─ WorkerPool::start(num_cpus)             (one thread per cpu id)
//!   ├─ fan out: interval ──► worker[cpu_id]    (WindowGeometry + CpuAccumulator)
//!   ├─ fill timestamp row                      (concurrently with workers)
//!   ├─ shutdown_and_join()                     (the only barrier)
//!   └─ overall_load()                          (sum in ns, cap at capacity)
//! ```
//!
//! Each worker exclusively owns its row and returns it through its join
//! handle, so no cell is ever shared between threads. Rows accumulate integer
//! nanoseconds, which makes the result bit-identical across runs regardless of
//! scheduling.

mod accumulator;
mod aggregate;
mod config;
mod geometry;
mod interval;
mod matrix;
mod validate;
mod worker;

pub use accumulator::CpuAccumulator;
pub use aggregate::overall_load;
pub use config::{CapPolicy, EngineConfig, MAX_CPU_ID, MAX_WINDOWS};
pub use geometry::{num_windows, TraceParameters, WindowGeometry};
pub use interval::{ClampedInterval, Interval};
pub use matrix::LoadMatrix;
pub use validate::ValidationError;
pub use worker::{CpuWorker, WorkerPool};

use crate::profiling::{ProfilingCategory, ProfilingContext};

/// Load engine holding an immutable configuration
///
/// # Example
/// ```
/// use cpuload::load::{EngineConfig, Interval, LoadEngine, TraceParameters};
///
/// let engine = LoadEngine::new(EngineConfig::default()).unwrap();
/// let matrix = engine
///     .compute(&[Interval::new(100, 300, 0)], TraceParameters::new(1_000, 500, 250))
///     .unwrap();
///
/// assert_eq!(matrix.cpu_row(0), Some(&[40.0, 10.0, 0.0][..]));
/// assert_eq!(matrix.timestamps(), &[0.0, 250.0, 500.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoadEngine {
    config: EngineConfig,
}

impl LoadEngine {
    /// Create an engine, rejecting an invalid configuration
    pub fn new(config: EngineConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the load matrix for a set of intervals
    pub fn compute(
        &self,
        intervals: &[Interval],
        params: TraceParameters,
    ) -> Result<LoadMatrix, ValidationError> {
        self.run(intervals, params, None)
    }

    /// Same as [`LoadEngine::compute`], recording phase timings
    pub fn compute_profiled(
        &self,
        intervals: &[Interval],
        params: TraceParameters,
        profiler: &mut ProfilingContext,
    ) -> Result<LoadMatrix, ValidationError> {
        self.run(intervals, params, Some(profiler))
    }

    /// Compute from three parallel columns (start, end, cpu id)
    pub fn compute_columns(
        &self,
        slice_start_ns: &[i64],
        slice_end_ns: &[i64],
        cpu_id: &[i64],
        params: TraceParameters,
    ) -> Result<LoadMatrix, ValidationError> {
        validate::validate_columns(slice_start_ns.len(), slice_end_ns.len(), cpu_id.len())
            .map_err(log_rejection)?;

        let intervals: Vec<Interval> = slice_start_ns
            .iter()
            .zip(slice_end_ns)
            .zip(cpu_id)
            .map(|((&start, &end), &cpu)| Interval::new(start, end, cpu))
            .collect();

        self.compute(&intervals, params)
    }

    fn run(
        &self,
        intervals: &[Interval],
        params: TraceParameters,
        mut profiler: Option<&mut ProfilingContext>,
    ) -> Result<LoadMatrix, ValidationError> {
        let (geometry, num_cpus) = timed(profiler.as_deref_mut(), ProfilingCategory::Validation, || {
            self.validate(intervals, params)
        })
        .map_err(log_rejection)?;

        if let Some(p) = profiler.as_deref_mut() {
            p.record_intervals(intervals.len());
        }

        let num_windows = geometry.num_windows();
        tracing::info!(num_windows, num_cpus, "Going to calculate load for {} windows", num_windows);

        let mut pool = WorkerPool::start(num_cpus, geometry);

        timed(profiler.as_deref_mut(), ProfilingCategory::FanOut, || {
            for interval in intervals {
                pool.submit(*interval);
            }
        });

        // Workers are busy while the timestamp row is filled
        let timestamps: Vec<f64> = timed(profiler.as_deref_mut(), ProfilingCategory::Timestamps, || {
            (0..num_windows)
                .map(|w| geometry.window_start(w) as f64)
                .collect()
        });

        let unrouted = pool.unrouted();
        let rows = timed(profiler.as_deref_mut(), ProfilingCategory::Join, || {
            pool.shutdown_and_join()
        });
        if unrouted > 0 {
            tracing::debug!(unrouted, "intervals with negative cpu id skipped");
        }

        let policy = self.config.cap_policy;
        let window_size_ns = geometry.window_size_ns();
        let (per_cpu, overall) = timed(profiler, ProfilingCategory::Aggregation, || {
            let per_cpu: Vec<Vec<f64>> = rows
                .iter()
                .map(|row| row.to_percentages(window_size_ns, policy))
                .collect();
            let overall = overall_load(&rows, num_windows, window_size_ns, policy);
            (per_cpu, overall)
        });

        Ok(LoadMatrix::from_parts(
            per_cpu,
            overall,
            timestamps,
            window_size_ns,
            geometry.window_step_ns(),
        ))
    }

    /// Run every check before any worker starts
    ///
    /// Returns the window geometry and the dense CPU count.
    fn validate(
        &self,
        intervals: &[Interval],
        params: TraceParameters,
    ) -> Result<(WindowGeometry, usize), ValidationError> {
        let max_cpu_id = validate::max_cpu_id(intervals, self.config.max_cpu_id)?
            .ok_or(ValidationError::EmptyInput)?;
        let geometry = WindowGeometry::new(params)?;
        if geometry.num_windows() > self.config.max_windows {
            return Err(ValidationError::TooManyWindows {
                num_windows: geometry.num_windows(),
                max: self.config.max_windows,
            });
        }

        // Negative ids are skipped at fan-out; at least cpu 0 always exists
        let num_cpus = max_cpu_id.max(0) as usize + 1;
        Ok((geometry, num_cpus))
    }
}

/// Compute with the default configuration
///
/// # Example
/// ```
/// use cpuload::load::{compute, Interval, TraceParameters};
///
/// let intervals = [Interval::new(0, 50, 0), Interval::new(0, 100, 3)];
/// let matrix = compute(&intervals, TraceParameters::new(100, 100, 100)).unwrap();
///
/// assert_eq!(matrix.num_cpus(), 4);
/// assert_eq!(matrix.overall(), &[37.5]);
/// ```
pub fn compute(
    intervals: &[Interval],
    params: TraceParameters,
) -> Result<LoadMatrix, ValidationError> {
    LoadEngine::default().compute(intervals, params)
}

/// Compute with an explicit configuration
///
/// The configuration is validated like [`LoadEngine::new`].
pub fn compute_with_config(
    intervals: &[Interval],
    params: TraceParameters,
    config: EngineConfig,
) -> Result<LoadMatrix, ValidationError> {
    LoadEngine::new(config)
        .map_err(log_rejection)?
        .compute(intervals, params)
}

/// Compute from parallel columns with the default configuration
pub fn compute_columns(
    slice_start_ns: &[i64],
    slice_end_ns: &[i64],
    cpu_id: &[i64],
    params: TraceParameters,
) -> Result<LoadMatrix, ValidationError> {
    LoadEngine::default().compute_columns(slice_start_ns, slice_end_ns, cpu_id, params)
}

fn timed<R>(
    profiler: Option<&mut ProfilingContext>,
    category: ProfilingCategory,
    f: impl FnOnce() -> R,
) -> R {
    match profiler {
        Some(p) => p.measure(category, f),
        None => f(),
    }
}

fn log_rejection(err: ValidationError) -> ValidationError {
    tracing::error!("Error: {}", err);
    err
}
