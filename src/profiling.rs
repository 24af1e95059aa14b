//! Self-profiling for load computations
//!
//! Tracks time spent in each phase of a run (reading input, validation,
//! fan-out to workers, joining, aggregation, writing output) to show where a
//! large trace spends its time.

use std::time::{Duration, Instant};

/// Phases of a run that can be profiled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfilingCategory {
    /// Reading and parsing the interval input
    Input,
    /// Input validation and window planning
    Validation,
    /// Routing intervals to the per-CPU workers
    FanOut,
    /// Filling the timestamp row
    Timestamps,
    /// Waiting for workers to drain their queues
    Join,
    /// Percentage conversion and overall-row aggregation
    Aggregation,
    /// Writing CSV/JSON/text output
    Output,
}

/// Profiling context that tracks time spent in each phase
#[derive(Debug, Default)]
pub struct ProfilingContext {
    /// Total number of intervals handed to the engine
    interval_count: u64,
    input_time: Duration,
    validation_time: Duration,
    fan_out_time: Duration,
    timestamps_time: Duration,
    join_time: Duration,
    aggregation_time: Duration,
    output_time: Duration,
    /// Total wall clock time
    start_time: Option<Instant>,
}

impl ProfilingContext {
    /// Create a new profiling context
    pub fn new() -> Self {
        Self {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    /// Record intervals handed to the engine
    pub fn record_intervals(&mut self, count: usize) {
        self.interval_count += count as u64;
    }

    /// Measure the time taken by an operation
    ///
    /// # Example
    /// ```
    /// use cpuload::profiling::{ProfilingCategory, ProfilingContext};
    ///
    /// let mut ctx = ProfilingContext::new();
    /// let result = ctx.measure(ProfilingCategory::Aggregation, || 2 + 2);
    /// assert_eq!(result, 4);
    /// ```
    pub fn measure<F, R>(&mut self, category: ProfilingCategory, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        self.record_time(category, start.elapsed());
        result
    }

    /// Record time spent in a category
    pub fn record_time(&mut self, category: ProfilingCategory, duration: Duration) {
        *self.slot(category) += duration;
    }

    fn slot(&mut self, category: ProfilingCategory) -> &mut Duration {
        match category {
            ProfilingCategory::Input => &mut self.input_time,
            ProfilingCategory::Validation => &mut self.validation_time,
            ProfilingCategory::FanOut => &mut self.fan_out_time,
            ProfilingCategory::Timestamps => &mut self.timestamps_time,
            ProfilingCategory::Join => &mut self.join_time,
            ProfilingCategory::Aggregation => &mut self.aggregation_time,
            ProfilingCategory::Output => &mut self.output_time,
        }
    }

    /// Get the total wall clock time since profiling started
    pub fn wall_time(&self) -> Duration {
        self.start_time
            .map(|start| start.elapsed())
            .unwrap_or_default()
    }

    pub fn interval_count(&self) -> u64 {
        self.interval_count
    }

    /// Get time spent in a specific category
    pub fn time_in_category(&self, category: ProfilingCategory) -> Duration {
        match category {
            ProfilingCategory::Input => self.input_time,
            ProfilingCategory::Validation => self.validation_time,
            ProfilingCategory::FanOut => self.fan_out_time,
            ProfilingCategory::Timestamps => self.timestamps_time,
            ProfilingCategory::Join => self.join_time,
            ProfilingCategory::Aggregation => self.aggregation_time,
            ProfilingCategory::Output => self.output_time,
        }
    }

    /// Sum of all measured phases
    pub fn measured_time(&self) -> Duration {
        self.input_time
            + self.validation_time
            + self.fan_out_time
            + self.timestamps_time
            + self.join_time
            + self.aggregation_time
            + self.output_time
    }

    /// Print profiling summary to stderr
    pub fn print_summary(&self) {
        let wall = self.wall_time();
        let measured = self.measured_time();

        eprintln!("\n╔════════════════════════════════════════════════════════════╗");
        eprintln!("║  cpuload Self-Profiling Results                            ║");
        eprintln!("╚════════════════════════════════════════════════════════════╝");
        eprintln!();
        eprintln!("Total intervals:           {}", self.interval_count);
        eprintln!("Total wall time:           {:.3}s", wall.as_secs_f64());
        if !wall.is_zero() && self.interval_count > 0 {
            eprintln!(
                "Throughput:                {:.0} intervals/s",
                self.interval_count as f64 / wall.as_secs_f64()
            );
        }
        eprintln!();
        eprintln!("Phase breakdown:");
        self.print_category("Input", self.input_time, measured);
        self.print_category("Validation", self.validation_time, measured);
        self.print_category("Fan-out", self.fan_out_time, measured);
        self.print_category("Timestamps", self.timestamps_time, measured);
        self.print_category("Join", self.join_time, measured);
        self.print_category("Aggregation", self.aggregation_time, measured);
        self.print_category("Output", self.output_time, measured);
        eprintln!();
    }

    fn print_category(&self, name: &str, time: Duration, total: Duration) {
        if time > Duration::ZERO {
            eprintln!(
                "  - {:20} {:.3}s ({:.1}%)",
                format!("{}:", name),
                time.as_secs_f64(),
                time.as_secs_f64() / total.as_secs_f64() * 100.0
            );
        }
    }
}
