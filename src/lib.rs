//! cpuload - Windowed per-CPU load computation from CPU running slices
//!
//! This library turns scheduler "running" intervals into a dense time series of
//! load percentages: one row per logical CPU, an overall row capped at 100%,
//! and a timestamp row, sampled by a sliding window across the trace.

pub mod cli;
pub mod csv_output;
pub mod interval_input;
pub mod json_output;
pub mod load;
pub mod profiling;
pub mod summary;
pub mod window_plan;
