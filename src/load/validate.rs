// Input validation for the load engine
//
// Every check runs before any worker starts. A failure is logged and returned;
// nothing is partially computed.

use super::interval::Interval;
use thiserror::Error;

/// Reasons a load computation is rejected up front
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No intervals supplied")]
    EmptyInput,

    #[error("Input length mismatch: {starts} starts, {ends} ends, {cpu_ids} cpu ids")]
    LengthMismatch {
        starts: usize,
        ends: usize,
        cpu_ids: usize,
    },

    #[error("CPU ID is too large: {cpu_id} (max {max})")]
    CpuIdTooLarge { cpu_id: i64, max: i64 },

    #[error("Invalid {name}: {value} (must be > 0)")]
    NonPositiveParameter { name: &'static str, value: i64 },

    #[error("Window count {num_windows} exceeds the maximum allowed ({max})")]
    TooManyWindows { num_windows: usize, max: usize },

    #[error("Invalid engine configuration: {0}")]
    Config(String),
}

/// Check that the three input columns line up and are non-empty
pub fn validate_columns(starts: usize, ends: usize, cpu_ids: usize) -> Result<(), ValidationError> {
    if starts != ends || starts != cpu_ids {
        return Err(ValidationError::LengthMismatch {
            starts,
            ends,
            cpu_ids,
        });
    }
    if starts == 0 {
        return Err(ValidationError::EmptyInput);
    }
    Ok(())
}

/// Largest CPU id in the input, rejecting ids above `max_cpu_id`
///
/// Returns `None` for an empty slice.
pub fn max_cpu_id(intervals: &[Interval], max_cpu_id: i64) -> Result<Option<i64>, ValidationError> {
    let observed = intervals.iter().map(|iv| iv.cpu_id).max();
    match observed {
        Some(cpu_id) if cpu_id > max_cpu_id => Err(ValidationError::CpuIdTooLarge {
            cpu_id,
            max: max_cpu_id,
        }),
        other => Ok(other),
    }
}
