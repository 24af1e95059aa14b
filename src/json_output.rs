//! JSON output for load matrices

use crate::load::{CapPolicy, LoadMatrix};
use crate::summary::LoadSummary;
use serde::{Deserialize, Serialize};

/// Complete JSON report of a load computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonLoadReport {
    /// Format version
    pub version: String,
    pub num_cpus: usize,
    pub num_windows: usize,
    pub window_size_ns: i64,
    pub window_step_ns: i64,
    pub cap_policy: CapPolicy,
    /// Window start times
    pub timestamps_ns: Vec<i64>,
    /// Overall load per window (0-100)
    pub overall: Vec<f64>,
    /// Load per CPU per window, indexed `[cpu][window]`
    pub per_cpu: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<LoadSummary>,
}

impl JsonLoadReport {
    pub fn from_matrix(matrix: &LoadMatrix, cap_policy: CapPolicy) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            num_cpus: matrix.num_cpus(),
            num_windows: matrix.num_windows(),
            window_size_ns: matrix.window_size_ns(),
            window_step_ns: matrix.window_step_ns(),
            cap_policy,
            timestamps_ns: matrix.timestamps().iter().map(|&t| t as i64).collect(),
            overall: matrix.overall().to_vec(),
            per_cpu: matrix.cpu_rows().map(<[f64]>::to_vec).collect(),
            summary: None,
        }
    }

    /// Attach per-row statistics
    pub fn with_summary(mut self, summary: LoadSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
