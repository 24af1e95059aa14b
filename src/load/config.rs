// Configuration for the load engine

use super::validate::ValidationError;
use serde::{Deserialize, Serialize};

/// Largest CPU id accepted by default (33 logical CPUs)
pub const MAX_CPU_ID: i64 = 32;

/// Largest window count accepted by default
pub const MAX_WINDOWS: usize = 1_000_000;

/// Where the 100%-of-capacity cap is applied
///
/// The two policies are observably different when intervals on one CPU
/// overlap each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapPolicy {
    /// Per-CPU rows keep their raw percentage (may exceed 100); only the
    /// overall row is capped
    #[default]
    AggregateOnly,

    /// Each CPU's occupied time is capped at one full window before it is
    /// reported or summed
    PerCpu,
}

/// Engine configuration
///
/// # Example
/// ```
/// use cpuload::load::{CapPolicy, EngineConfig};
///
/// let config = EngineConfig::default();
/// assert_eq!(config.cap_policy, CapPolicy::AggregateOnly);
/// assert_eq!(config.max_cpu_id, 32);
/// assert_eq!(config.max_windows, 1_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capping policy for per-CPU and overall rows
    pub cap_policy: CapPolicy,

    /// Inputs with a larger CPU id are rejected, bounding the matrix size
    pub max_cpu_id: i64,

    /// Parameters yielding more windows are rejected before any row is allocated
    pub max_windows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cap_policy: CapPolicy::AggregateOnly,
            max_cpu_id: MAX_CPU_ID,
            max_windows: MAX_WINDOWS,
        }
    }
}

impl EngineConfig {
    /// Configuration that caps every CPU row at 100%
    pub fn per_cpu_capped() -> Self {
        Self {
            cap_policy: CapPolicy::PerCpu,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0..=MAX_CPU_ID).contains(&self.max_cpu_id) {
            return Err(ValidationError::Config(format!(
                "max_cpu_id must be in [0, {}], got {}",
                MAX_CPU_ID, self.max_cpu_id
            )));
        }
        if self.max_windows == 0 {
            return Err(ValidationError::Config(
                "max_windows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_max_cpu_id_out_of_range() {
        let config = EngineConfig {
            max_cpu_id: 64,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            max_cpu_id: -1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_max_windows_rejected() {
        let config = EngineConfig {
            max_windows: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::Config(_))));
    }

    #[test]
    fn test_serde_roundtrip_policy_name() {
        let json = serde_json::to_string(&EngineConfig::per_cpu_capped()).unwrap();
        assert!(json.contains("\"per_cpu\""));
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cap_policy, CapPolicy::PerCpu);
    }
}
