//! Fallback values for every field a node descriptor may leave unset
//!
//! All resolvers read from one `NodeDefaults` table so a fallback is never
//! re-declared at a call site. The table deserializes from the operator config
//! file with every field optional.

use serde::{Deserialize, Serialize};

use crate::crd::Quantity;

/// Default Elasticsearch image when the node spec has no override
pub const DEFAULT_IMAGE: &str = "docker.io/t0ffel/elasticsearch5";

/// Default CPU limit
pub const DEFAULT_CPU_LIMIT: &str = "4000m";

/// Default CPU request
pub const DEFAULT_CPU_REQUEST: &str = "100m";

/// Default memory limit, also the default instance RAM
pub const DEFAULT_MEMORY_LIMIT: &str = "4Gi";

/// Default memory request
pub const DEFAULT_MEMORY_REQUEST: &str = "1Gi";

/// Cluster transport port, also the probe target
pub const TRANSPORT_PORT: u16 = 9300;

/// REST API port
pub const REST_API_PORT: u16 = 9200;

/// Defaults applied during node compilation
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeDefaults {
    /// Image used when the node spec has no override
    pub image: String,
    /// CPU limit fallback
    pub cpu_limit: Quantity,
    /// CPU request fallback
    pub cpu_request: Quantity,
    /// Memory limit fallback
    pub memory_limit: Quantity,
    /// Memory request fallback
    pub memory_request: Quantity,
    /// Probe parameters shared by readiness and liveness checks
    pub probe: ProbeDefaults,
}

impl Default for NodeDefaults {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            cpu_limit: Quantity::from(DEFAULT_CPU_LIMIT),
            cpu_request: Quantity::from(DEFAULT_CPU_REQUEST),
            memory_limit: Quantity::from(DEFAULT_MEMORY_LIMIT),
            memory_request: Quantity::from(DEFAULT_MEMORY_REQUEST),
            probe: ProbeDefaults::default(),
        }
    }
}

/// TCP probe timing
///
/// `timeout_seconds` is also echoed to the node as `READINESS_PROBE_TIMEOUT`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProbeDefaults {
    /// Seconds after container start before probes begin
    pub initial_delay_seconds: i32,
    /// Seconds before a probe attempt times out
    pub timeout_seconds: i32,
    /// Consecutive failures before the node is marked unhealthy
    pub failure_threshold: i32,
}

impl Default for ProbeDefaults {
    fn default() -> Self {
        Self {
            initial_delay_seconds: 10,
            timeout_seconds: 30,
            failure_threshold: 15,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults_match_documented_values() {
        let defaults = NodeDefaults::default();
        assert_eq!(defaults.image, "docker.io/t0ffel/elasticsearch5");
        assert_eq!(defaults.cpu_limit.as_str(), "4000m");
        assert_eq!(defaults.cpu_request.as_str(), "100m");
        assert_eq!(defaults.memory_limit.as_str(), "4Gi");
        assert_eq!(defaults.memory_request.as_str(), "1Gi");
        assert_eq!(defaults.probe.initial_delay_seconds, 10);
        assert_eq!(defaults.probe.timeout_seconds, 30);
        assert_eq!(defaults.probe.failure_threshold, 15);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let yaml = "memoryLimit: 8Gi\nprobe:\n  timeoutSeconds: 45\n";
        let defaults: NodeDefaults = serde_yaml::from_str(yaml).expect("valid defaults");
        assert_eq!(defaults.memory_limit.as_str(), "8Gi");
        assert_eq!(defaults.cpu_limit.as_str(), "4000m");
        assert_eq!(defaults.probe.timeout_seconds, 45);
        assert_eq!(defaults.probe.failure_threshold, 15);
    }
}
