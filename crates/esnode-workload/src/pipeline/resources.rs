//! CPU and memory resolution
//!
//! Each of the four quantities falls back to its default independently, and
//! only when the input is absent or the zero quantity. The resolved memory
//! limit doubles as the node's instance RAM.

use esnode_common::crd::{Quantity, ResourceRequirementsSpec};
use esnode_common::NodeDefaults;

use crate::k8s::{ResourceQuantity, ResourceRequirements};

/// Fully resolved limits and requests; no field is ever absent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedResources {
    /// CPU limit
    pub cpu_limit: Quantity,
    /// CPU request
    pub cpu_request: Quantity,
    /// Memory limit, also the instance RAM
    pub memory_limit: Quantity,
    /// Memory request
    pub memory_request: Quantity,
}

impl ResolvedResources {
    /// Heap-sizing hint passed to the node; always the memory limit itself
    pub fn instance_ram(&self) -> &str {
        self.memory_limit.as_str()
    }

    /// Render as Kubernetes resource requirements
    pub fn to_requirements(&self) -> ResourceRequirements {
        ResourceRequirements {
            limits: Some(ResourceQuantity {
                cpu: Some(self.cpu_limit.to_string()),
                memory: Some(self.memory_limit.to_string()),
            }),
            requests: Some(ResourceQuantity {
                cpu: Some(self.cpu_request.to_string()),
                memory: Some(self.memory_request.to_string()),
            }),
        }
    }
}

/// Fills unset resource fields from the defaults table
pub struct ResourceResolver<'a> {
    defaults: &'a NodeDefaults,
}

impl<'a> ResourceResolver<'a> {
    /// Create a resolver over the given defaults
    pub fn new(defaults: &'a NodeDefaults) -> Self {
        Self { defaults }
    }

    /// Resolve every quantity, falling back per field
    pub fn resolve(&self, spec: &ResourceRequirementsSpec) -> ResolvedResources {
        ResolvedResources {
            cpu_limit: pick(spec.limit_cpu(), &self.defaults.cpu_limit),
            cpu_request: pick(spec.request_cpu(), &self.defaults.cpu_request),
            memory_limit: pick(spec.limit_memory(), &self.defaults.memory_limit),
            memory_request: pick(spec.request_memory(), &self.defaults.memory_request),
        }
    }
}

fn pick(input: Option<&Quantity>, default: &Quantity) -> Quantity {
    input
        .and_then(Quantity::non_zero)
        .unwrap_or(default)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use esnode_common::crd::ResourceQuantity as SpecQuantity;

    fn spec(
        limit_cpu: Option<&str>,
        limit_mem: Option<&str>,
        req_cpu: Option<&str>,
        req_mem: Option<&str>,
    ) -> ResourceRequirementsSpec {
        ResourceRequirementsSpec {
            limits: Some(SpecQuantity {
                cpu: limit_cpu.map(Quantity::from),
                memory: limit_mem.map(Quantity::from),
            }),
            requests: Some(SpecQuantity {
                cpu: req_cpu.map(Quantity::from),
                memory: req_mem.map(Quantity::from),
            }),
        }
    }

    #[test]
    fn empty_spec_resolves_to_defaults() {
        let defaults = NodeDefaults::default();
        let resolved = ResourceResolver::new(&defaults).resolve(&ResourceRequirementsSpec::default());

        assert_eq!(resolved.cpu_limit.as_str(), "4000m");
        assert_eq!(resolved.cpu_request.as_str(), "100m");
        assert_eq!(resolved.memory_limit.as_str(), "4Gi");
        assert_eq!(resolved.memory_request.as_str(), "1Gi");
        assert_eq!(resolved.instance_ram(), "4Gi");
    }

    #[test]
    fn non_zero_inputs_pass_through_unchanged() {
        let defaults = NodeDefaults::default();
        let input = spec(Some("2"), Some("8Gi"), Some("500m"), Some("2Gi"));
        let resolved = ResourceResolver::new(&defaults).resolve(&input);

        assert_eq!(resolved.cpu_limit.as_str(), "2");
        assert_eq!(resolved.memory_limit.as_str(), "8Gi");
        assert_eq!(resolved.cpu_request.as_str(), "500m");
        assert_eq!(resolved.memory_request.as_str(), "2Gi");
    }

    #[test]
    fn zero_inputs_fall_back_per_field() {
        let defaults = NodeDefaults::default();
        let input = spec(Some("0"), Some("16Gi"), Some("250m"), Some("0Gi"));
        let resolved = ResourceResolver::new(&defaults).resolve(&input);

        assert_eq!(resolved.cpu_limit.as_str(), "4000m");
        assert_eq!(resolved.memory_limit.as_str(), "16Gi");
        assert_eq!(resolved.cpu_request.as_str(), "250m");
        assert_eq!(resolved.memory_request.as_str(), "1Gi");
    }

    #[test]
    fn instance_ram_always_equals_memory_limit() {
        let defaults = NodeDefaults::default();
        for memory in [None, Some("0"), Some("512Mi"), Some("8Gi")] {
            let input = spec(None, memory, None, None);
            let resolved = ResourceResolver::new(&defaults).resolve(&input);
            let requirements = resolved.to_requirements();
            let limit = requirements
                .limits
                .and_then(|l| l.memory)
                .expect("memory limit always set");
            assert_eq!(resolved.instance_ram(), limit);
        }
    }

    #[test]
    fn configured_defaults_are_used() {
        let defaults = NodeDefaults {
            memory_limit: Quantity::from("2Gi"),
            ..Default::default()
        };
        let resolved = ResourceResolver::new(&defaults).resolve(&ResourceRequirementsSpec::default());
        assert_eq!(resolved.instance_ram(), "2Gi");
    }

    #[test]
    fn requirements_fill_both_sections() {
        let defaults = NodeDefaults::default();
        let requirements = ResourceResolver::new(&defaults)
            .resolve(&ResourceRequirementsSpec::default())
            .to_requirements();
        let json = serde_json::to_value(&requirements).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "limits": {"cpu": "4000m", "memory": "4Gi"},
                "requests": {"cpu": "100m", "memory": "1Gi"}
            })
        );
    }
}
