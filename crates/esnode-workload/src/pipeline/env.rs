//! Environment contract for the Elasticsearch container
//!
//! The list order is fixed so that repeated compilations diff cleanly; the
//! node itself does not depend on it.

use esnode_common::crd::NodeDescriptor;
use esnode_common::NodeDefaults;

use super::resources::ResolvedResources;
use crate::k8s::EnvVar;

/// Where the JVM writes heap dumps, inside the storage volume
pub const HEAP_DUMP_LOCATION: &str = "/elasticsearch/persistent/heapdump.hprof";

/// User the Prometheus exporter authenticates as
pub const PROMETHEUS_USER: &str = "prometheus";

/// Builds the ordered environment list
pub struct EnvironmentComposer;

impl EnvironmentComposer {
    /// Compose the environment for a node
    pub fn compose(
        descriptor: &NodeDescriptor,
        resources: &ResolvedResources,
        defaults: &NodeDefaults,
    ) -> Vec<EnvVar> {
        let cluster = descriptor.cluster_name.as_str();

        vec![
            EnvVar::literal("DC_NAME", &descriptor.deploy_name),
            EnvVar::from_field("NAMESPACE", "metadata.namespace"),
            EnvVar::literal("KUBERNETES_TRUST_CERT", "true"),
            EnvVar::literal("SERVICE_DNS", format!("{}-cluster", cluster)),
            EnvVar::literal("CLUSTER_NAME", cluster),
            EnvVar::literal("INSTANCE_RAM", resources.instance_ram()),
            EnvVar::literal("HEAP_DUMP_LOCATION", HEAP_DUMP_LOCATION),
            EnvVar::literal("NODE_QUORUM", "1"),
            EnvVar::literal("RECOVER_EXPECTED_NODES", "1"),
            EnvVar::literal("RECOVER_AFTER_TIME", "5m"),
            EnvVar::literal(
                "READINESS_PROBE_TIMEOUT",
                defaults.probe.timeout_seconds.to_string(),
            ),
            EnvVar::literal("POD_LABEL", format!("cluster={}", cluster)),
            EnvVar::literal("IS_MASTER", descriptor.role.is_master().to_string()),
            EnvVar::literal("HAS_DATA", descriptor.role.has_data().to_string()),
            EnvVar::literal("PROMETHEUS_USER", PROMETHEUS_USER),
            EnvVar::literal("PRIMARY_SHARDS", "1"),
            EnvVar::literal("REPLICA_SHARDS", "0"),
        ]
    }
}
