//! Elasticsearch container assembly
//!
//! Pure aggregation: resources, environment, probe and mounts come from the
//! other pipeline stages. Mounts are read from the same `VolumeBinding` list
//! that produces the pod volumes, so the two cannot diverge.

use esnode_common::crd::NodeDescriptor;
use esnode_common::defaults::{REST_API_PORT, TRANSPORT_PORT};
use esnode_common::NodeDefaults;

use super::env::EnvironmentComposer;
use super::resources::ResolvedResources;
use super::scheduling::readiness_probe;
use super::volumes::VolumeBinding;
use crate::k8s::{Container, ContainerPort};

/// Name of the container in the pod
pub const CONTAINER_NAME: &str = "elasticsearch";

/// Builds the Elasticsearch container for one node
pub struct ContainerSpecBuilder<'a> {
    descriptor: &'a NodeDescriptor,
    resources: &'a ResolvedResources,
    defaults: &'a NodeDefaults,
}

impl<'a> ContainerSpecBuilder<'a> {
    /// Create a builder for a node with already-resolved resources
    pub fn new(
        descriptor: &'a NodeDescriptor,
        resources: &'a ResolvedResources,
        defaults: &'a NodeDefaults,
    ) -> Self {
        Self {
            descriptor,
            resources,
            defaults,
        }
    }

    /// Image override from the node spec, or the default image
    pub fn image(&self) -> &'a str {
        self.descriptor
            .spec
            .image
            .as_deref()
            .filter(|image| !image.is_empty())
            .unwrap_or(&self.defaults.image)
    }

    /// Build the container, mounting every binding in order
    pub fn build(&self, bindings: &[VolumeBinding]) -> Container {
        let probe = readiness_probe(&self.defaults.probe);

        Container {
            name: CONTAINER_NAME.to_string(),
            image: self.image().to_string(),
            image_pull_policy: Some("Always".to_string()),
            env: EnvironmentComposer::compose(self.descriptor, self.resources, self.defaults),
            ports: vec![
                ContainerPort::tcp("cluster", TRANSPORT_PORT),
                ContainerPort::tcp("restapi", REST_API_PORT),
            ],
            resources: Some(self.resources.to_requirements()),
            liveness_probe: Some(probe.clone()),
            readiness_probe: Some(probe),
            volume_mounts: bindings.iter().map(VolumeBinding::mount).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::k8s::VolumeSource;
    use crate::pipeline::resources::ResourceResolver;
    use crate::pipeline::volumes::{
        node_volume_bindings, CERTS_MOUNT_PATH, CERTS_VOLUME, CONFIG_MOUNT_PATH, STORAGE_MOUNT_PATH,
    };
    use esnode_common::crd::NodeRole;

    fn build(descriptor: &NodeDescriptor) -> Container {
        let defaults = NodeDefaults::default();
        let resources = ResourceResolver::new(&defaults).resolve(&descriptor.spec.resources);
        let bindings = node_volume_bindings(descriptor, VolumeSource::default());
        ContainerSpecBuilder::new(descriptor, &resources, &defaults).build(&bindings)
    }

    #[test]
    fn default_image_when_no_override() {
        let descriptor = NodeDescriptor::new("logging", "es-node-1", "logging", NodeRole::Master);
        assert_eq!(build(&descriptor).image, "docker.io/t0ffel/elasticsearch5");
    }

    #[test]
    fn override_image_is_used() {
        let mut descriptor =
            NodeDescriptor::new("logging", "es-node-1", "logging", NodeRole::Master);
        descriptor.spec.image = Some("registry.example.com/es:5.6".to_string());
        assert_eq!(build(&descriptor).image, "registry.example.com/es:5.6");
    }

    #[test]
    fn empty_image_override_falls_back() {
        let mut descriptor =
            NodeDescriptor::new("logging", "es-node-1", "logging", NodeRole::Master);
        descriptor.spec.image = Some(String::new());
        assert_eq!(build(&descriptor).image, "docker.io/t0ffel/elasticsearch5");
    }

    #[test]
    fn exposes_transport_and_rest_ports() {
        let descriptor = NodeDescriptor::new("logging", "es-node-1", "logging", NodeRole::Data);
        let ports: Vec<_> = build(&descriptor)
            .ports
            .into_iter()
            .map(|p| (p.name.unwrap_or_default(), p.container_port, p.protocol))
            .collect();
        assert_eq!(
            ports,
            vec![
                ("cluster".to_string(), 9300, Some("TCP".to_string())),
                ("restapi".to_string(), 9200, Some("TCP".to_string())),
            ]
        );
    }

    #[test]
    fn readiness_and_liveness_share_one_probe() {
        let descriptor = NodeDescriptor::new("logging", "es-node-1", "logging", NodeRole::Data);
        let container = build(&descriptor);
        assert!(container.readiness_probe.is_some());
        assert_eq!(container.readiness_probe, container.liveness_probe);
    }

    #[test]
    fn insecure_node_mounts_storage_and_config() {
        let descriptor = NodeDescriptor::new("logging", "es-node-1", "logging", NodeRole::Data);
        let paths: Vec<_> = build(&descriptor)
            .volume_mounts
            .into_iter()
            .map(|m| m.mount_path)
            .collect();
        assert_eq!(paths, vec![STORAGE_MOUNT_PATH, CONFIG_MOUNT_PATH]);
    }

    #[test]
    fn secure_node_mounts_certificates() {
        let descriptor = NodeDescriptor::new("logging", "es-node-1", "logging", NodeRole::Data)
            .with_secure(true);
        let mounts = build(&descriptor).volume_mounts;
        assert_eq!(mounts.len(), 3);
        assert_eq!(mounts[2].name, CERTS_VOLUME);
        assert_eq!(mounts[2].mount_path, CERTS_MOUNT_PATH);
    }

    #[test]
    fn pull_policy_is_always() {
        let descriptor = NodeDescriptor::new("logging", "es-node-1", "logging", NodeRole::Client);
        let container = build(&descriptor);
        assert_eq!(container.name, "elasticsearch");
        assert_eq!(container.image_pull_policy.as_deref(), Some("Always"));
    }
}
