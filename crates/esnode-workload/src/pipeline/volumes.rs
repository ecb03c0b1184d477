//! Storage selection and the node's volume layout
//!
//! This module handles:
//! - Picking the primary storage source from the node's `StorageSpec`
//! - Computing the per-node claim for the claim-template variant (the claim is
//!   applied later by the compiler through `ClaimStore`)
//! - The fixed volume table (storage, config, optional certificates) from which
//!   both pod volumes and container mounts are derived

use esnode_common::crd::{NodeDescriptor, StorageSource, StorageSpec};
use esnode_common::kube_utils::ObjectMeta;
use esnode_common::LABEL_CLUSTER;

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::k8s::{PersistentVolumeClaim, PvcSpec, Volume, VolumeMount, VolumeSource};

/// Volume holding the node's data directory
pub const STORAGE_VOLUME: &str = "elasticsearch-storage";
/// Volume holding the cluster ConfigMap
pub const CONFIG_VOLUME: &str = "elasticsearch-config";
/// Volume holding the cluster certificates (secure nodes only)
pub const CERTS_VOLUME: &str = "certificates";

/// Mount path of the data directory
pub const STORAGE_MOUNT_PATH: &str = "/elasticsearch/persistent";
/// Mount path of the configuration
pub const CONFIG_MOUNT_PATH: &str = "/usr/share/java/elasticsearch/config";
/// Mount path of the certificates
pub const CERTS_MOUNT_PATH: &str = "/etc/elasticsearch/secret";

/// Name of the per-node claim provisioned from a template
pub fn claim_name(template_name: &str, deploy_name: &str) -> String {
    format!("{}-{}", template_name, deploy_name)
}

/// Name of the Secret holding cluster certificates
pub fn certs_secret_name(cluster_name: &str) -> String {
    format!("{}-certs", cluster_name)
}

// =============================================================================
// Storage resolution
// =============================================================================

/// Result of resolving the storage spec
#[derive(Clone, Debug, Default)]
pub struct ResolvedStorage {
    /// Source for the storage volume; empty if nothing was configured
    pub source: VolumeSource,
    /// Claim to apply (claim-template variant only)
    pub claim: Option<PersistentVolumeClaim>,
    /// Problems noticed while resolving
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolves a `StorageSpec` into a concrete volume source
pub struct VolumeSourceResolver;

impl VolumeSourceResolver {
    /// Resolve storage for a node. Pure: the claim is returned, not applied.
    pub fn resolve(storage: &StorageSpec, descriptor: &NodeDescriptor) -> ResolvedStorage {
        let mut resolved = ResolvedStorage::default();
        let node = descriptor.deploy_name.as_str();

        let Some(selected) = storage.source() else {
            resolved
                .diagnostics
                .push(Diagnostic::new(node, DiagnosticKind::StorageUnspecified));
            return resolved;
        };

        let populated = storage.populated_count();
        if populated > 1 {
            resolved.diagnostics.push(Diagnostic::new(
                node,
                DiagnosticKind::StorageAmbiguous {
                    selected: selected.kind(),
                    populated,
                },
            ));
        }

        match selected {
            StorageSource::HostPath(host_path) => {
                resolved.source = VolumeSource::host_path(host_path);
            }
            StorageSource::EmptyDir(empty_dir) => {
                resolved.source = VolumeSource::empty_dir(empty_dir);
            }
            StorageSource::ClaimTemplate(template) => {
                let name = claim_name(&template.name, &descriptor.deploy_name);
                let metadata = ObjectMeta::new(&name, &descriptor.namespace)
                    .with_label(LABEL_CLUSTER, &descriptor.cluster_name);
                resolved.claim = Some(PersistentVolumeClaim::new(
                    metadata,
                    PvcSpec::from(&template.spec),
                ));
                resolved.source = VolumeSource::claim(name, None);
            }
            StorageSource::ExistingClaim(reference) => {
                resolved.source = VolumeSource::claim_reference(reference);
            }
        }

        resolved
    }
}

// =============================================================================
// Volume layout
// =============================================================================

/// A pod volume together with the path the container mounts it at
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeBinding {
    /// Pod volume
    pub volume: Volume,
    /// Mount path inside the container
    pub mount_path: &'static str,
}

impl VolumeBinding {
    /// The container mount for this volume
    pub fn mount(&self) -> VolumeMount {
        VolumeMount::new(&self.volume.name, self.mount_path)
    }
}

/// The node's volumes in mount order.
///
/// Storage and config are always present; certificates only when the node is
/// secure. Volumes and mounts are both read from this list.
pub fn node_volume_bindings(
    descriptor: &NodeDescriptor,
    storage: VolumeSource,
) -> Vec<VolumeBinding> {
    let mut bindings = vec![
        VolumeBinding {
            volume: Volume::new(STORAGE_VOLUME, storage),
            mount_path: STORAGE_MOUNT_PATH,
        },
        VolumeBinding {
            volume: Volume::new(
                CONFIG_VOLUME,
                VolumeSource::config_map(&descriptor.cluster_name),
            ),
            mount_path: CONFIG_MOUNT_PATH,
        },
    ];

    if descriptor.secure {
        bindings.push(VolumeBinding {
            volume: Volume::new(
                CERTS_VOLUME,
                VolumeSource::secret(certs_secret_name(&descriptor.cluster_name)),
            ),
            mount_path: CERTS_MOUNT_PATH,
        });
    }

    bindings
}
