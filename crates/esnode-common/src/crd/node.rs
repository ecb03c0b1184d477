//! Node descriptor: identity, role, security flag and the partial node spec

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::quantity::Quantity;
use super::storage::StorageSpec;
use crate::Error;

// =============================================================================
// Node Role
// =============================================================================

/// Functional class of a cluster member
#[derive(Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Master-eligible node, holds no data
    Master,
    /// Data node
    Data,
    /// Coordinating-only client node
    Client,
}

impl NodeRole {
    /// Label value for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Data => "data",
            Self::Client => "client",
        }
    }

    /// Returns true if the node is master-eligible
    pub fn is_master(&self) -> bool {
        matches!(self, Self::Master)
    }

    /// Returns true if the node stores shard data
    pub fn has_data(&self) -> bool {
        matches!(self, Self::Data)
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Resources
// =============================================================================

/// Optional CPU and memory quantities
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ResourceQuantity {
    /// CPU quantity (e.g., "100m", "1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Quantity>,

    /// Memory quantity (e.g., "512Mi", "4Gi")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Quantity>,
}

/// Partially specified limits and requests
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ResourceRequirementsSpec {
    /// Resource limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceQuantity>,

    /// Resource requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceQuantity>,
}

impl ResourceRequirementsSpec {
    /// CPU limit as given, zero included
    pub fn limit_cpu(&self) -> Option<&Quantity> {
        self.limits.as_ref().and_then(|l| l.cpu.as_ref())
    }

    /// Memory limit as given, zero included
    pub fn limit_memory(&self) -> Option<&Quantity> {
        self.limits.as_ref().and_then(|l| l.memory.as_ref())
    }

    /// CPU request as given, zero included
    pub fn request_cpu(&self) -> Option<&Quantity> {
        self.requests.as_ref().and_then(|r| r.cpu.as_ref())
    }

    /// Memory request as given, zero included
    pub fn request_memory(&self) -> Option<&Quantity> {
        self.requests.as_ref().and_then(|r| r.memory.as_ref())
    }
}

// =============================================================================
// Node Spec
// =============================================================================

/// Desired state of one node; every field may be omitted
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElasticsearchNodeSpec {
    /// CPU and memory hints
    #[serde(default)]
    pub resources: ResourceRequirementsSpec,

    /// Image override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Node selector copied to the pod spec
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,

    /// Persistent storage preference
    #[serde(default)]
    pub storage: StorageSpec,
}

// =============================================================================
// Node Descriptor
// =============================================================================

/// The input aggregate compiled into a pod fragment
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Name of the Elasticsearch cluster this node joins
    pub cluster_name: String,

    /// Deployment name; unique per node
    pub deploy_name: String,

    /// Namespace the node runs in
    pub namespace: String,

    /// Node role
    pub role: NodeRole,

    /// Mount cluster certificates into the node
    #[serde(default)]
    pub secure: bool,

    /// Partially specified node spec
    #[serde(default)]
    pub spec: ElasticsearchNodeSpec,
}

impl NodeDescriptor {
    /// Create a descriptor with an empty spec
    pub fn new(
        cluster_name: impl Into<String>,
        deploy_name: impl Into<String>,
        namespace: impl Into<String>,
        role: NodeRole,
    ) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            deploy_name: deploy_name.into(),
            namespace: namespace.into(),
            role,
            secure: false,
            spec: ElasticsearchNodeSpec::default(),
        }
    }

    /// Set the security flag
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Replace the node spec
    pub fn with_spec(mut self, spec: ElasticsearchNodeSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Parse a descriptor from YAML (JSON is accepted as a subset)
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::serialization_for("NodeDescriptor", e.to_string()))
    }

    /// Check identity fields; names must be non-empty
    pub fn validate(&self) -> Result<(), Error> {
        let node = if self.deploy_name.is_empty() {
            crate::error::UNKNOWN_CONTEXT
        } else {
            self.deploy_name.as_str()
        };

        if self.deploy_name.trim().is_empty() {
            return Err(Error::validation_for_field(
                node,
                "deployName",
                "deployment name must not be empty",
            ));
        }
        if self.cluster_name.trim().is_empty() {
            return Err(Error::validation_for_field(
                node,
                "clusterName",
                "cluster name must not be empty",
            ));
        }
        if self.namespace.trim().is_empty() {
            return Err(Error::validation_for_field(
                node,
                "namespace",
                "namespace must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_flags_follow_role() {
        assert!(NodeRole::Master.is_master());
        assert!(!NodeRole::Master.has_data());
        assert!(NodeRole::Data.has_data());
        assert!(!NodeRole::Data.is_master());
        assert!(!NodeRole::Client.is_master());
        assert!(!NodeRole::Client.has_data());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&NodeRole::Client).expect("serialize"),
            "\"client\""
        );
        assert_eq!(NodeRole::Data.to_string(), "data");
    }

    #[test]
    fn minimal_descriptor_parses_with_empty_spec() {
        let yaml = r#"
clusterName: logging
deployName: es-node-1
namespace: openshift-logging
role: master
"#;
        let descriptor = NodeDescriptor::from_yaml(yaml).expect("valid descriptor");
        assert_eq!(descriptor.role, NodeRole::Master);
        assert!(!descriptor.secure);
        assert_eq!(descriptor.spec, ElasticsearchNodeSpec::default());
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn resource_accessors_see_through_missing_sections() {
        let yaml = r#"
clusterName: logging
deployName: es-node-1
namespace: logging
role: data
spec:
  resources:
    limits:
      memory: 8Gi
"#;
        let descriptor = NodeDescriptor::from_yaml(yaml).expect("valid descriptor");
        let resources = &descriptor.spec.resources;
        assert_eq!(resources.limit_memory().map(Quantity::as_str), Some("8Gi"));
        assert!(resources.limit_cpu().is_none());
        assert!(resources.request_cpu().is_none());
        assert!(resources.request_memory().is_none());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let yaml = "clusterName: a\ndeployName: b\nnamespace: c\nrole: ingest\n";
        let err = NodeDescriptor::from_yaml(yaml).expect_err("ingest is not a role");
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn empty_cluster_name_fails_validation() {
        let descriptor = NodeDescriptor::new("", "es-node-1", "logging", NodeRole::Data);
        let err = descriptor.validate().expect_err("empty cluster name");
        assert_eq!(err.field(), Some("clusterName"));
        assert!(err.to_string().contains("es-node-1"));
    }

    #[test]
    fn empty_deploy_name_fails_validation() {
        let descriptor = NodeDescriptor::new("logging", " ", "logging", NodeRole::Data);
        let err = descriptor.validate().expect_err("blank deploy name");
        assert_eq!(err.field(), Some("deployName"));
    }
}
