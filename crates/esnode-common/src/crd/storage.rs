//! Storage preference for a node's primary data volume
//!
//! The wire shape mirrors a Kubernetes volume source: four optional fields of
//! which exactly one is expected to be set. `StorageSpec::source` is the only
//! place that picks between them, in a fixed precedence order:
//!
//! 1. `hostPath`
//! 2. `emptyDir`
//! 3. `volumeClaimTemplate` (provision a claim per node)
//! 4. `persistentVolumeClaim` (reference an existing claim)

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::quantity::Quantity;

/// Storage for the node's data directory
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageSpec {
    /// Directory on the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<HostPathSource>,

    /// Ephemeral directory that lives as long as the pod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub empty_dir: Option<EmptyDirSource>,

    /// Template for a claim provisioned per node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_claim_template: Option<ClaimTemplate>,

    /// Existing claim to bind to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent_volume_claim: Option<ClaimReference>,
}

/// The storage variant selected from a `StorageSpec`
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StorageSource<'a> {
    /// Host directory pass-through
    HostPath(&'a HostPathSource),
    /// Ephemeral directory pass-through
    EmptyDir(&'a EmptyDirSource),
    /// Claim provisioned from a template
    ClaimTemplate(&'a ClaimTemplate),
    /// Pre-existing claim
    ExistingClaim(&'a ClaimReference),
}

impl StorageSource<'_> {
    /// Short name of the variant for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::HostPath(_) => "hostPath",
            Self::EmptyDir(_) => "emptyDir",
            Self::ClaimTemplate(_) => "volumeClaimTemplate",
            Self::ExistingClaim(_) => "persistentVolumeClaim",
        }
    }
}

impl StorageSpec {
    /// Select the storage variant by precedence, `None` if nothing is set
    pub fn source(&self) -> Option<StorageSource<'_>> {
        if let Some(host_path) = &self.host_path {
            return Some(StorageSource::HostPath(host_path));
        }
        if let Some(empty_dir) = &self.empty_dir {
            return Some(StorageSource::EmptyDir(empty_dir));
        }
        if let Some(template) = &self.volume_claim_template {
            return Some(StorageSource::ClaimTemplate(template));
        }
        self.persistent_volume_claim
            .as_ref()
            .map(StorageSource::ExistingClaim)
    }

    /// Number of variants populated; more than one is a caller mistake
    pub fn populated_count(&self) -> usize {
        [
            self.host_path.is_some(),
            self.empty_dir.is_some(),
            self.volume_claim_template.is_some(),
            self.persistent_volume_claim.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// Host directory volume
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct HostPathSource {
    /// Path on the host
    pub path: String,

    /// Host path type (e.g., "DirectoryOrCreate")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

/// Ephemeral directory volume
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmptyDirSource {
    /// Storage medium ("Memory" for tmpfs, empty for node disk)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,

    /// Size limit (e.g., "10Gi")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<Quantity>,
}

/// Template for a per-node persistent volume claim
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ClaimTemplate {
    /// Template name; the claim is named `<name>-<deployName>`
    pub name: String,

    /// Claim spec applied verbatim
    pub spec: ClaimTemplateSpec,
}

/// Persistent volume claim spec
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimTemplateSpec {
    /// Access modes (ReadWriteOnce, ReadWriteMany, ReadOnlyMany)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_modes: Vec<String>,

    /// Storage requests
    #[serde(default)]
    pub resources: ClaimResources,

    /// Storage class name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_class_name: Option<String>,
}

/// Claim resource requests (e.g., `storage: 10Gi`)
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ClaimResources {
    /// Requested quantities keyed by resource name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requests: BTreeMap<String, Quantity>,
}

/// Reference to an existing claim
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReference {
    /// Claim name
    pub claim_name: String,

    /// Mount read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_path() -> HostPathSource {
        HostPathSource {
            path: "/var/lib/es".to_string(),
            type_: None,
        }
    }

    fn template() -> ClaimTemplate {
        ClaimTemplate {
            name: "data".to_string(),
            spec: ClaimTemplateSpec::default(),
        }
    }

    fn existing() -> ClaimReference {
        ClaimReference {
            claim_name: "prebound".to_string(),
            read_only: None,
        }
    }

    #[test]
    fn nothing_set_selects_nothing() {
        let spec = StorageSpec::default();
        assert!(spec.source().is_none());
        assert_eq!(spec.populated_count(), 0);
    }

    #[test]
    fn host_path_wins_over_everything() {
        let spec = StorageSpec {
            host_path: Some(host_path()),
            empty_dir: Some(EmptyDirSource::default()),
            volume_claim_template: Some(template()),
            persistent_volume_claim: Some(existing()),
        };
        assert!(matches!(spec.source(), Some(StorageSource::HostPath(_))));
        assert_eq!(spec.populated_count(), 4);
    }

    #[test]
    fn empty_dir_wins_over_claims() {
        let spec = StorageSpec {
            empty_dir: Some(EmptyDirSource::default()),
            volume_claim_template: Some(template()),
            persistent_volume_claim: Some(existing()),
            ..Default::default()
        };
        assert!(matches!(spec.source(), Some(StorageSource::EmptyDir(_))));
    }

    #[test]
    fn template_wins_over_existing_claim() {
        let spec = StorageSpec {
            volume_claim_template: Some(template()),
            persistent_volume_claim: Some(existing()),
            ..Default::default()
        };
        let source = spec.source().expect("template selected");
        assert_eq!(source.kind(), "volumeClaimTemplate");
    }

    #[test]
    fn existing_claim_alone_is_selected() {
        let spec = StorageSpec {
            persistent_volume_claim: Some(existing()),
            ..Default::default()
        };
        match spec.source() {
            Some(StorageSource::ExistingClaim(claim)) => assert_eq!(claim.claim_name, "prebound"),
            other => panic!("unexpected source: {other:?}"),
        }
    }

    #[test]
    fn claim_template_parses_kubernetes_shape() {
        let yaml = r#"
volumeClaimTemplate:
  name: data
  spec:
    accessModes: [ReadWriteOnce]
    resources:
      requests:
        storage: 10Gi
    storageClassName: gp2
"#;
        let spec: StorageSpec = serde_yaml::from_str(yaml).expect("valid storage");
        let template = spec.volume_claim_template.expect("template set");
        assert_eq!(template.spec.access_modes, vec!["ReadWriteOnce"]);
        assert_eq!(
            template.spec.resources.requests.get("storage"),
            Some(&Quantity::from("10Gi"))
        );
        assert_eq!(template.spec.storage_class_name.as_deref(), Some("gp2"));
    }
}
