//! Shared Kubernetes helpers

use std::collections::BTreeMap;

// =============================================================================
// ObjectMeta - Canonical Kubernetes metadata for all compiled resources
// =============================================================================

/// Standard Kubernetes ObjectMeta for compiled resources.
///
/// Automatically adds the name and managed-by labels on construction.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name
    pub name: String,
    /// Resource namespace
    pub namespace: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Create new metadata with standard labels
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        let name = name.into();
        let mut labels = BTreeMap::new();
        labels.insert(crate::LABEL_NAME.to_string(), name.clone());
        labels.insert(
            crate::LABEL_MANAGED_BY.to_string(),
            crate::LABEL_MANAGED_BY_ESNODE.to_string(),
        );
        Self {
            name,
            namespace: namespace.into(),
            labels,
            annotations: BTreeMap::new(),
        }
    }

    /// Add a label
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metadata_carries_standard_labels() {
        let meta = ObjectMeta::new("data-es-node-1", "logging");
        assert_eq!(meta.name, "data-es-node-1");
        assert_eq!(meta.namespace, "logging");
        assert_eq!(
            meta.labels.get(crate::LABEL_NAME).map(String::as_str),
            Some("data-es-node-1")
        );
        assert_eq!(
            meta.labels.get(crate::LABEL_MANAGED_BY).map(String::as_str),
            Some("esnode-operator")
        );
    }

    #[test]
    fn extra_labels_are_added() {
        let meta = ObjectMeta::new("x", "ns").with_label(crate::LABEL_CLUSTER, "logging");
        assert_eq!(
            meta.labels.get("cluster").map(String::as_str),
            Some("logging")
        );
    }

    #[test]
    fn empty_annotations_are_not_serialized() {
        let json = serde_json::to_value(ObjectMeta::new("x", "ns")).expect("serialize");
        assert!(json.get("annotations").is_none());
        assert!(json.get("labels").is_some());
    }
}
