//! Common types for the Elasticsearch node compiler: descriptors, defaults, errors

#![deny(missing_docs)]

pub mod config;
pub mod crd;
pub mod defaults;
pub mod error;
pub mod kube_utils;
pub mod telemetry;

pub use defaults::NodeDefaults;
pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Field manager used for server-side apply unless overridden in config
pub const DEFAULT_FIELD_MANAGER: &str = "esnode-operator";

/// Label key carrying the node role, used by the anti-affinity selector
pub const LABEL_ROLE: &str = "role";

/// Label key carrying the cluster name
pub const LABEL_CLUSTER: &str = "cluster";

/// Standard Kubernetes name label
pub const LABEL_NAME: &str = "app.kubernetes.io/name";

/// Standard Kubernetes managed-by label
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Value for the managed-by label on every object this crate produces
pub const LABEL_MANAGED_BY_ESNODE: &str = "esnode-operator";
