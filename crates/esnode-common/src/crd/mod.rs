//! Input types describing a single Elasticsearch node

mod node;
mod quantity;
mod storage;

pub use node::{
    ElasticsearchNodeSpec, NodeDescriptor, NodeRole, ResourceQuantity, ResourceRequirementsSpec,
};
pub use quantity::Quantity;
pub use storage::{
    ClaimReference, ClaimResources, ClaimTemplate, ClaimTemplateSpec, EmptyDirSource,
    HostPathSource, StorageSource, StorageSpec,
};
