//! Claim persistence
//!
//! The compiler applies the per-node PersistentVolumeClaim through this trait
//! so that compilation itself stays testable without a cluster.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::PersistentVolumeClaim as KubePersistentVolumeClaim;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client};
use tracing::debug;

use esnode_common::Error;

#[cfg(test)]
use mockall::automock;

use crate::k8s::PersistentVolumeClaim;

/// Applies claims to the cluster
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Create or update the claim. Applying an unchanged claim is a no-op.
    async fn apply_claim(&self, claim: &PersistentVolumeClaim) -> Result<(), Error>;
}

/// `ClaimStore` backed by server-side apply against the Kubernetes API
pub struct KubeClaimStore {
    client: Client,
    field_manager: String,
}

impl KubeClaimStore {
    /// Create a store that applies claims as `field_manager`
    pub fn new(client: Client, field_manager: impl Into<String>) -> Self {
        Self {
            client,
            field_manager: field_manager.into(),
        }
    }
}

#[async_trait]
impl ClaimStore for KubeClaimStore {
    async fn apply_claim(&self, claim: &PersistentVolumeClaim) -> Result<(), Error> {
        let name = &claim.metadata.name;
        let namespace = &claim.metadata.namespace;
        let api: Api<KubePersistentVolumeClaim> =
            Api::namespaced(self.client.clone(), namespace);
        let params = PatchParams::apply(&self.field_manager).force();

        api.patch(name, &params, &Patch::Apply(claim)).await?;

        debug!(claim = %name, namespace = %namespace, "Applied PersistentVolumeClaim");
        Ok(())
    }
}
