//! NodeCompiler: orchestrates the compilation pipeline for one node
//!
//! Every stage except claim provisioning is pure. The claim computed by the
//! volume resolver is applied here exactly once, and a failed apply is
//! reported as a diagnostic rather than aborting the node.

use esnode_common::crd::NodeDescriptor;
use esnode_common::NodeDefaults;
use tracing::debug;

use crate::compiled::CompiledNode;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::CompilationError;
use crate::k8s::PodSpec;
use crate::pipeline::container::ContainerSpecBuilder;
use crate::pipeline::resources::ResourceResolver;
use crate::pipeline::scheduling::anti_affinity;
use crate::pipeline::volumes::{node_volume_bindings, VolumeSourceResolver};
use crate::store::ClaimStore;

/// Compiles a `NodeDescriptor` into a pod spec plus side outputs.
///
/// ```rust,ignore
/// let compiled = NodeCompiler::new(&descriptor, &config.defaults)
///     .with_strict_storage(config.strict_storage)
///     .compile(&store)
///     .await?;
/// compiled.emit_diagnostics();
/// ```
pub struct NodeCompiler<'a> {
    descriptor: &'a NodeDescriptor,
    defaults: &'a NodeDefaults,
    strict_storage: bool,
}

impl<'a> NodeCompiler<'a> {
    /// Create a compiler for one node
    pub fn new(descriptor: &'a NodeDescriptor, defaults: &'a NodeDefaults) -> Self {
        Self {
            descriptor,
            defaults,
            strict_storage: false,
        }
    }

    /// Refuse to compile nodes without any storage variant
    pub fn with_strict_storage(mut self, strict: bool) -> Self {
        self.strict_storage = strict;
        self
    }

    /// Run the pipeline, applying the node's claim through `store` if it has one
    pub async fn compile(self, store: &dyn ClaimStore) -> Result<CompiledNode, CompilationError> {
        let descriptor = self.descriptor;
        descriptor.validate()?;

        let node = descriptor.deploy_name.as_str();
        debug!(node = %node, role = %descriptor.role, secure = descriptor.secure, "Compiling node");

        let mut diagnostics = Vec::new();

        let resources = ResourceResolver::new(self.defaults).resolve(&descriptor.spec.resources);
        diagnostics.push(Diagnostic::new(
            node,
            DiagnosticKind::MemoryLimitSelected {
                memory_limit: resources.memory_limit.to_string(),
            },
        ));

        let storage = VolumeSourceResolver::resolve(&descriptor.spec.storage, descriptor);
        if self.strict_storage && storage.source.is_empty() {
            return Err(CompilationError::storage_unspecified(node));
        }
        diagnostics.extend(storage.diagnostics);

        if let Some(claim) = &storage.claim {
            if let Err(e) = store.apply_claim(claim).await {
                diagnostics.push(Diagnostic::new(
                    node,
                    DiagnosticKind::ClaimProvisionFailed {
                        claim: claim.metadata.name.clone(),
                        error: e.to_string(),
                    },
                ));
            }
        }

        let bindings = node_volume_bindings(descriptor, storage.source);
        let container =
            ContainerSpecBuilder::new(descriptor, &resources, self.defaults).build(&bindings);

        let pod_spec = PodSpec {
            containers: vec![container],
            volumes: bindings.into_iter().map(|b| b.volume).collect(),
            affinity: Some(anti_affinity(descriptor.role)),
            node_selector: descriptor.spec.node_selector.clone(),
        };

        Ok(CompiledNode {
            pod_spec,
            claim: storage.claim,
            resources,
            diagnostics,
        })
    }
}
