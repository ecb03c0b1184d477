//! Compiled node output types

use crate::diagnostics::{Diagnostic, Severity};
use crate::k8s::{PersistentVolumeClaim, PodSpec};
use crate::pipeline::resources::ResolvedResources;

/// Everything compilation produced for one node.
///
/// The caller wraps `pod_spec` in its own Deployment or DeploymentConfig.
#[derive(Clone, Debug)]
pub struct CompiledNode {
    /// Pod spec: the Elasticsearch container, its volumes and scheduling rules
    pub pod_spec: PodSpec,
    /// Claim provisioned for the claim-template storage variant
    pub claim: Option<PersistentVolumeClaim>,
    /// Resolved resource quantities
    pub resources: ResolvedResources,
    /// Problems and notes collected while compiling
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledNode {
    /// Log every diagnostic at its severity
    pub fn emit_diagnostics(&self) {
        for diagnostic in &self.diagnostics {
            diagnostic.emit();
        }
    }

    /// Whether any diagnostic is an error
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Error)
    }
}
