//! Elasticsearch node compilation
//!
//! Compiles a `NodeDescriptor` into the Kubernetes fragments that make up one
//! Elasticsearch node: the container, its volumes, scheduling rules and, for
//! the claim-template storage variant, a per-node PersistentVolumeClaim. The
//! caller wraps the pod spec in its own Deployment.
//!
//! # Usage
//!
//! ```rust,ignore
//! let store = KubeClaimStore::new(client, &config.field_manager);
//! let compiled = NodeCompiler::new(&descriptor, &config.defaults)
//!     .with_strict_storage(config.strict_storage)
//!     .compile(&store)
//!     .await?;
//! compiled.emit_diagnostics();
//! ```

mod compiled;
mod compiler;
pub mod diagnostics;
pub mod error;
pub mod k8s;
pub mod store;

pub mod pipeline;

pub use compiled::CompiledNode;
pub use compiler::NodeCompiler;
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use error::CompilationError;
pub use pipeline::container::ContainerSpecBuilder;
pub use pipeline::env::EnvironmentComposer;
pub use pipeline::resources::{ResolvedResources, ResourceResolver};
pub use pipeline::volumes::{ResolvedStorage, VolumeBinding, VolumeSourceResolver};
pub use store::{ClaimStore, KubeClaimStore};
