//! Node compilation error types
//!
//! Compilation almost never fails: problems with storage or claim
//! provisioning degrade to diagnostics. The variants here are the cases where
//! no sensible output exists.

use esnode_common::Error;
use thiserror::Error;

/// Errors that abort compilation of a single node
#[derive(Debug, Error)]
pub enum CompilationError {
    /// The descriptor's identity fields are unusable
    #[error("invalid node descriptor: {source}")]
    InvalidDescriptor {
        /// Validation failure from the descriptor
        #[from]
        source: Error,
    },

    /// No storage variant was set and strict storage is enabled
    #[error("node '{node}' has no storage configured")]
    StorageUnspecified {
        /// Deployment name of the node
        node: String,
    },
}

impl CompilationError {
    /// Create a storage-unspecified error
    pub fn storage_unspecified(node: &str) -> Self {
        Self::StorageUnspecified {
            node: node.to_string(),
        }
    }
}
