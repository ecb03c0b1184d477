//! Structured diagnostics collected while compiling a node
//!
//! Resolvers never log. They return `Diagnostic` values next to their results
//! and the caller decides when and where to emit them.

use std::fmt;

use tracing::{error, info, warn};

/// How serious a diagnostic is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Operability record, nothing is wrong
    Info,
    /// The node compiled but probably won't work as intended
    Warning,
    /// A side effect failed; the output may reference missing objects
    Error,
}

/// What happened
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticKind {
    /// The memory limit (and instance RAM) chosen for the node
    MemoryLimitSelected {
        /// Resolved memory limit
        memory_limit: String,
    },
    /// No storage variant was set; the storage volume has an empty source
    StorageUnspecified,
    /// More than one storage variant was set; the highest-precedence one won
    StorageAmbiguous {
        /// Variant that was used
        selected: &'static str,
        /// How many variants were set
        populated: usize,
    },
    /// Applying the per-node claim failed; the volume still references it
    ClaimProvisionFailed {
        /// Claim name
        claim: String,
        /// Error reported by the store
        error: String,
    },
}

/// A single diagnostic tied to a node
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Deployment name of the node
    pub node: String,
    /// What happened
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Create a diagnostic for a node
    pub fn new(node: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            node: node.into(),
            kind,
        }
    }

    /// Severity derived from the kind
    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::MemoryLimitSelected { .. } => Severity::Info,
            DiagnosticKind::StorageUnspecified | DiagnosticKind::StorageAmbiguous { .. } => {
                Severity::Warning
            }
            DiagnosticKind::ClaimProvisionFailed { .. } => Severity::Error,
        }
    }

    /// Write the diagnostic to the tracing subscriber at its severity
    pub fn emit(&self) {
        match self.severity() {
            Severity::Info => info!(node = %self.node, "{}", self.kind),
            Severity::Warning => warn!(node = %self.node, "{}", self.kind),
            Severity::Error => error!(node = %self.node, "{}", self.kind),
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MemoryLimitSelected { memory_limit } => {
                write!(f, "using memory limit {}", memory_limit)
            }
            Self::StorageUnspecified => {
                write!(f, "no storage configured, storage volume has no source")
            }
            Self::StorageAmbiguous {
                selected,
                populated,
            } => write!(
                f,
                "{} storage variants set, using {}",
                populated, selected
            ),
            Self::ClaimProvisionFailed { claim, error } => {
                write!(f, "unable to create PersistentVolumeClaim {}: {}", claim, error)
            }
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.node, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities_follow_kind() {
        let info = Diagnostic::new(
            "n",
            DiagnosticKind::MemoryLimitSelected {
                memory_limit: "4Gi".to_string(),
            },
        );
        let warning = Diagnostic::new("n", DiagnosticKind::StorageUnspecified);
        let failure = Diagnostic::new(
            "n",
            DiagnosticKind::ClaimProvisionFailed {
                claim: "data-n".to_string(),
                error: "forbidden".to_string(),
            },
        );
        assert_eq!(info.severity(), Severity::Info);
        assert_eq!(warning.severity(), Severity::Warning);
        assert_eq!(failure.severity(), Severity::Error);
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn display_names_node_and_detail() {
        let diag = Diagnostic::new(
            "es-node-1",
            DiagnosticKind::ClaimProvisionFailed {
                claim: "data-es-node-1".to_string(),
                error: "quota exceeded".to_string(),
            },
        );
        let display = diag.to_string();
        assert!(display.contains("es-node-1"));
        assert!(display.contains("data-es-node-1"));
        assert!(display.contains("quota exceeded"));
    }

    #[test]
    fn ambiguous_storage_reports_winner() {
        let kind = DiagnosticKind::StorageAmbiguous {
            selected: "hostPath",
            populated: 2,
        };
        assert_eq!(kind.to_string(), "2 storage variants set, using hostPath");
    }
}
