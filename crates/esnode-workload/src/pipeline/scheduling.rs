//! Health probe and anti-affinity policy
//!
//! The probe only checks that the transport socket accepts connections; the
//! same descriptor serves readiness and liveness. The anti-affinity rule is a
//! preference, never a requirement, so small clusters still schedule.

use esnode_common::crd::NodeRole;
use esnode_common::defaults::{ProbeDefaults, TRANSPORT_PORT};
use esnode_common::LABEL_ROLE;

use crate::k8s::{
    Affinity, LabelSelector, LabelSelectorRequirement, PodAffinityTerm, PodAntiAffinity, Probe,
    TcpSocketAction, WeightedPodAffinityTerm,
};

/// Weight of the anti-affinity preference
pub const ANTI_AFFINITY_WEIGHT: i32 = 100;

/// Topology key scoping the anti-affinity rule to a single host
pub const HOSTNAME_TOPOLOGY_KEY: &str = "kubernetes.io/hostname";

/// TCP check on the transport port
pub fn readiness_probe(probe: &ProbeDefaults) -> Probe {
    Probe {
        tcp_socket: Some(TcpSocketAction {
            port: TRANSPORT_PORT,
        }),
        initial_delay_seconds: Some(probe.initial_delay_seconds),
        timeout_seconds: Some(probe.timeout_seconds),
        failure_threshold: Some(probe.failure_threshold),
    }
}

/// Prefer not to co-locate two pods of the same role on one host
pub fn anti_affinity(role: NodeRole) -> Affinity {
    Affinity {
        pod_anti_affinity: Some(PodAntiAffinity {
            preferred_during_scheduling_ignored_during_execution: vec![WeightedPodAffinityTerm {
                weight: ANTI_AFFINITY_WEIGHT,
                pod_affinity_term: PodAffinityTerm {
                    label_selector: LabelSelector {
                        match_expressions: vec![LabelSelectorRequirement {
                            key: LABEL_ROLE.to_string(),
                            operator: "In".to_string(),
                            values: vec![role.as_str().to_string()],
                        }],
                    },
                    topology_key: HOSTNAME_TOPOLOGY_KEY.to_string(),
                },
            }],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_targets_transport_port() {
        let probe = readiness_probe(&ProbeDefaults::default());
        assert_eq!(probe.tcp_socket.map(|t| t.port), Some(9300));
        assert_eq!(probe.initial_delay_seconds, Some(10));
        assert_eq!(probe.timeout_seconds, Some(30));
        assert_eq!(probe.failure_threshold, Some(15));
    }

    #[test]
    fn anti_affinity_is_single_preferred_term() {
        let affinity = anti_affinity(NodeRole::Master);
        let json = serde_json::to_value(&affinity).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "podAntiAffinity": {
                    "preferredDuringSchedulingIgnoredDuringExecution": [{
                        "weight": 100,
                        "podAffinityTerm": {
                            "labelSelector": {
                                "matchExpressions": [{
                                    "key": "role",
                                    "operator": "In",
                                    "values": ["master"]
                                }]
                            },
                            "topologyKey": "kubernetes.io/hostname"
                        }
                    }]
                }
            })
        );
    }

    #[test]
    fn anti_affinity_matches_own_role() {
        let anti = anti_affinity(NodeRole::Client)
            .pod_anti_affinity
            .expect("anti-affinity set");
        let term = &anti.preferred_during_scheduling_ignored_during_execution[0];
        assert_eq!(
            term.pod_affinity_term.label_selector.match_expressions[0].values,
            vec!["client"]
        );
    }
}
