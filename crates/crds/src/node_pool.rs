//! GKE node pool request builder
//!
//! Translates a GCPManagedMachinePool into the `NodePool` message sent when
//! creating the node pool in GKE.

use gke_api::{
    MaxPodsConstraint, NodeConfig, NodeNetworkConfig, NodePool, SandboxConfig, SandboxType,
    ShieldedInstanceConfig,
};
use tracing::{debug, warn};

use crate::labels::build_resource_labels;
use crate::managed_machine_pool::GCPManagedMachinePool;
use crate::scaling::to_sdk_autoscaling;
use crate::taint::to_sdk_taints;

/// Zones a regional node pool spans when no node locations are given
pub const DEFAULT_NUM_ZONES_PER_REGION: i32 = 3;

/// Builds the GKE node pool create request
///
/// `replicas` is the desired total node count of the machine pool. GKE counts
/// `initialNodeCount` per zone for regional clusters, so it is divided by the
/// number of zones the pool spans.
pub fn to_sdk_node_pool(
    pool: &GCPManagedMachinePool,
    replicas: i32,
    regional: bool,
    cluster_name: &str,
) -> NodePool {
    let spec = &pool.spec;
    let locations = spec.node_locations.clone().unwrap_or_default();

    let initial_node_count = if regional {
        let zones = if locations.is_empty() {
            DEFAULT_NUM_ZONES_PER_REGION
        } else {
            i32::try_from(locations.len()).unwrap_or(i32::MAX)
        };
        debug!("Regional node pool: {} replicas over {} zones", replicas, zones);
        replicas / zones
    } else {
        replicas
    };

    let mut config = NodeConfig {
        labels: spec.kubernetes_labels.clone().unwrap_or_default(),
        taints: to_sdk_taints(spec.kubernetes_taints.as_deref()).unwrap_or_default(),
        resource_labels: build_resource_labels(cluster_name, spec.additional_labels.as_ref()),
        ..Default::default()
    };
    if let Some(instance_type) = &spec.instance_type {
        config.machine_type.clone_from(instance_type);
    }
    if let Some(image_type) = &spec.image_type {
        config.image_type.clone_from(image_type);
    }
    if let Some(disk_type) = spec.disk_type {
        config.disk_type = disk_type.as_str().to_string();
    }
    if let Some(disk_size_gb) = spec.disk_size_gb {
        config.disk_size_gb = i32::try_from(disk_size_gb).unwrap_or_else(|_| {
            warn!("Disk size {}GB does not fit the API field, clamping", disk_size_gb);
            i32::MAX
        });
    }
    if let Some(tags) = spec.node_network.tags.as_ref().filter(|tags| !tags.is_empty()) {
        config.tags.clone_from(tags);
    }

    let security = &spec.node_security;
    if let Some(email) = &security.service_account.email {
        config.service_account.clone_from(email);
    }
    if let Some(scopes) = security.service_account.scopes.as_ref().filter(|s| !s.is_empty()) {
        config.oauth_scopes.clone_from(scopes);
    }
    if let Some(sandbox_type) = &security.sandbox_type {
        config.sandbox_config = Some(SandboxConfig {
            sandbox_type: sandbox_type_from_name(sandbox_type),
        });
    }
    if security.enable_secure_boot.is_some() || security.enable_integrity_monitoring.is_some() {
        config.shielded_instance_config = Some(ShieldedInstanceConfig {
            enable_secure_boot: security.enable_secure_boot.unwrap_or_default(),
            enable_integrity_monitoring: security.enable_integrity_monitoring.unwrap_or_default(),
        });
    }

    let network = &spec.node_network;
    let network_config = network.has_pod_range().then(|| NodeNetworkConfig {
        create_pod_range: network.create_pod_range.unwrap_or_default(),
        pod_range: network.pod_range_name.clone().unwrap_or_default(),
        pod_ipv4_cidr_block: network.pod_range_cidr_block.clone().unwrap_or_default(),
    });

    NodePool {
        name: pool.node_pool_name().to_string(),
        config: Some(config),
        initial_node_count,
        locations,
        network_config,
        autoscaling: to_sdk_autoscaling(spec.scaling.as_ref()),
        max_pods_constraint: spec
            .max_pods_per_node
            .map(|max_pods_per_node| MaxPodsConstraint { max_pods_per_node }),
    }
}

/// Sandbox type for a user supplied name; unknown names are unspecified
fn sandbox_type_from_name(name: &str) -> SandboxType {
    if name.eq_ignore_ascii_case("gvisor") {
        SandboxType::Gvisor
    } else {
        warn!("Unknown sandbox type {}, sending UNSPECIFIED", name);
        SandboxType::Unspecified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::Labels;
    use crate::managed_machine_pool::{DiskType, GCPManagedMachinePoolSpec};
    use crate::scaling::NodePoolAutoScaling;
    use crate::taint::{Taint, TaintEffect};
    use gke_api::{LocationPolicy, NodeTaint, NodeTaintEffect};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn pool(spec: GCPManagedMachinePoolSpec) -> GCPManagedMachinePool {
        GCPManagedMachinePool {
            metadata: ObjectMeta {
                name: Some("workers".to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            spec,
            status: None,
        }
    }

    fn zones(names: &[&str]) -> Option<Vec<String>> {
        Some(names.iter().map(|z| (*z).to_string()).collect())
    }

    #[test]
    fn test_minimal_pool() {
        let node_pool = to_sdk_node_pool(&pool(GCPManagedMachinePoolSpec::default()), 3, false, "prod");

        assert_eq!(node_pool.name, "workers");
        assert_eq!(node_pool.initial_node_count, 3);
        assert!(node_pool.locations.is_empty());
        assert!(node_pool.autoscaling.is_none());
        assert!(node_pool.max_pods_constraint.is_none());
        assert!(node_pool.network_config.is_none());

        let config = node_pool.config.unwrap();
        assert!(config.taints.is_empty());
        assert!(config.sandbox_config.is_none());
        assert!(config.shielded_instance_config.is_none());
        assert_eq!(
            config.resource_labels,
            Labels::from([("capg-cluster-prod".to_string(), "owned".to_string())])
        );
    }

    #[test]
    fn test_regional_divides_by_locations() {
        let spec = GCPManagedMachinePoolSpec {
            node_locations: zones(&["us-east1-b", "us-east1-c"]),
            ..Default::default()
        };
        let node_pool = to_sdk_node_pool(&pool(spec), 6, true, "prod");
        assert_eq!(node_pool.initial_node_count, 3);
        assert_eq!(node_pool.locations, vec!["us-east1-b", "us-east1-c"]);
    }

    #[test]
    fn test_regional_defaults_to_three_zones() {
        let node_pool = to_sdk_node_pool(&pool(GCPManagedMachinePoolSpec::default()), 7, true, "prod");
        // Integer division, like the API expects per-zone counts
        assert_eq!(node_pool.initial_node_count, 2);
    }

    #[test]
    fn test_zonal_ignores_locations_for_count() {
        let spec = GCPManagedMachinePoolSpec {
            node_locations: zones(&["us-east1-b", "us-east1-c"]),
            ..Default::default()
        };
        let node_pool = to_sdk_node_pool(&pool(spec), 6, false, "prod");
        assert_eq!(node_pool.initial_node_count, 6);
    }

    #[test]
    fn test_full_pool() {
        let mut spec = GCPManagedMachinePoolSpec {
            node_pool_name: "gke-workers".to_string(),
            scaling: Some(NodePoolAutoScaling {
                min_count: Some(1),
                max_count: Some(5),
                ..Default::default()
            }),
            image_type: Some("COS_CONTAINERD".to_string()),
            instance_type: Some("n2-standard-8".to_string()),
            disk_type: Some(DiskType::Balanced),
            disk_size_gb: Some(200),
            max_pods_per_node: Some(110),
            kubernetes_labels: Some(Labels::from([("tier".to_string(), "batch".to_string())])),
            kubernetes_taints: Some(vec![Taint {
                effect: TaintEffect::NoExecute,
                key: "batch".to_string(),
                value: "only".to_string(),
            }]),
            additional_labels: Some(Labels::from([("team".to_string(), "data".to_string())])),
            ..Default::default()
        };
        spec.node_network.tags = Some(vec!["allow-ssh".to_string()]);
        spec.node_network.pod_range_name = Some("pods-secondary".to_string());
        spec.node_security.service_account.email = Some("nodes@p.iam.gserviceaccount.com".to_string());
        spec.node_security.service_account.scopes =
            Some(vec!["https://www.googleapis.com/auth/cloud-platform".to_string()]);
        spec.node_security.sandbox_type = Some("gvisor".to_string());
        spec.node_security.enable_secure_boot = Some(true);

        let node_pool = to_sdk_node_pool(&pool(spec), 2, false, "prod");

        assert_eq!(node_pool.name, "gke-workers");
        assert_eq!(node_pool.max_pods_constraint, Some(MaxPodsConstraint { max_pods_per_node: 110 }));

        let autoscaling = node_pool.autoscaling.unwrap();
        assert!(autoscaling.enabled);
        assert_eq!(autoscaling.total_min_node_count, 1);
        assert_eq!(autoscaling.total_max_node_count, 5);
        assert_eq!(autoscaling.location_policy, LocationPolicy::Any);

        assert_eq!(
            node_pool.network_config,
            Some(NodeNetworkConfig {
                create_pod_range: false,
                pod_range: "pods-secondary".to_string(),
                pod_ipv4_cidr_block: String::new(),
            })
        );

        let config = node_pool.config.unwrap();
        assert_eq!(config.machine_type, "n2-standard-8");
        assert_eq!(config.image_type, "COS_CONTAINERD");
        assert_eq!(config.disk_type, "pd-balanced");
        assert_eq!(config.disk_size_gb, 200);
        assert_eq!(config.tags, vec!["allow-ssh"]);
        assert_eq!(config.service_account, "nodes@p.iam.gserviceaccount.com");
        assert_eq!(config.oauth_scopes.len(), 1);
        assert_eq!(config.sandbox_config, Some(SandboxConfig { sandbox_type: SandboxType::Gvisor }));
        assert_eq!(
            config.shielded_instance_config,
            Some(ShieldedInstanceConfig {
                enable_secure_boot: true,
                enable_integrity_monitoring: false,
            })
        );
        assert_eq!(config.labels.get("tier").map(String::as_str), Some("batch"));
        assert_eq!(
            config.taints,
            vec![NodeTaint {
                key: "batch".to_string(),
                value: "only".to_string(),
                effect: NodeTaintEffect::NoExecute,
            }]
        );
        assert_eq!(config.resource_labels.get("team").map(String::as_str), Some("data"));
        assert_eq!(
            config.resource_labels.get("capg-cluster-prod").map(String::as_str),
            Some("owned")
        );
    }

    #[test]
    fn test_unknown_sandbox_type_is_unspecified() {
        let mut spec = GCPManagedMachinePoolSpec::default();
        spec.node_security.sandbox_type = Some("kata".to_string());

        let config = to_sdk_node_pool(&pool(spec), 1, false, "prod").config.unwrap();

        assert_eq!(
            config.sandbox_config,
            Some(SandboxConfig { sandbox_type: SandboxType::Unspecified })
        );
    }

    #[test]
    fn test_empty_tags_not_sent() {
        let mut spec = GCPManagedMachinePoolSpec::default();
        spec.node_network.tags = Some(Vec::new());
        spec.node_security.service_account.scopes = Some(Vec::new());

        let config = to_sdk_node_pool(&pool(spec), 1, false, "prod").config.unwrap();

        assert!(config.tags.is_empty());
        assert!(config.oauth_scopes.is_empty());
    }
}
