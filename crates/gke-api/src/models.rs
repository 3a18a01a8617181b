//! GKE container v1 API models
//!
//! These models match the `google.container.v1` messages used when creating
//! node pools. See: google/container/v1/cluster_service.proto

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Effect of a Kubernetes taint, as understood by the GKE API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeTaintEffect {
    /// Not set
    #[default]
    EffectUnspecified,

    /// NoSchedule
    NoSchedule,

    /// PreferNoSchedule
    PreferNoSchedule,

    /// NoExecute
    NoExecute,
}

impl NodeTaintEffect {
    /// Proto numeric code of the effect
    pub fn code(self) -> i32 {
        match self {
            Self::EffectUnspecified => 0,
            Self::NoSchedule => 1,
            Self::PreferNoSchedule => 2,
            Self::NoExecute => 3,
        }
    }

    /// Effect for a proto numeric code; unknown codes are unspecified
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::NoSchedule,
            2 => Self::PreferNoSchedule,
            3 => Self::NoExecute,
            _ => Self::EffectUnspecified,
        }
    }

    /// Proto enum value name
    pub fn as_str_name(self) -> &'static str {
        match self {
            Self::EffectUnspecified => "EFFECT_UNSPECIFIED",
            Self::NoSchedule => "NO_SCHEDULE",
            Self::PreferNoSchedule => "PREFER_NO_SCHEDULE",
            Self::NoExecute => "NO_EXECUTE",
        }
    }
}

/// Kubernetes taint applied to every node of a node pool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeTaint {
    /// Key of the taint
    pub key: String,
    /// Value of the taint, may be empty
    pub value: String,
    /// Effect of the taint
    pub effect: NodeTaintEffect,
}

/// How the cluster autoscaler distributes nodes across zones
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationPolicy {
    /// Not set
    #[default]
    LocationPolicyUnspecified,

    /// Balance node counts across zones
    Balanced,

    /// Prefer zones with unused reservations and available capacity
    Any,
}

impl LocationPolicy {
    /// Proto numeric code of the policy
    pub fn code(self) -> i32 {
        match self {
            Self::LocationPolicyUnspecified => 0,
            Self::Balanced => 1,
            Self::Any => 2,
        }
    }

    /// Policy for a proto numeric code; unknown codes are unspecified
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Balanced,
            2 => Self::Any,
            _ => Self::LocationPolicyUnspecified,
        }
    }

    /// Proto enum value name
    pub fn as_str_name(self) -> &'static str {
        match self {
            Self::LocationPolicyUnspecified => "LOCATION_POLICY_UNSPECIFIED",
            Self::Balanced => "BALANCED",
            Self::Any => "ANY",
        }
    }
}

/// Cluster autoscaler settings of a node pool
///
/// `min_node_count`/`max_node_count` are per-zone limits, the `total_*` fields
/// are limits across all zones. The two pairs are mutually exclusive on the API.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePoolAutoscaling {
    /// Whether autoscaling is on for this pool
    pub enabled: bool,
    /// Minimum nodes per zone
    pub min_node_count: i32,
    /// Maximum nodes per zone
    pub max_node_count: i32,
    /// Whether the pool was created by node auto-provisioning
    pub autoprovisioned: bool,
    /// Zone distribution used on scale up
    pub location_policy: LocationPolicy,
    /// Minimum nodes across all zones
    pub total_min_node_count: i32,
    /// Maximum nodes across all zones
    pub total_max_node_count: i32,
}

/// Sandbox runtime type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SandboxType {
    /// Default runtime, no sandbox
    #[default]
    Unspecified,

    /// gVisor sandbox
    Gvisor,
}

impl SandboxType {
    /// Proto numeric code of the sandbox type
    pub fn code(self) -> i32 {
        match self {
            Self::Unspecified => 0,
            Self::Gvisor => 1,
        }
    }
}

/// Sandbox configuration of the nodes
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SandboxConfig {
    /// Sandbox runtime used for pods
    #[serde(rename = "type")]
    pub sandbox_type: SandboxType,
}

/// Shielded VM options of the nodes
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ShieldedInstanceConfig {
    /// Verify boot components against signatures
    pub enable_secure_boot: bool,
    /// Measure and monitor the boot sequence
    pub enable_integrity_monitoring: bool,
}

/// Per-node VM configuration of a node pool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeConfig {
    /// Compute Engine machine type
    #[serde(skip_serializing_if = "String::is_empty")]
    pub machine_type: String,
    /// Boot disk size in GB; zero lets GKE pick
    #[serde(skip_serializing_if = "is_zero")]
    pub disk_size_gb: i32,
    /// OAuth scopes granted to the node service account
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub oauth_scopes: Vec<String>,
    /// Service account email used by the nodes
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_account: String,
    /// Node image, e.g. COS_CONTAINERD
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image_type: String,
    /// Kubernetes labels applied to every node
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Network tags of the node VMs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Boot disk type
    #[serde(skip_serializing_if = "String::is_empty")]
    pub disk_type: String, // pd-standard, pd-ssd or pd-balanced
    /// Kubernetes taints applied to every node
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<NodeTaint>,
    /// Sandbox runtime of the nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_config: Option<SandboxConfig>,
    /// Shielded VM options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shielded_instance_config: Option<ShieldedInstanceConfig>,
    /// GCP labels applied to the node VMs and disks
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub resource_labels: BTreeMap<String, String>,
}

/// Upper bound on pods per node
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MaxPodsConstraint {
    /// Maximum pods scheduled on one node
    #[serde(with = "int64_json")]
    pub max_pods_per_node: i64,
}

/// Pod networking options of a node pool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeNetworkConfig {
    /// Create a new secondary range for pod IPs
    pub create_pod_range: bool,
    /// Name of the secondary range for pod IPs
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pod_range: String,
    /// CIDR of the pod range when it is created
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pod_ipv4_cidr_block: String,
}

/// Node pool model matching the `google.container.v1.NodePool` message
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePool {
    /// Node pool name, unique within the cluster
    pub name: String,
    /// Per-node VM configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<NodeConfig>,
    /// Nodes created in each location
    pub initial_node_count: i32,
    /// Zones the nodes run in
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    /// Pod networking options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_config: Option<NodeNetworkConfig>,
    /// Cluster autoscaler settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<NodePoolAutoscaling>,
    /// Pods-per-node limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pods_constraint: Option<MaxPodsConstraint>,
}

#[allow(clippy::trivially_copy_pass_by_ref, reason = "signature required by skip_serializing_if")]
fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// int64 fields are JSON strings in the proto3 mapping; numbers are accepted on input
mod int64_json {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64Repr {
        Number(i64),
        Text(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref, reason = "signature required by serde(with)")]
    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        match Int64Repr::deserialize(deserializer)? {
            Int64Repr::Number(n) => Ok(n),
            Int64Repr::Text(s) => s.parse().map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_taint_effect_codes_and_names() {
        let cases = [
            (NodeTaintEffect::EffectUnspecified, 0, "EFFECT_UNSPECIFIED"),
            (NodeTaintEffect::NoSchedule, 1, "NO_SCHEDULE"),
            (NodeTaintEffect::PreferNoSchedule, 2, "PREFER_NO_SCHEDULE"),
            (NodeTaintEffect::NoExecute, 3, "NO_EXECUTE"),
        ];
        for (effect, code, name) in cases {
            assert_eq!(effect.code(), code);
            assert_eq!(effect.as_str_name(), name);
            assert_eq!(NodeTaintEffect::from_code(code), effect);
            // Serialized form must match the proto value name
            assert_eq!(serde_json::to_value(effect).unwrap(), json!(name));
        }
        assert_eq!(NodeTaintEffect::from_code(42), NodeTaintEffect::EffectUnspecified);
    }

    #[test]
    fn test_location_policy_codes_and_names() {
        let cases = [
            (LocationPolicy::LocationPolicyUnspecified, 0, "LOCATION_POLICY_UNSPECIFIED"),
            (LocationPolicy::Balanced, 1, "BALANCED"),
            (LocationPolicy::Any, 2, "ANY"),
        ];
        for (policy, code, name) in cases {
            assert_eq!(policy.code(), code);
            assert_eq!(policy.as_str_name(), name);
            assert_eq!(LocationPolicy::from_code(code), policy);
            assert_eq!(serde_json::to_value(policy).unwrap(), json!(name));
        }
        assert_eq!(LocationPolicy::from_code(-1), LocationPolicy::LocationPolicyUnspecified);
    }

    #[test]
    fn test_autoscaling_wire_shape() {
        let autoscaling = NodePoolAutoscaling {
            enabled: true,
            total_min_node_count: 1,
            total_max_node_count: 5,
            location_policy: LocationPolicy::Any,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&autoscaling).unwrap(),
            json!({
                "enabled": true,
                "minNodeCount": 0,
                "maxNodeCount": 0,
                "autoprovisioned": false,
                "locationPolicy": "ANY",
                "totalMinNodeCount": 1,
                "totalMaxNodeCount": 5,
            })
        );
    }

    #[test]
    fn test_max_pods_constraint_is_string_encoded() {
        let constraint = MaxPodsConstraint { max_pods_per_node: 110 };
        assert_eq!(
            serde_json::to_value(&constraint).unwrap(),
            json!({ "maxPodsPerNode": "110" })
        );

        let from_string: MaxPodsConstraint =
            serde_json::from_value(json!({ "maxPodsPerNode": "64" })).unwrap();
        assert_eq!(from_string.max_pods_per_node, 64);

        let from_number: MaxPodsConstraint =
            serde_json::from_value(json!({ "maxPodsPerNode": 32 })).unwrap();
        assert_eq!(from_number.max_pods_per_node, 32);

        assert!(serde_json::from_value::<MaxPodsConstraint>(json!({ "maxPodsPerNode": "lots" })).is_err());
    }

    #[test]
    fn test_node_pool_omits_unset_fields() {
        let pool = NodePool {
            name: "workers".to_string(),
            initial_node_count: 3,
            config: Some(NodeConfig {
                machine_type: "e2-medium".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&pool).unwrap(),
            json!({
                "name": "workers",
                "initialNodeCount": 3,
                "config": { "machineType": "e2-medium" },
            })
        );
    }

    #[test]
    fn test_sandbox_config_type_field() {
        let config = SandboxConfig { sandbox_type: SandboxType::Gvisor };
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({ "type": "GVISOR" }));
        assert_eq!(SandboxType::Gvisor.code(), 1);
        assert_eq!(SandboxType::Unspecified.code(), 0);
    }
}
