//! GCPManagedMachinePool CRD
//!
//! Desired and observed state of a GKE node pool managed as a Cluster API
//! machine pool.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::conditions::{Condition, Conditions};
use crate::labels::Labels;
use crate::scaling::NodePoolAutoScaling;
use crate::taint::Taints;

/// Finalizer that lets the controller clean up GCP resources associated with
/// the GCPManagedMachinePool before it is removed from the API server
pub const MANAGED_MACHINE_POOL_FINALIZER: &str = "gcpmanagedmachinepool.infrastructure.cluster.x-k8s.io";

/// Type of the disk attached to each node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum DiskType {
    /// Standard persistent disk
    #[serde(rename = "pd-standard")]
    Standard,

    /// SSD persistent disk
    #[serde(rename = "pd-ssd")]
    Ssd,

    /// Balanced persistent disk
    #[serde(rename = "pd-balanced")]
    Balanced,
}

impl DiskType {
    /// Every disk type, in schema order
    pub const ALL: [DiskType; 3] = [DiskType::Standard, DiskType::Ssd, DiskType::Balanced];

    /// Disk type name as the GKE API expects it
    pub fn as_str(self) -> &'static str {
        match self {
            DiskType::Standard => "pd-standard",
            DiskType::Ssd => "pd-ssd",
            DiskType::Balanced => "pd-balanced",
        }
    }
}

/// GCPManagedMachinePoolSpec defines the desired state of GCPManagedMachinePool
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta1",
    kind = "GCPManagedMachinePool",
    plural = "gcpmanagedmachinepools",
    shortname = "gcpmmp",
    category = "cluster-api",
    namespaced,
    status = "GCPManagedMachinePoolStatus"
)]
#[kube(
    printcolumn = r#"{"name":"NODEPOOL", "type":"string", "description":"GKE node pool name", "jsonPath":".spec.nodePoolName"}"#,
    printcolumn = r#"{"name":"READY", "type":"boolean", "description":"Node pool is ready", "jsonPath":".status.ready"}"#,
    printcolumn = r#"{"name":"REPLICAS", "type":"integer", "description":"Observed replicas", "jsonPath":".status.replicas"}"#,
    printcolumn = r#"{"name":"AGE", "type":"date", "description":"Date from created", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct GCPManagedMachinePoolSpec {
    /// Name of the GKE node pool corresponding to this MachinePool.
    /// Defaults to the name of the GCPManagedMachinePool when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub node_pool_name: String,

    /// Scaling options for the node pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<NodePoolAutoScaling>,

    /// Zones in which the node pool's nodes should be located
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_locations: Option<Vec<String>>,

    /// Image type to use for this node pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<String>,

    /// Name of the Compute Engine machine type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,

    /// Type of the disk attached to each node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "crate::schema::optional_disk_type")]
    pub disk_type: Option<DiskType>,

    /// Size of the disk attached to each node, in GB
    #[serde(default, rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 10))]
    pub disk_size_gb: Option<i64>,

    /// Max number of pods per node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 8, max = 256))]
    pub max_pods_per_node: Option<i64>,

    /// Node network configuration options
    #[serde(default)]
    pub node_network: NodeNetworkConfig,

    /// Node security options
    #[serde(default)]
    pub node_security: NodeSecurityConfig,

    /// Labels to apply to the Kubernetes nodes of the node pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_labels: Option<Labels>,

    /// Taints to apply to the Kubernetes nodes of the node pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_taints: Option<Taints>,

    /// Extra labels for the GCP resources managed by the provider,
    /// in addition to the ones added by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_labels: Option<Labels>,

    /// Provider IDs of the instances in the managed instance group
    /// backing this machine pool
    #[serde(default, rename = "providerIDList", skip_serializing_if = "Option::is_none")]
    pub provider_id_list: Option<Vec<String>>,
}

/// NodeNetworkConfig encapsulates node network configurations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeNetworkConfig {
    /// Instance tags applied to all nodes, used to identify valid sources or
    /// targets for network firewalls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Whether to create a new range for pod IPs in this node pool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_pod_range: Option<bool>,

    /// ID of the secondary range for pod IPs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_range_name: Option<String>,

    /// IP address range for pod IPs in this node pool
    #[serde(default)]
    pub pod_range_cidr_block: Option<String>,
}

impl NodeNetworkConfig {
    /// True when any pod range option is set
    pub fn has_pod_range(&self) -> bool {
        self.create_pod_range.is_some() || self.pod_range_name.is_some() || self.pod_range_cidr_block.is_some()
    }
}

/// NodeSecurityConfig encapsulates node security configurations
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeSecurityConfig {
    /// Identity details for the node pool
    #[serde(default)]
    pub service_account: ServiceAccountConfig,

    /// Type of the sandbox to use for the node (e.g. "gvisor")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_type: Option<String>,

    /// Whether the instance has Secure Boot enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_secure_boot: Option<bool>,

    /// Whether the instance has integrity monitoring enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_integrity_monitoring: Option<bool>,
}

/// ServiceAccountConfig encapsulates service account options
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountConfig {
    /// Google Cloud service account used by the node VMs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Google API scopes made available on all node VMs under the
    /// "default" service account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

/// GCPManagedMachinePoolStatus defines the observed state of GCPManagedMachinePool
///
/// Owned by the controller; users never write it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GCPManagedMachinePoolStatus {
    /// Node pool is ready
    #[serde(default)]
    pub ready: bool,

    /// Most recently observed number of replicas
    #[serde(default)]
    pub replicas: i32,

    /// Conditions of the managed machine pool
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Conditions for GCPManagedMachinePoolStatus {
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    fn conditions_mut(&mut self) -> &mut Vec<Condition> {
        &mut self.conditions
    }
}

impl GCPManagedMachinePool {
    /// Name of the GKE node pool: the spec override, or the object name
    pub fn node_pool_name(&self) -> &str {
        if self.spec.node_pool_name.is_empty() {
            self.metadata.name.as_deref().unwrap_or_default()
        } else {
            &self.spec.node_pool_name
        }
    }

    /// Conditions currently reported in status
    pub fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|status| status.conditions.as_slice())
            .unwrap_or_default()
    }

    /// Replaces the reported conditions, creating status if needed
    pub fn set_conditions(&mut self, conditions: Vec<Condition>) {
        self.status.get_or_insert_with(Default::default).conditions = conditions;
    }
}
