//! Node pool autoscaling
//!
//! Declarative scaling options for a managed machine pool and their
//! conversion into the GKE `NodePoolAutoscaling` request shape.

use gke_api::{LocationPolicy, NodePoolAutoscaling};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// Values of `locationPolicy` accepted by the API server
pub const LOCATION_POLICIES: [&str; 2] = ["balanced", "any"];

/// Location policy used when scaling up a node pool
///
/// Unrecognised values are kept verbatim in `Other` so that writing an object
/// back does not rewrite the user's value. They map to
/// `LOCATION_POLICY_UNSPECIFIED` on the GKE side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ManagedNodePoolLocationPolicy {
    /// Balance node counts across zones
    Balanced,

    /// Prefer zones with unused reservations and available capacity
    Any,

    /// Any other value, as written
    Other(String),
}

impl ManagedNodePoolLocationPolicy {
    /// Value as it appears in the resource
    pub fn as_str(&self) -> &str {
        match self {
            Self::Balanced => "balanced",
            Self::Any => "any",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ManagedNodePoolLocationPolicy {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "balanced" => Self::Balanced,
            "any" => Self::Any,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for ManagedNodePoolLocationPolicy {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl Serialize for ManagedNodePoolLocationPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ManagedNodePoolLocationPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

/// NodePoolAutoScaling specifies scaling options
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodePoolAutoScaling {
    /// Minimum node count across all zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<i32>,

    /// Maximum node count across all zones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<i32>,

    /// Whether the cluster autoscaler manages this pool (defaults to true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_autoscaling: Option<bool>,

    /// Location policy used when scaling up a node pool.
    /// Defaults to `any` when autoscaling is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "crate::schema::optional_location_policy")]
    pub location_policy: Option<ManagedNodePoolLocationPolicy>,
}

impl From<&ManagedNodePoolLocationPolicy> for LocationPolicy {
    fn from(policy: &ManagedNodePoolLocationPolicy) -> Self {
        match policy {
            ManagedNodePoolLocationPolicy::Balanced => LocationPolicy::Balanced,
            ManagedNodePoolLocationPolicy::Any => LocationPolicy::Any,
            ManagedNodePoolLocationPolicy::Other(_) => LocationPolicy::LocationPolicyUnspecified,
        }
    }
}

impl From<&NodePoolAutoScaling> for NodePoolAutoscaling {
    fn from(scaling: &NodePoolAutoScaling) -> Self {
        let mut autoscaling = NodePoolAutoscaling {
            enabled: true,
            ..Default::default()
        };
        if let Some(min) = scaling.min_count {
            autoscaling.total_min_node_count = min;
        }
        if let Some(max) = scaling.max_count {
            autoscaling.total_max_node_count = max;
        }
        if let Some(enabled) = scaling.enable_autoscaling {
            autoscaling.enabled = enabled;
        }
        // Runs after the enabled override: the default depends on the resolved flag
        autoscaling.location_policy = match &scaling.location_policy {
            Some(policy) => policy.into(),
            None if autoscaling.enabled => LocationPolicy::Any,
            None => LocationPolicy::LocationPolicyUnspecified,
        };
        autoscaling
    }
}

/// Converts node pool autoscaling config to the value used by the GKE API
///
/// Returns `None` when no scaling was configured, meaning "do not autoscale".
pub fn to_sdk_autoscaling(scaling: Option<&NodePoolAutoScaling>) -> Option<NodePoolAutoscaling> {
    let autoscaling = NodePoolAutoscaling::from(scaling?);
    debug!(
        "Autoscaling enabled={} min={} max={} policy={}",
        autoscaling.enabled,
        autoscaling.total_min_node_count,
        autoscaling.total_max_node_count,
        autoscaling.location_policy.as_str_name()
    );
    Some(autoscaling)
}
