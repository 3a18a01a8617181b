//! Node taints
//!
//! Kubernetes taints applied to the nodes of a managed machine pool, and their
//! conversion into the GKE `NodeTaint` request shape.

use std::borrow::Cow;

use gke_api::{NodeTaint, NodeTaintEffect};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

use crate::schema::string_enum;

/// Effects admitted by the API server
pub const TAINT_EFFECTS: [&str; 3] = ["NoSchedule", "NoExecute", "PreferNoSchedule"];

/// Effect of a Kubernetes taint
///
/// The API server only admits the three named effects. Anything else that
/// reaches this type (older objects, hand-edited status) is kept verbatim in
/// `Other`, which maps to `EFFECT_UNSPECIFIED` on the GKE side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaintEffect {
    /// New pods without a toleration are not scheduled on the node
    NoSchedule,

    /// Pods without a toleration are evicted from the node
    NoExecute,

    /// The scheduler tries to avoid the node
    PreferNoSchedule,

    /// Any other value, as written
    Other(String),
}

impl TaintEffect {
    /// Effect as it appears in the resource
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSchedule => "NoSchedule",
            Self::NoExecute => "NoExecute",
            Self::PreferNoSchedule => "PreferNoSchedule",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for TaintEffect {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "NoSchedule" => Self::NoSchedule,
            "NoExecute" => Self::NoExecute,
            "PreferNoSchedule" => Self::PreferNoSchedule,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for TaintEffect {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl Serialize for TaintEffect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaintEffect {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

// `Other` is accepted on read but never advertised
impl JsonSchema for TaintEffect {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> Cow<'static, str> {
        "TaintEffect".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        string_enum(TAINT_EFFECTS)
    }
}

/// Taint represents a Kubernetes taint
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Taint {
    /// Effect specifies the effect for the taint
    pub effect: TaintEffect,

    /// Key is the key of the taint
    pub key: String,

    /// Value is the value of the taint
    pub value: String,
}

/// Taints is an ordered list of taints
pub type Taints = Vec<Taint>;

impl From<&TaintEffect> for NodeTaintEffect {
    fn from(effect: &TaintEffect) -> Self {
        match effect {
            TaintEffect::NoSchedule => NodeTaintEffect::NoSchedule,
            TaintEffect::NoExecute => NodeTaintEffect::NoExecute,
            TaintEffect::PreferNoSchedule => NodeTaintEffect::PreferNoSchedule,
            TaintEffect::Other(_) => NodeTaintEffect::EffectUnspecified,
        }
    }
}

impl From<&Taint> for NodeTaint {
    fn from(taint: &Taint) -> Self {
        if let TaintEffect::Other(raw) = &taint.effect {
            warn!("Taint {} has unrecognised effect {:?}, sending EFFECT_UNSPECIFIED", taint.key, raw);
        }
        NodeTaint {
            key: taint.key.clone(),
            value: taint.value.clone(),
            effect: NodeTaintEffect::from(&taint.effect),
        }
    }
}

/// Converts taints to the format used by the GKE API
///
/// `None` stays `None`; a present list (even an empty one) is converted
/// element by element, keeping order.
pub fn to_sdk_taints(taints: Option<&[Taint]>) -> Option<Vec<NodeTaint>> {
    taints.map(|taints| taints.iter().map(NodeTaint::from).collect())
}
