//! Cluster API conditions
//!
//! Condition records reported on the status of a managed machine pool, with
//! the helpers a controller uses to keep them consistent.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Ready condition type, always listed first
pub const READY_CONDITION: &str = "Ready";

/// The GKE node pool is running and matches the desired state
pub const GKE_MACHINE_POOL_READY_CONDITION: &str = "GKEMachinePoolReady";
/// The GKE node pool is being created
pub const GKE_MACHINE_POOL_CREATING_CONDITION: &str = "GKEMachinePoolCreating";
/// The GKE node pool is being updated
pub const GKE_MACHINE_POOL_UPDATING_CONDITION: &str = "GKEMachinePoolUpdating";
/// The GKE node pool is being deleted
pub const GKE_MACHINE_POOL_DELETING_CONDITION: &str = "GKEMachinePoolDeleting";

/// Node pool creation has started
pub const GKE_MACHINE_POOL_CREATING_REASON: &str = "GKEMachinePoolCreating";
/// Node pool update has finished
pub const GKE_MACHINE_POOL_UPDATED_REASON: &str = "GKEMachinePoolUpdated";
/// Node pool deletion has started
pub const GKE_MACHINE_POOL_DELETING_REASON: &str = "GKEMachinePoolDeleting";
/// Node pool is gone
pub const GKE_MACHINE_POOL_DELETED_REASON: &str = "GKEMachinePoolDeleted";
/// The GKE API reported the node pool in an error state
pub const GKE_MACHINE_POOL_ERROR_REASON: &str = "GKEMachinePoolError";
/// A reconcile pass failed before reaching the GKE API
pub const GKE_MACHINE_POOL_RECONCILIATION_FAILED_REASON: &str = "GKEMachinePoolReconciliationFailed";

/// Values of `severity` accepted by the API server
pub const CONDITION_SEVERITIES: [&str; 3] = ["Error", "Warning", "Info"];

/// Condition status following Kubernetes conventions
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionStatus {
    /// The condition holds
    True,
    /// The condition does not hold
    False,
    /// The controller cannot tell yet
    Unknown,
}

/// How bad a False condition is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ConditionSeverity {
    /// Needs user action
    Error,
    /// May need user action
    Warning,
    /// Informational, usually a transient step
    Info,
}

/// Condition defines an observation of a resource's operational state
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition in CamelCase
    #[serde(rename = "type")]
    pub type_: String,

    /// Status of the condition, one of True, False, Unknown
    pub status: ConditionStatus,

    /// Severity provides an explicit classification of Reason code.
    /// Only set when status is False.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "crate::schema::optional_condition_severity")]
    pub severity: Option<ConditionSeverity>,

    /// Last time the condition transitioned from one status to another
    pub last_transition_time: DateTime<Utc>,

    /// Machine-readable reason for the last transition, in CamelCase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable details about the transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Condition {
    /// A True condition stamped with the current time
    pub fn true_condition(type_: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            status: ConditionStatus::True,
            severity: None,
            last_transition_time: Utc::now(),
            reason: None,
            message: None,
        }
    }

    /// A False condition stamped with the current time
    pub fn false_condition(
        type_: impl Into<String>,
        reason: impl Into<String>,
        severity: ConditionSeverity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            type_: type_.into(),
            status: ConditionStatus::False,
            severity: Some(severity),
            last_transition_time: Utc::now(),
            reason: Some(reason.into()),
            message: Some(message.into()),
        }
    }

    /// Same status, severity, reason and message; the timestamp is ignored
    pub fn has_same_state(&self, other: &Condition) -> bool {
        self.type_ == other.type_
            && self.status == other.status
            && self.severity == other.severity
            && self.reason == other.reason
            && self.message == other.message
    }
}

/// Ready first, then lexicographic by type
fn condition_order(a: &Condition, b: &Condition) -> Ordering {
    let a_ready = a.type_ == READY_CONDITION;
    let b_ready = b.type_ == READY_CONDITION;
    b_ready.cmp(&a_ready).then_with(|| a.type_.cmp(&b.type_))
}

/// Read and write access to a list of conditions
///
/// Setting a condition replaces the one with the same type. The transition
/// time only moves when the status actually changes.
pub trait Conditions {
    /// Conditions in their stored order
    fn conditions(&self) -> &[Condition];

    /// Mutable access to the stored conditions
    fn conditions_mut(&mut self) -> &mut Vec<Condition>;

    /// Condition of the given type, if present
    fn get_condition(&self, type_: &str) -> Option<&Condition> {
        self.conditions().iter().find(|c| c.type_ == type_)
    }

    /// True only when the condition exists with status True
    fn is_true(&self, type_: &str) -> bool {
        self.get_condition(type_)
            .is_some_and(|c| c.status == ConditionStatus::True)
    }

    /// Adds or replaces the condition of the same type and keeps the list ordered
    fn set_condition(&mut self, mut condition: Condition) {
        let conditions = self.conditions_mut();
        match conditions.iter_mut().find(|c| c.type_ == condition.type_) {
            Some(existing) => {
                if existing.has_same_state(&condition) {
                    return;
                }
                if existing.status == condition.status {
                    condition.last_transition_time = existing.last_transition_time;
                }
                *existing = condition;
            }
            None => conditions.push(condition),
        }
        conditions.sort_by(condition_order);
    }

    /// Sets a True condition of the given type
    fn mark_true(&mut self, type_: &str) {
        self.set_condition(Condition::true_condition(type_));
    }

    /// Sets a False condition with a reason, severity and message
    fn mark_false(&mut self, type_: &str, reason: &str, severity: ConditionSeverity, message: &str) {
        self.set_condition(Condition::false_condition(type_, reason, severity, message));
    }

    /// Drops the condition of the given type
    fn remove_condition(&mut self, type_: &str) {
        self.conditions_mut().retain(|c| c.type_ != type_);
    }
}
