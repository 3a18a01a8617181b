//! GCP resource labels
//!
//! Labels attached to the GCP resources backing a managed machine pool.

use std::collections::BTreeMap;

/// Labels is a map of label keys to values
pub type Labels = BTreeMap<String, String>;

/// Prefix of the label key that marks a resource as belonging to a cluster
pub const CLUSTER_TAG_KEY_PREFIX: &str = "capg-cluster-";

/// Lifecycle value for resources created and owned by the provider
pub const RESOURCE_LIFECYCLE_OWNED: &str = "owned";

/// Label key marking ownership by the given cluster
pub fn cluster_tag_key(cluster_name: &str) -> String {
    format!("{CLUSTER_TAG_KEY_PREFIX}{cluster_name}")
}

/// Builds the resource labels for a GCP resource owned by `cluster_name`
///
/// Additional labels are applied first; the ownership label always wins.
pub fn build_resource_labels(cluster_name: &str, additional: Option<&Labels>) -> Labels {
    let mut labels = additional.cloned().unwrap_or_default();
    labels.insert(cluster_tag_key(cluster_name), RESOURCE_LIFECYCLE_OWNED.to_string());
    labels
}
