//! GKEops CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for GKE managed machine pools, and
//! the conversions from those resources into GKE API requests.

#![warn(missing_docs)]

pub mod conditions;
pub mod error;
pub mod labels;
pub mod managed_machine_pool;
pub mod manifests;
pub mod node_pool;
pub mod scaling;
mod schema;
pub mod taint;

pub use conditions::*;
pub use error::CrdError;
pub use labels::*;
pub use managed_machine_pool::*;
pub use manifests::*;
pub use node_pool::*;
pub use scaling::*;
pub use taint::*;
