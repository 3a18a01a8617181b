//! GKE Container API Models
//!
//! Request-shaped records for the Google Kubernetes Engine container v1 API.
//! Only the node pool surface is modelled: the records a node pool create or
//! update call carries.
//!
//! Field names follow the proto3 JSON mapping (camelCase) and enum values
//! serialize as their proto names (e.g. `NO_SCHEDULE`). Every enum also exposes
//! its proto numeric code through `code()`.
//!
//! # Example
//!
//! ```
//! use gke_api::{NodeTaint, NodeTaintEffect};
//!
//! let taint = NodeTaint {
//!     key: "dedicated".to_string(),
//!     value: "gpu".to_string(),
//!     effect: NodeTaintEffect::NoSchedule,
//! };
//! assert_eq!(taint.effect.code(), 1);
//! assert_eq!(taint.effect.as_str_name(), "NO_SCHEDULE");
//! ```

#![warn(missing_docs)]

pub mod models;

pub use models::*;
