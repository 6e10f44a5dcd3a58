//! Device resource models for the MX family of programmable mixed-signal parts.
//!
//! This crate provides the static model of one target part: the enumerable
//! [`ResourceInstance`]s, their capabilities, and the precomputed crossbar
//! reachability relation. The family (MX3620, MX3621, MX3140) differs in
//! resource counts and I/O pin mapping, not in architecture.
//!
//! # Usage
//!
//! ```
//! use silk_device::{DeviceGraph, PartId, ResourceKind};
//!
//! let graph = DeviceGraph::new(PartId::Mx3620);
//! assert_eq!(graph.resources_of_kind(ResourceKind::Dff).len(), 12);
//! ```
//!
//! Routing on these parts is statically switched: whether two resource ports
//! can be wired together is a property of the fabric, decided once when the
//! graph is built. The placement engine only ever asks reachability queries;
//! there is no path allocation and no shared-wire contention.

#![warn(missing_docs)]

pub mod graph;
pub mod ids;
pub mod kinds;
pub mod part;

pub use graph::{DeviceGraph, ResourceInstance};
pub use ids::ResourceId;
pub use kinds::{CostClass, DriveStrength, IobDirection, PullDirection, PullStrength, ResourceKind};
pub use part::{PartId, PartSpec};
