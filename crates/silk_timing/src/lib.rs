//! Propagation-delay model loaded from external characterization data.
//!
//! The characterization harness measures pin-to-pin delays on real silicon
//! and writes them as JSON records keyed by resource-kind pair, connection
//! cost class, and drive-strength variant. This crate loads those records
//! into a total lookup: a missing entry means "no data" and contributes
//! zero delay, never an error. Timing-driven placement is an optional
//! refinement, not a correctness requirement.

#![warn(missing_docs)]

pub mod model;

pub use model::{DelayRecord, TimingError, TimingModel};
