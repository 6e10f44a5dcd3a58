//! Run configuration for the silk fitter.
//!
//! The caller (command-line tool or another collaborator) supplies a
//! [`RunConfig`] as plain data. Before compilation it is merged with the top
//! module's `UNUSED_PULL`/`UNUSED_DRIVE` attributes into a [`DeviceConfig`]:
//! a caller-provided value takes precedence over an attribute, and a notice
//! is emitted when it overrides a conflicting one. The merge is a pure
//! function; no global mutable state is involved.

#![warn(missing_docs)]

pub mod error;
pub mod merge;
pub mod types;

pub use error::ConfigError;
pub use merge::merge;
pub use types::{DeviceConfig, RunConfig};
