//! Netlist graph for the silk fitter.
//!
//! Parses the JSON interchange format (modules, cells, nets, attributes)
//! into a typed graph and validates it against the structural contract:
//! exactly one top module, only declared primitive types, every net driven
//! (or explicitly marked floating), and per-primitive port arity respected.
//!
//! Cell and net enumeration order is deterministic (sorted by name within
//! each module), so the placement search is reproducible for a fixed seed.
//!
//! The netlist graph knows nothing about any target device; binding cells to
//! physical resources is the placement engine's job.

#![warn(missing_docs)]

pub mod data;
pub mod error;
mod json;
pub mod validate;

pub use data::{Cell, CellConfig, Module, Net, Netlist, Port, PortDirection, PrimitiveKind};
pub use error::StructuralError;

/// Parses and validates a netlist from its JSON interchange text.
///
/// This is the single entry point: the returned [`Netlist`] has passed the
/// full structural contract and is immutable for the rest of the run.
pub fn parse_netlist(text: &str) -> Result<Netlist, StructuralError> {
    let netlist = json::parse(text)?;
    validate::validate(&netlist)?;
    Ok(netlist)
}
