//! Module-level and net-level structural validation.
//!
//! Runs after JSON conversion. Checks each cell's pin set against its
//! primitive's fixed shape, then analyzes every net's endpoints: a net must
//! have exactly one driver and at least two endpoints unless it is
//! explicitly marked `FLOATING`.

use crate::data::{Cell, Module, Netlist, PortDirection, PrimitiveKind};
use crate::error::StructuralError;
use std::collections::BTreeMap;

/// Validates the whole netlist against the structural contract.
pub fn validate(netlist: &Netlist) -> Result<(), StructuralError> {
    for module in &netlist.modules {
        validate_module(module)?;
    }
    Ok(())
}

fn validate_module(module: &Module) -> Result<(), StructuralError> {
    for cell in &module.cells {
        validate_cell_pins(cell)?;
    }
    validate_nets(module)
}

/// Checks a cell's connections against the primitive's fixed pin shape.
fn validate_cell_pins(cell: &Cell) -> Result<(), StructuralError> {
    let arity_err = |detail: String| StructuralError::PortArity {
        cell: cell.name.clone(),
        detail,
    };

    if cell.kind == PrimitiveKind::Iob {
        // An IOB is either an input pad (OUT only) or an output pad (IN only).
        let has_in = cell.connections.contains_key("IN");
        let has_out = cell.connections.contains_key("OUT");
        if has_in == has_out {
            return Err(arity_err(
                "IOB must connect exactly one of IN (output pad) or OUT (input pad)".into(),
            ));
        }
        for pin in cell.connections.keys() {
            if pin != "IN" && pin != "OUT" {
                return Err(arity_err(format!("unexpected pin {pin:?}")));
            }
        }
        return Ok(());
    }

    let mut allowed: Vec<&str> = cell.kind.required_inputs().to_vec();
    allowed.extend_from_slice(cell.kind.optional_inputs());
    allowed.push(cell.kind.output_pin());

    for pin in cell.connections.keys() {
        if !allowed.iter().any(|a| a == pin) {
            return Err(arity_err(format!(
                "unexpected pin {pin:?} on {}",
                cell.kind
            )));
        }
    }
    for pin in cell.kind.required_inputs() {
        if !cell.connections.contains_key(*pin) {
            return Err(arity_err(format!("missing input pin {pin:?}")));
        }
    }
    let out = cell.kind.output_pin();
    if !cell.connections.contains_key(out) {
        return Err(arity_err(format!("missing output pin {out:?}")));
    }
    Ok(())
}

#[derive(Default)]
struct NetEndpoints {
    drivers: usize,
    sinks: usize,
}

/// Analyzes every referenced net's endpoints.
fn validate_nets(module: &Module) -> Result<(), StructuralError> {
    let mut endpoints: BTreeMap<u32, NetEndpoints> = BTreeMap::new();

    for port in &module.ports {
        for &bit in &port.bits {
            let entry = endpoints.entry(bit).or_default();
            match port.direction {
                // An input port drives the fabric from the pad.
                PortDirection::Input => entry.drivers += 1,
                PortDirection::Output => entry.sinks += 1,
            }
        }
    }

    for cell in &module.cells {
        for (pin, &bit) in &cell.connections {
            let entry = endpoints.entry(bit).or_default();
            if is_output_pin(cell, pin) {
                entry.drivers += 1;
            } else {
                entry.sinks += 1;
            }
        }
    }

    for (&index, counts) in &endpoints {
        let floating = module
            .nets
            .get(&index)
            .is_some_and(|n| n.is_marked_floating());
        let name = module.net_name(index);

        if counts.drivers > 1 {
            return Err(StructuralError::MultipleDrivers {
                net: name,
                count: counts.drivers,
            });
        }
        if floating {
            continue;
        }
        if counts.drivers == 0 {
            return Err(StructuralError::NoDriver { net: name });
        }
        if counts.drivers + counts.sinks < 2 {
            return Err(StructuralError::Dangling { net: name });
        }
    }
    Ok(())
}

fn is_output_pin(cell: &Cell, pin: &str) -> bool {
    match cell.kind {
        // OUT on an IOB is the pad-to-fabric direction.
        PrimitiveKind::Iob => pin == "OUT",
        kind => pin == kind.output_pin(),
    }
}
