//! Resolution of parsed constraints against the netlist and device graph.

use crate::error::ConstraintError;
use crate::parse::{Constraint, Location};
use silk_device::{DeviceGraph, ResourceId};
use silk_place::{Binding, PlaceCellId, PlaceNetlist};
use std::collections::HashMap;

/// Resolves constraints into pre-search bindings.
///
/// Enforces the constraint contract: every name resolves to exactly one
/// cell, every location to exactly one compatible instance, and no cell or
/// instance is claimed twice.
pub fn resolve(
    constraints: &[Constraint],
    netlist: &PlaceNetlist,
    graph: &DeviceGraph,
) -> Result<Vec<Binding>, ConstraintError> {
    let mut bindings = Vec::new();
    let mut claimed_cells: HashMap<PlaceCellId, ()> = HashMap::new();
    let mut claimed_sites: HashMap<ResourceId, String> = HashMap::new();

    for constraint in constraints {
        let cell = resolve_name(&constraint.name, netlist)?;
        if claimed_cells.insert(cell, ()).is_some() {
            return Err(ConstraintError::DuplicateCell {
                name: constraint.name.clone(),
            });
        }

        let resource = resolve_location(&constraint.location, graph)?;
        let instance = graph.resource(resource);
        if !netlist.cell(cell).kind.placeable_on(instance.kind) {
            return Err(ConstraintError::Incompatible {
                name: constraint.name.clone(),
                kind: kind_name(netlist, cell),
                location: instance.location_name(),
            });
        }

        if let Some(first) = claimed_sites.insert(resource, constraint.name.clone()) {
            return Err(ConstraintError::DoubleClaim {
                first,
                second: constraint.name.clone(),
                location: instance.location_name(),
            });
        }

        bindings.push(Binding {
            cell,
            resource,
            locked: constraint.locked,
        });
    }

    Ok(bindings)
}

fn resolve_name(name: &str, netlist: &PlaceNetlist) -> Result<PlaceCellId, ConstraintError> {
    if let Some(&cell) = netlist.cell_by_name.get(name) {
        return Ok(cell);
    }
    // A multi-bit port shows up as `name[0]`, `name[1]`, ...; naming the
    // bare port is ambiguous.
    let bit_prefix = format!("{name}[");
    let count = netlist
        .cells
        .iter()
        .filter(|c| c.name.starts_with(&bit_prefix))
        .count();
    match count {
        0 => Err(ConstraintError::UnknownName {
            name: name.to_string(),
        }),
        1 => {
            let cell = netlist
                .cells
                .iter()
                .find(|c| c.name.starts_with(&bit_prefix))
                .map(|c| c.id);
            cell.ok_or_else(|| ConstraintError::UnknownName {
                name: name.to_string(),
            })
        }
        count => Err(ConstraintError::AmbiguousName {
            name: name.to_string(),
            count,
        }),
    }
}

fn resolve_location(
    location: &Location,
    graph: &DeviceGraph,
) -> Result<ResourceId, ConstraintError> {
    let resolved = match location {
        Location::Pin(pin) => graph.iob_for_pin(*pin),
        Location::Instance(kind, index) => graph.find_instance(*kind, *index),
    };
    resolved.ok_or_else(|| ConstraintError::LocationMissing {
        location: location.to_string(),
    })
}

fn kind_name(netlist: &PlaceNetlist, cell: PlaceCellId) -> String {
    use silk_place::PlaceCellKind;
    match &netlist.cell(cell).kind {
        PlaceCellKind::Lut { arity, .. } => format!("LUT{arity}"),
        PlaceCellKind::Dff { .. } => "DFF".into(),
        PlaceCellKind::Counter { .. } => "COUNT".into(),
        PlaceCellKind::Inverter => "INV".into(),
        PlaceCellKind::Iob { .. } => "IOB".into(),
        PlaceCellKind::AnalogCmp { .. } => "ACMP".into(),
    }
}
