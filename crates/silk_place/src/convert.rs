//! Conversion from the validated netlist graph to the placement netlist.
//!
//! Materializes one IOB cell per top-level port bit (named after the port),
//! maps every netlist cell to its physical kind, and rebuilds nets as stars
//! rooted at their driver. Nets explicitly marked floating are dropped here;
//! they constrain nothing.

use crate::data::{PinRef, PlaceCellKind, PlaceNetlist};
use crate::ids::PlaceCellId;
use silk_device::{DriveStrength, IobDirection, PullDirection, PullStrength};
use silk_netlist::{CellConfig, Module, PortDirection, StructuralError};
use std::collections::BTreeMap;

/// Flattens the top module into a [`PlaceNetlist`].
pub fn convert(module: &Module) -> Result<PlaceNetlist, StructuralError> {
    let mut netlist = PlaceNetlist::new();
    // Net index -> (driver, sinks), populated as cells are created.
    let mut endpoints: BTreeMap<u32, (Option<PinRef>, Vec<PinRef>)> = BTreeMap::new();

    // Top-level ports become IOB cells named after the port bit.
    for port in &module.ports {
        for (bit, &net) in port.bits.iter().enumerate() {
            let name = port.bit_name(bit);
            let attrs = module
                .nets
                .get(&net)
                .map(|n| &n.attributes)
                .cloned()
                .unwrap_or_default();
            let direction = match port.direction {
                PortDirection::Input => IobDirection::Input,
                PortDirection::Output => IobDirection::Output,
            };
            let kind = iob_kind(&name, direction, &attrs)?;
            let cell = netlist.add_cell(name, kind);
            let entry = endpoints.entry(net).or_default();
            match port.direction {
                // An input pad drives the fabric.
                PortDirection::Input => entry.0 = Some(PinRef { cell, slot: 0 }),
                PortDirection::Output => entry.1.push(PinRef { cell, slot: 0 }),
            }
        }
    }

    for cell in &module.cells {
        let (kind, pad_to_fabric) = place_kind(cell)?;
        let id = netlist.add_cell(cell.name.clone(), kind);
        record_endpoints(cell, id, pad_to_fabric, &mut endpoints);
    }

    for (&net, (driver, sinks)) in &endpoints {
        if let Some(driver) = driver {
            if !sinks.is_empty() {
                netlist.add_net(module.net_name(net), *driver, sinks.clone());
            }
        }
    }

    netlist.rebuild_indices();
    Ok(netlist)
}

/// Maps one netlist cell to its physical kind. The second return value is
/// `true` for IOB cells that drive the fabric (input pads).
fn place_kind(cell: &silk_netlist::Cell) -> Result<(PlaceCellKind, bool), StructuralError> {
    match &cell.config {
        CellConfig::Lut { init } => {
            let arity = match cell.kind {
                silk_netlist::PrimitiveKind::Lut { arity } => arity,
                _ => 0,
            };
            Ok((PlaceCellKind::Lut { arity, init: *init }, false))
        }
        CellConfig::Dff { init } => Ok((PlaceCellKind::Dff { init: *init }, false)),
        CellConfig::Counter { count_to, clk_div } => Ok((
            PlaceCellKind::Counter {
                count_to: *count_to,
                clk_div: *clk_div,
            },
            false,
        )),
        CellConfig::Inverter => Ok((PlaceCellKind::Inverter, false)),
        CellConfig::Iob => {
            // Validation guarantees exactly one of IN/OUT is connected.
            let is_input_pad = cell.connections.contains_key("OUT");
            let direction = if is_input_pad {
                IobDirection::Input
            } else {
                IobDirection::Output
            };
            let kind = iob_kind(&cell.name, direction, &cell.attributes)?;
            Ok((kind, is_input_pad))
        }
        CellConfig::AnalogCmp { bias } => Ok((PlaceCellKind::AnalogCmp { bias: *bias }, false)),
    }
}

/// Parses IOB electrical options from an attribute map.
fn iob_kind(
    owner: &str,
    direction: IobDirection,
    attrs: &BTreeMap<String, String>,
) -> Result<PlaceCellKind, StructuralError> {
    let bad = |param: &str, value: &str, detail: &str| StructuralError::BadParameter {
        cell: owner.to_string(),
        param: param.to_string(),
        value: value.to_string(),
        detail: detail.to_string(),
    };

    let pull = match attrs.get("PULL") {
        Some(v) => PullDirection::parse(v)
            .ok_or_else(|| bad("PULL", v, "must be one of UP, DOWN, NONE, FLOAT"))?,
        None => PullDirection::default(),
    };
    let pull_strength = match attrs.get("PULL_STRENGTH") {
        Some(v) => PullStrength::parse(v)
            .ok_or_else(|| bad("PULL_STRENGTH", v, "must be one of 10K, 100K, 1M"))?,
        None => PullStrength::default(),
    };
    let drive = match attrs.get("DRIVE") {
        Some(v) => {
            DriveStrength::parse(v).ok_or_else(|| bad("DRIVE", v, "must be one of 1X, 2X, 4X"))?
        }
        None => DriveStrength::default(),
    };
    let schmitt = attrs
        .get("SCHMITT")
        .is_some_and(|v| v != "0" && !v.is_empty());

    Ok(PlaceCellKind::Iob {
        direction,
        pull,
        pull_strength,
        drive,
        schmitt,
    })
}

/// Registers one cell's pins in the per-net endpoint map.
fn record_endpoints(
    cell: &silk_netlist::Cell,
    id: PlaceCellId,
    pad_to_fabric: bool,
    endpoints: &mut BTreeMap<u32, (Option<PinRef>, Vec<PinRef>)>,
) {
    let slots = cell.kind.input_slots();
    for (pin, &net) in &cell.connections {
        let entry = endpoints.entry(net).or_default();
        let is_driver = if cell.kind == silk_netlist::PrimitiveKind::Iob {
            pad_to_fabric && pin == "OUT"
        } else {
            pin == cell.kind.output_pin()
        };
        if is_driver {
            entry.0 = Some(PinRef { cell: id, slot: 0 });
        } else {
            let slot = slots.iter().position(|s| s == pin).unwrap_or(0) as u8;
            entry.1.push(PinRef { cell: id, slot });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silk_netlist::parse_netlist;

    const AND_NETLIST: &str = r#"{
        "modules": {
            "top": {
                "ports": {
                    "a": { "direction": "input", "bits": [2] },
                    "b": { "direction": "input", "bits": [3] },
                    "y": { "direction": "output", "bits": [4] }
                },
                "cells": {
                    "and1": {
                        "type": "LUT2",
                        "parameters": { "INIT": "1000" },
                        "connections": { "IN0": [2], "IN1": [3], "OUT": [4] }
                    }
                },
                "netnames": {
                    "a": { "bits": [2] },
                    "b": { "bits": [3] },
                    "y": { "bits": [4] }
                }
            }
        }
    }"#;

    #[test]
    fn ports_become_iob_cells() {
        let netlist = parse_netlist(AND_NETLIST).unwrap();
        let place = convert(netlist.top_module()).unwrap();
        // 3 port IOBs + 1 LUT.
        assert_eq!(place.cell_count(), 4);
        assert!(place.cell_by_name.contains_key("a"));
        assert!(place.cell_by_name.contains_key("y"));

        let a = place.cell(place.cell_by_name["a"]);
        match &a.kind {
            PlaceCellKind::Iob { direction, .. } => {
                assert_eq!(*direction, IobDirection::Input)
            }
            other => panic!("expected IOB, got {other:?}"),
        }
    }

    #[test]
    fn nets_are_stars_with_slots() {
        let netlist = parse_netlist(AND_NETLIST).unwrap();
        let place = convert(netlist.top_module()).unwrap();
        assert_eq!(place.net_count(), 3);

        let and1 = place.cell_by_name["and1"];
        // Net "b" drives the LUT's IN1 (slot 1).
        let net_b = place
            .nets
            .iter()
            .find(|n| n.name == "b")
            .expect("net b exists");
        assert_eq!(net_b.sinks.len(), 1);
        assert_eq!(net_b.sinks[0].cell, and1);
        assert_eq!(net_b.sinks[0].slot, 1);

        // Net "y" is driven by the LUT into the output pad.
        let net_y = place.nets.iter().find(|n| n.name == "y").unwrap();
        assert_eq!(net_y.driver.cell, and1);
        let y = place.cell_by_name["y"];
        assert_eq!(net_y.sinks[0].cell, y);
    }

    #[test]
    fn wide_port_bits_expand() {
        let text = r#"{ "modules": { "top": {
            "ports": { "data": { "direction": "input", "bits": [2, 3] } },
            "cells": {
                "u1": { "type": "INV", "connections": { "IN": [2], "OUT": [4] } },
                "u2": { "type": "INV", "connections": { "IN": [3], "OUT": [5] } },
                "o1": { "type": "IOB", "connections": { "IN": [4] } },
                "o2": { "type": "IOB", "connections": { "IN": [5] } }
            }
        } } }"#;
        let netlist = parse_netlist(text).unwrap();
        let place = convert(netlist.top_module()).unwrap();
        assert!(place.cell_by_name.contains_key("data[0]"));
        assert!(place.cell_by_name.contains_key("data[1]"));
    }

    #[test]
    fn explicit_iob_directions() {
        let text = r#"{ "modules": { "top": {
            "cells": {
                "in_pad": { "type": "IOB", "connections": { "OUT": [2] } },
                "inv": { "type": "INV", "connections": { "IN": [2], "OUT": [3] } },
                "out_pad": { "type": "IOB", "attributes": { "DRIVE": "2X" },
                             "connections": { "IN": [3] } }
            }
        } } }"#;
        let netlist = parse_netlist(text).unwrap();
        let place = convert(netlist.top_module()).unwrap();

        match &place.cell(place.cell_by_name["in_pad"]).kind {
            PlaceCellKind::Iob { direction, .. } => assert_eq!(*direction, IobDirection::Input),
            _ => panic!(),
        }
        match &place.cell(place.cell_by_name["out_pad"]).kind {
            PlaceCellKind::Iob {
                direction, drive, ..
            } => {
                assert_eq!(*direction, IobDirection::Output);
                assert_eq!(*drive, DriveStrength::X2);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn port_net_attributes_configure_the_pad() {
        let text = r#"{ "modules": { "top": {
            "ports": {
                "a": { "direction": "input", "bits": [2] },
                "y": { "direction": "output", "bits": [3] }
            },
            "cells": {
                "inv": { "type": "INV", "connections": { "IN": [2], "OUT": [3] } }
            },
            "netnames": {
                "a": { "bits": [2], "attributes": { "PULL": "UP", "SCHMITT": "1" } },
                "y": { "bits": [3] }
            }
        } } }"#;
        let netlist = parse_netlist(text).unwrap();
        let place = convert(netlist.top_module()).unwrap();
        match &place.cell(place.cell_by_name["a"]).kind {
            PlaceCellKind::Iob { pull, schmitt, .. } => {
                assert_eq!(*pull, PullDirection::Up);
                assert!(*schmitt);
            }
            _ => panic!(),
        }
    }

    #[test]
    fn bad_pull_attribute() {
        let text = r#"{ "modules": { "top": {
            "cells": {
                "pad": { "type": "IOB", "attributes": { "PULL": "STRONG" },
                         "connections": { "OUT": [2] } },
                "inv": { "type": "INV", "connections": { "IN": [2], "OUT": [3] } },
                "o": { "type": "IOB", "connections": { "IN": [3] } }
            }
        } } }"#;
        let netlist = parse_netlist(text).unwrap();
        let err = convert(netlist.top_module()).unwrap_err();
        assert!(matches!(err, StructuralError::BadParameter { .. }));
    }

    #[test]
    fn floating_nets_are_dropped() {
        let text = r#"{ "modules": { "top": {
            "ports": { "a": { "direction": "input", "bits": [2] } },
            "netnames": { "a": { "bits": [2], "attributes": { "FLOATING": "1" } } }
        } } }"#;
        let netlist = parse_netlist(text).unwrap();
        let place = convert(netlist.top_module()).unwrap();
        assert_eq!(place.cell_count(), 1);
        assert_eq!(place.net_count(), 0);
    }
}
