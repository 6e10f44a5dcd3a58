//! Interchange-JSON deserialization.
//!
//! The raw serde model mirrors the JSON layout (modules containing ports,
//! cells, and netnames keyed by name); conversion to the typed graph happens
//! immediately, including primitive-type resolution and parameter parsing.
//! Map keys deserialize into `BTreeMap`, which fixes the enumeration order
//! (sorted by name) independent of the JSON text order.

use crate::data::{Cell, CellConfig, Module, Net, Netlist, Port, PortDirection, PrimitiveKind};
use crate::error::StructuralError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Deserialize)]
struct RawNetlist {
    modules: BTreeMap<String, RawModule>,
}

#[derive(Deserialize)]
struct RawModule {
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
    #[serde(default)]
    ports: BTreeMap<String, RawPort>,
    #[serde(default)]
    cells: BTreeMap<String, RawCell>,
    #[serde(default)]
    netnames: BTreeMap<String, RawNetName>,
}

#[derive(Deserialize)]
struct RawPort {
    direction: String,
    bits: Vec<RawBit>,
}

#[derive(Deserialize)]
struct RawCell {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    parameters: BTreeMap<String, Value>,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
    #[serde(default)]
    connections: BTreeMap<String, Vec<RawBit>>,
}

#[derive(Deserialize)]
struct RawNetName {
    bits: Vec<RawBit>,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
}

/// A single bit reference: either a module-scoped net index or a constant
/// bit string such as `"0"`, `"1"`, or `"x"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBit {
    Net(u32),
    Const(String),
}

/// Parses the interchange JSON into the typed netlist graph.
///
/// Performs per-cell checks on the way (primitive resolution, pin widths,
/// parameter parsing); module-level and net-level validation runs afterwards
/// in [`crate::validate`].
pub(crate) fn parse(text: &str) -> Result<Netlist, StructuralError> {
    let raw: RawNetlist =
        serde_json::from_str(text).map_err(|e| StructuralError::Json(e.to_string()))?;

    let module_names: Vec<String> = raw.modules.keys().cloned().collect();
    let mut modules = Vec::new();

    for (mod_name, raw_module) in &raw.modules {
        modules.push(convert_module(mod_name, raw_module, &module_names)?);
    }

    let top = find_top(&modules)?;
    Ok(Netlist { modules, top })
}

fn convert_module(
    name: &str,
    raw: &RawModule,
    module_names: &[String],
) -> Result<Module, StructuralError> {
    let mut ports = Vec::new();
    for (port_name, raw_port) in &raw.ports {
        let direction = match raw_port.direction.as_str() {
            "input" => PortDirection::Input,
            "output" => PortDirection::Output,
            "inout" => {
                return Err(StructuralError::UnsupportedInout {
                    port: port_name.clone(),
                })
            }
            other => {
                return Err(StructuralError::Json(format!(
                    "port {port_name:?} has unknown direction {other:?}"
                )))
            }
        };
        let mut bits = Vec::new();
        for (i, bit) in raw_port.bits.iter().enumerate() {
            bits.push(net_index(bit, || format!("port {port_name:?} bit {i}"))?);
        }
        ports.push(Port {
            name: port_name.clone(),
            direction,
            bits,
        });
    }

    let mut cells = Vec::new();
    for (cell_name, raw_cell) in &raw.cells {
        cells.push(convert_cell(cell_name, raw_cell, module_names)?);
    }

    let mut nets: BTreeMap<u32, Net> = BTreeMap::new();
    for (net_name, raw_net) in &raw.netnames {
        for (i, bit) in raw_net.bits.iter().enumerate() {
            let index = net_index(bit, || format!("net {net_name:?} bit {i}"))?;
            let bit_name = if raw_net.bits.len() == 1 {
                net_name.clone()
            } else {
                format!("{net_name}[{i}]")
            };
            let entry = nets.entry(index).or_default();
            if entry.name.is_none() {
                entry.name = Some(bit_name);
            }
            for (k, v) in &raw_net.attributes {
                entry
                    .attributes
                    .entry(k.clone())
                    .or_insert_with(|| value_to_string(v));
            }
        }
    }

    Ok(Module {
        name: name.to_string(),
        ports,
        cells,
        nets,
        attributes: attr_map(&raw.attributes),
    })
}

fn convert_cell(
    name: &str,
    raw: &RawCell,
    module_names: &[String],
) -> Result<Cell, StructuralError> {
    if module_names.iter().any(|m| m == &raw.ty) {
        return Err(StructuralError::Hierarchy {
            cell: name.to_string(),
            module: raw.ty.clone(),
        });
    }
    let kind =
        PrimitiveKind::from_type_name(&raw.ty).ok_or_else(|| StructuralError::UnknownPrimitive {
            cell: name.to_string(),
            ty: raw.ty.clone(),
        })?;

    let mut connections = BTreeMap::new();
    for (pin, bits) in &raw.connections {
        if bits.len() != 1 {
            return Err(StructuralError::WidthMismatch {
                cell: name.to_string(),
                pin: pin.clone(),
                width: bits.len(),
            });
        }
        let index = net_index(&bits[0], || format!("cell {name:?} pin {pin:?}"))?;
        connections.insert(pin.clone(), index);
    }

    let config = parse_config(name, kind, &raw.parameters)?;

    Ok(Cell {
        name: name.to_string(),
        kind,
        config,
        connections,
        attributes: attr_map(&raw.attributes),
    })
}

/// Parses the typed configuration for one cell from its parameter map.
fn parse_config(
    cell: &str,
    kind: PrimitiveKind,
    params: &BTreeMap<String, Value>,
) -> Result<CellConfig, StructuralError> {
    match kind {
        PrimitiveKind::Lut { arity } => {
            let init = match params.get("INIT") {
                Some(v) => parse_lut_init(cell, v, arity)?,
                None => 0,
            };
            Ok(CellConfig::Lut { init })
        }
        PrimitiveKind::Dff => {
            let init = match params.get("INIT") {
                Some(v) => parse_uint(cell, "INIT", v, 1)? != 0,
                None => false,
            };
            Ok(CellConfig::Dff { init })
        }
        PrimitiveKind::Counter => {
            let count_to = match params.get("COUNT_TO") {
                Some(v) => parse_uint(cell, "COUNT_TO", v, 0x3FFF)? as u16,
                None => 0,
            };
            let clk_div = match params.get("CLK_DIV") {
                Some(v) => {
                    let div = parse_uint(cell, "CLK_DIV", v, 64)?;
                    match div {
                        1 => 0,
                        4 => 1,
                        16 => 2,
                        64 => 3,
                        _ => {
                            return Err(StructuralError::BadParameter {
                                cell: cell.to_string(),
                                param: "CLK_DIV".into(),
                                value: value_to_string(v),
                                detail: "must be one of 1, 4, 16, 64".into(),
                            })
                        }
                    }
                }
                None => 0,
            };
            Ok(CellConfig::Counter { count_to, clk_div })
        }
        PrimitiveKind::Inverter => Ok(CellConfig::Inverter),
        PrimitiveKind::Iob => Ok(CellConfig::Iob),
        PrimitiveKind::AnalogCmp => {
            let bias = match params.get("BIAS") {
                Some(v) => parse_uint(cell, "BIAS", v, 15)? as u8,
                None => 0,
            };
            Ok(CellConfig::AnalogCmp { bias })
        }
    }
}

/// Parses a LUT INIT parameter.
///
/// A string whose length equals `2^arity` and contains only `0`/`1` is a
/// truth-table bit string (leftmost character is the output for the
/// all-ones input word). Anything else is parsed as an unsigned number.
fn parse_lut_init(cell: &str, value: &Value, arity: u8) -> Result<u16, StructuralError> {
    let rows = 1usize << arity;
    if let Value::String(s) = value {
        if s.len() == rows && s.chars().all(|c| c == '0' || c == '1') {
            // Cannot fail: checked characters and length above.
            return Ok(u16::from_str_radix(s, 2).unwrap_or(0));
        }
    }
    let max = (1u64 << rows) - 1;
    Ok(parse_uint(cell, "INIT", value, max)? as u16)
}

/// Parses an unsigned parameter value, accepting JSON numbers, decimal
/// strings, and `0x`-prefixed hex strings, and range-checks it.
fn parse_uint(cell: &str, param: &str, value: &Value, max: u64) -> Result<u64, StructuralError> {
    let bad = |detail: &str| StructuralError::BadParameter {
        cell: cell.to_string(),
        param: param.to_string(),
        value: value_to_string(value),
        detail: detail.to_string(),
    };

    let parsed = match value {
        Value::Number(n) => n.as_u64().ok_or_else(|| bad("not an unsigned integer"))?,
        Value::String(s) => {
            let s = s.trim();
            let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                u64::from_str_radix(hex, 16)
            } else {
                s.parse::<u64>()
            };
            parsed.map_err(|_| bad("not an unsigned integer"))?
        }
        _ => return Err(bad("not an unsigned integer")),
    };

    if parsed > max {
        return Err(bad(&format!("exceeds maximum {max}")));
    }
    Ok(parsed)
}

fn net_index(
    bit: &RawBit,
    context: impl Fn() -> String,
) -> Result<u32, StructuralError> {
    match bit {
        RawBit::Net(index) => Ok(*index),
        RawBit::Const(value) => Err(StructuralError::UnsupportedConstant {
            context: context(),
            value: value.clone(),
        }),
    }
}

fn attr_map(raw: &BTreeMap<String, Value>) -> BTreeMap<String, String> {
    raw.iter()
        .map(|(k, v)| (k.clone(), value_to_string(v)))
        .collect()
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        other => other.to_string(),
    }
}

/// Picks the top module: exactly one marked with a truthy `top` attribute,
/// or the only module present.
fn find_top(modules: &[Module]) -> Result<usize, StructuralError> {
    let marked: Vec<usize> = modules
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_marked_top())
        .map(|(i, _)| i)
        .collect();
    match marked.len() {
        1 => Ok(marked[0]),
        0 => match modules.len() {
            0 => Err(StructuralError::NoTopModule),
            1 => Ok(0),
            count => Err(StructuralError::MultipleTopModules { count }),
        },
        count => Err(StructuralError::MultipleTopModules { count }),
    }
}
