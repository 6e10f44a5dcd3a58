//! Lowering a frozen assignment into the configuration image.
//!
//! Every occupied instance gets its cell's configuration with input taps
//! resolved through the assignment; every unoccupied IOB gets the merged
//! unused-pin policy; everything else stays at its reset value. Global
//! metadata comes from the run configuration, independent of placement.
//! The CRC trailer is computed last, after all other fields are final.

use crate::crc::crc16;
use crate::error::EncodingError;
use crate::fields::{self, ResourceConfig};
use crate::image::BitstreamImage;
use crate::layout::{meta, ImageLayout, TAP_NONE};
use silk_config::DeviceConfig;
use silk_device::{DeviceGraph, ResourceInstance};
use silk_place::{Assignment, PlaceCell, PlaceCellKind, PlaceNetlist};

/// Encodes a fully placed design into a device image.
///
/// Encoding is injective with respect to observable behavior: two different
/// legal assignments of one netlist differ in at least one tap or truth
/// table field.
pub fn encode(
    netlist: &PlaceNetlist,
    assignment: &Assignment,
    graph: &DeviceGraph,
    config: &DeviceConfig,
) -> Result<BitstreamImage, EncodingError> {
    if config.part != graph.part() {
        return Err(EncodingError::PartMismatch {
            config: config.part,
            graph: graph.part(),
        });
    }
    let layout = ImageLayout::new(graph)?;
    let configs = build_resource_configs(netlist, assignment, graph, config)?;

    let mut image = BitstreamImage::new(config.part);
    for (instance, resource_config) in graph.resources().zip(configs.iter()) {
        fields::write_config(
            &mut image,
            layout.window(instance.id),
            instance,
            resource_config,
        )?;
    }

    image.set_field(
        layout.meta_offset(meta::USER_CODE),
        8,
        config.user_code as u64,
    );
    image.set_field(
        layout.meta_offset(meta::READ_PROTECT),
        1,
        config.read_protect as u64,
    );
    image.set_field(
        layout.meta_offset(meta::CHARGE_PUMP_DISABLE),
        1,
        config.charge_pump_disable as u64,
    );
    image.set_field(
        layout.meta_offset(meta::LDO_BYPASS),
        1,
        config.ldo_bypass as u64,
    );
    image.set_field(
        layout.meta_offset(meta::IO_PRECHARGE),
        1,
        config.io_precharge as u64,
    );
    image.set_field(
        layout.meta_offset(meta::BOOT_RETRY),
        2,
        config.boot_retry as u64,
    );
    image.set_field(
        layout.meta_offset(meta::ANALOG_BIAS),
        4,
        config.analog_bias as u64,
    );

    // The trailer covers every byte before it and is written last.
    let crc_offset = layout.meta_offset(meta::CRC);
    let crc = crc16(&image.as_bytes()[..crc_offset / 8]);
    image.set_field(crc_offset, 16, crc as u64);

    Ok(image)
}

/// Computes the per-instance configuration for the whole part.
pub(crate) fn build_resource_configs(
    netlist: &PlaceNetlist,
    assignment: &Assignment,
    graph: &DeviceGraph,
    config: &DeviceConfig,
) -> Result<Vec<ResourceConfig>, EncodingError> {
    for cell in &netlist.cells {
        if assignment.site_of(cell.id).is_none() {
            return Err(EncodingError::UnplacedCell {
                cell: cell.name.clone(),
            });
        }
    }

    // Resolve every net into per-instance input tap selectors.
    let mut taps = vec![[TAP_NONE; 4]; graph.resource_count()];
    for net in &netlist.nets {
        // Checked above: every cell is placed.
        let Some(src) = assignment.site_of(net.driver.cell) else {
            continue;
        };
        for sink in &net.sinks {
            let Some(dst) = assignment.site_of(sink.cell) else {
                continue;
            };
            taps[dst.index()][sink.slot as usize] = src.as_raw() as u8;
        }
    }

    graph
        .resources()
        .map(|instance| match assignment.cell_at(instance.id) {
            Some(cell) => occupied_config(netlist.cell(cell), instance, &taps[instance.id.index()]),
            None => Ok(unused_config(instance, config)),
        })
        .collect()
}

/// The configuration of an instance occupied by a cell.
fn occupied_config(
    cell: &PlaceCell,
    instance: &ResourceInstance,
    taps: &[u8; 4],
) -> Result<ResourceConfig, EncodingError> {
    let config = match &cell.kind {
        PlaceCellKind::Lut { arity, init } => ResourceConfig::Lut {
            init: expand_init(*init, *arity, instance.arity),
            taps: *taps,
        },
        PlaceCellKind::Inverter => {
            if instance.arity > 0 {
                // An inverter hosted on a LUT instance: a one-input NOT
                // table expanded over the unused inputs.
                ResourceConfig::Lut {
                    init: expand_init(0b01, 1, instance.arity),
                    taps: *taps,
                }
            } else {
                ResourceConfig::Inverter { tap: taps[0] }
            }
        }
        PlaceCellKind::Dff { init } => ResourceConfig::Dff {
            init: *init,
            d_tap: taps[0],
            clk_tap: taps[1],
        },
        PlaceCellKind::Counter { count_to, clk_div } => ResourceConfig::Counter {
            count_to: *count_to,
            clk_div: *clk_div,
            rst_tap: taps[0],
        },
        PlaceCellKind::Iob {
            direction,
            pull,
            pull_strength,
            drive,
            schmitt,
        } => ResourceConfig::Iob {
            direction: *direction,
            pull: *pull,
            pull_strength: *pull_strength,
            drive: *drive,
            schmitt: *schmitt,
            tap: taps[0],
        },
        PlaceCellKind::AnalogCmp { bias } => ResourceConfig::AnalogCmp {
            bias: *bias,
            tap: taps[0],
        },
    };
    Ok(config)
}

/// The configuration of an unoccupied instance. Unused IOBs carry the
/// merged unused-pin policy; everything else is at reset.
fn unused_config(instance: &ResourceInstance, config: &DeviceConfig) -> ResourceConfig {
    match ResourceConfig::reset(instance) {
        ResourceConfig::Iob {
            direction,
            drive,
            schmitt,
            tap,
            ..
        } => ResourceConfig::Iob {
            direction,
            pull: config.unused_pull,
            pull_strength: config.unused_drive,
            drive,
            schmitt,
            tap,
        },
        reset => reset,
    }
}

/// Expands a truth table from `from` inputs to `to` inputs by ignoring the
/// extra high inputs.
fn expand_init(init: u16, from: u8, to: u8) -> u16 {
    if from == to {
        return init;
    }
    let mask = (1u16 << from) - 1;
    let mut expanded = 0u16;
    for i in 0..(1u16 << to) {
        if init >> (i & mask) & 1 == 1 {
            expanded |= 1 << i;
        }
    }
    expanded
}
