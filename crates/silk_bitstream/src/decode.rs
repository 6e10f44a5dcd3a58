//! Reconstruction of per-resource configuration from an image.
//!
//! The inverse of the encoder's field walk, used by collaborators for
//! verification and by the round-trip tests. Decoding never needs the
//! netlist: it recovers exactly what each resource instance is configured
//! to do.

use crate::crc::crc16;
use crate::error::EncodingError;
use crate::fields::{self, ResourceConfig};
use crate::image::BitstreamImage;
use crate::layout::{meta, ImageLayout};
use serde::{Deserialize, Serialize};
use silk_device::DeviceGraph;

/// The decoded global metadata fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaConfig {
    /// User ID code.
    pub user_code: u8,
    /// Read-protection bit.
    pub read_protect: bool,
    /// Charge-pump-disable bit.
    pub charge_pump_disable: bool,
    /// LDO-bypass bit.
    pub ldo_bypass: bool,
    /// I/O-precharge bit.
    pub io_precharge: bool,
    /// Boot retry count.
    pub boot_retry: u8,
    /// Global analog bias trim.
    pub analog_bias: u8,
}

/// A fully decoded configuration image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Per-instance configuration, indexed by resource enumeration order.
    pub configs: Vec<ResourceConfig>,
    /// Global metadata.
    pub meta: MetaConfig,
    /// Whether the stored CRC trailer matches the image body.
    pub crc_ok: bool,
}

/// Decodes an image against the device graph it was encoded for.
pub fn decode(image: &BitstreamImage, graph: &DeviceGraph) -> Result<DecodedImage, EncodingError> {
    if image.part() != graph.part() {
        return Err(EncodingError::PartMismatch {
            config: image.part(),
            graph: graph.part(),
        });
    }
    let layout = ImageLayout::new(graph)?;

    let configs = graph
        .resources()
        .map(|instance| fields::read_config(image, layout.window(instance.id), instance))
        .collect::<Result<Vec<_>, _>>()?;

    let meta = MetaConfig {
        user_code: image.get_field(layout.meta_offset(meta::USER_CODE), 8) as u8,
        read_protect: image.get_field(layout.meta_offset(meta::READ_PROTECT), 1) != 0,
        charge_pump_disable: image.get_field(layout.meta_offset(meta::CHARGE_PUMP_DISABLE), 1) != 0,
        ldo_bypass: image.get_field(layout.meta_offset(meta::LDO_BYPASS), 1) != 0,
        io_precharge: image.get_field(layout.meta_offset(meta::IO_PRECHARGE), 1) != 0,
        boot_retry: image.get_field(layout.meta_offset(meta::BOOT_RETRY), 2) as u8,
        analog_bias: image.get_field(layout.meta_offset(meta::ANALOG_BIAS), 4) as u8,
    };

    let crc_offset = layout.meta_offset(meta::CRC);
    let stored = image.get_field(crc_offset, 16) as u16;
    let crc_ok = stored == crc16(&image.as_bytes()[..crc_offset / 8]);

    Ok(DecodedImage {
        configs,
        meta,
        crc_ok,
    })
}
