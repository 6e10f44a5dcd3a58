//! The per-part field layout of the configuration image.
//!
//! Every resource instance owns a fixed bit window, assigned in resource
//! enumeration order from bit 0. The last 64 bits of the image are the
//! metadata window, with the CRC-16 trailer in its final 16 bits. Field
//! widths per kind:
//!
//! | kind  | fields (LSB first)                                             |
//! |-------|----------------------------------------------------------------|
//! | LUTn  | truth table (2^n), n input taps (6 each)                       |
//! | DFF   | init (1), D tap (6), CLK tap (6)                               |
//! | COUNT | count_to (14), clk_div (2), RST tap (6)                        |
//! | INV   | input tap (6)                                                  |
//! | IOB   | dir (2), pull (2), pull strength (2), drive (2), schmitt (1), input tap (6) |
//! | ACMP  | bias (4), input tap (6)                                        |
//!
//! The reset value of every tap selector is [`TAP_NONE`] ("no source");
//! every other unassigned bit resets to zero.

use crate::error::EncodingError;
use silk_device::{DeviceGraph, ResourceId, ResourceInstance, ResourceKind};

/// Width of every input-tap selector field.
pub const TAP_BITS: usize = 6;

/// The "no source" tap selector value.
pub const TAP_NONE: u8 = 0x3F;

/// Size of the global metadata window at the end of the image.
pub const META_BITS: usize = 64;

/// Bit offsets of metadata fields within the metadata window.
pub(crate) mod meta {
    /// User ID code (8 bits).
    pub const USER_CODE: usize = 0;
    /// Read-protection flag (1 bit).
    pub const READ_PROTECT: usize = 8;
    /// Charge-pump-disable flag (1 bit).
    pub const CHARGE_PUMP_DISABLE: usize = 9;
    /// LDO-bypass flag (1 bit).
    pub const LDO_BYPASS: usize = 10;
    /// I/O-precharge flag (1 bit).
    pub const IO_PRECHARGE: usize = 11;
    /// Boot retry count (2 bits).
    pub const BOOT_RETRY: usize = 12;
    /// Global analog bias trim (4 bits).
    pub const ANALOG_BIAS: usize = 14;
    /// CRC-16 trailer (16 bits), at the very end of the window.
    pub const CRC: usize = 48;
}

/// One resource instance's bit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWindow {
    /// First bit of the window.
    pub offset: usize,
    /// Window width in bits.
    pub width: usize,
}

/// The computed field layout for one part.
#[derive(Debug, Clone)]
pub struct ImageLayout {
    windows: Vec<FieldWindow>,
    meta_base: usize,
    image_bits: usize,
}

impl ImageLayout {
    /// Computes the layout for a device graph.
    ///
    /// Fails if the part's windows do not fit ahead of the metadata window;
    /// that would be a defect in the part tables, not a user error.
    pub fn new(graph: &DeviceGraph) -> Result<Self, EncodingError> {
        let image_bits = graph.part().spec().image_bits;
        let meta_base = image_bits - META_BITS;

        let mut windows = Vec::with_capacity(graph.resource_count());
        let mut offset = 0usize;
        for instance in graph.resources() {
            let width = Self::window_width(instance);
            windows.push(FieldWindow { offset, width });
            offset += width;
        }

        if offset > meta_base {
            return Err(EncodingError::LayoutOverflow {
                needed: offset,
                available: meta_base,
            });
        }

        Ok(Self {
            windows,
            meta_base,
            image_bits,
        })
    }

    fn window_width(instance: &ResourceInstance) -> usize {
        match instance.kind {
            ResourceKind::Lut2 | ResourceKind::Lut3 | ResourceKind::Lut4 => {
                let arity = instance.arity as usize;
                (1 << arity) + arity * TAP_BITS
            }
            ResourceKind::Dff => 1 + 2 * TAP_BITS,
            ResourceKind::Counter => 14 + 2 + TAP_BITS,
            ResourceKind::Inverter => TAP_BITS,
            ResourceKind::Iob => 2 + 2 + 2 + 2 + 1 + TAP_BITS,
            ResourceKind::AnalogCmp => 4 + TAP_BITS,
        }
    }

    /// The bit window of one resource instance.
    pub fn window(&self, id: ResourceId) -> FieldWindow {
        self.windows[id.index()]
    }

    /// Absolute bit offset of a metadata field (offset within the metadata
    /// window).
    pub fn meta_offset(&self, within: usize) -> usize {
        self.meta_base + within
    }

    /// Image length in bits.
    pub fn image_bits(&self) -> usize {
        self.image_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silk_device::PartId;

    #[test]
    fn windows_are_disjoint_and_ordered() {
        for part in [PartId::Mx3620, PartId::Mx3621, PartId::Mx3140] {
            let graph = DeviceGraph::new(part);
            let layout = ImageLayout::new(&graph).unwrap();
            let mut end = 0usize;
            for instance in graph.resources() {
                let w = layout.window(instance.id);
                assert_eq!(w.offset, end, "{part} {}", instance.location_name());
                assert!(w.width > 0);
                end = w.offset + w.width;
            }
            assert!(end <= layout.meta_offset(0));
        }
    }

    #[test]
    fn metadata_sits_in_the_last_64_bits() {
        let graph = DeviceGraph::new(PartId::Mx3620);
        let layout = ImageLayout::new(&graph).unwrap();
        assert_eq!(layout.meta_offset(0), 2048 - 64);
        assert_eq!(layout.meta_offset(meta::CRC), 2048 - 16);
    }

    #[test]
    fn lut_window_widths() {
        let graph = DeviceGraph::new(PartId::Mx3620);
        let layout = ImageLayout::new(&graph).unwrap();
        let lut2 = graph.find_instance(ResourceKind::Lut2, 0).unwrap();
        let lut4 = graph.find_instance(ResourceKind::Lut4, 0).unwrap();
        assert_eq!(layout.window(lut2).width, 4 + 2 * TAP_BITS);
        assert_eq!(layout.window(lut4).width, 16 + 4 * TAP_BITS);
    }

    #[test]
    fn layout_is_reproducible() {
        let graph = DeviceGraph::new(PartId::Mx3140);
        let a = ImageLayout::new(&graph).unwrap();
        let b = ImageLayout::new(&graph).unwrap();
        for instance in graph.resources() {
            assert_eq!(a.window(instance.id), b.window(instance.id));
        }
    }
}
