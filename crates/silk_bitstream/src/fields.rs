//! Per-resource configuration fields and their bit-level codec.
//!
//! [`ResourceConfig`] is the canonical per-instance field set: the encoder
//! lowers the frozen assignment into one `ResourceConfig` per instance and
//! writes it; the decoder reads the same fields back. Round-tripping an
//! image through decode therefore reproduces the encoder's view exactly.

use crate::error::EncodingError;
use crate::image::BitstreamImage;
use crate::layout::{FieldWindow, TAP_BITS, TAP_NONE};
use serde::{Deserialize, Serialize};
use silk_device::{
    DriveStrength, IobDirection, PullDirection, PullStrength, ResourceInstance, ResourceKind,
};

/// The configuration fields of one resource instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceConfig {
    /// A look-up table: truth table over the instance's full arity plus one
    /// tap selector per input (unused inputs hold [`TAP_NONE`]).
    Lut {
        /// Truth table, low `2^arity` bits significant.
        init: u16,
        /// Input tap selectors; entries past the instance arity are unused.
        taps: [u8; 4],
    },
    /// A D flip-flop.
    Dff {
        /// Power-on value.
        init: bool,
        /// D input tap.
        d_tap: u8,
        /// Clock input tap.
        clk_tap: u8,
    },
    /// A down-counter.
    Counter {
        /// Terminal count (14 bits).
        count_to: u16,
        /// Clock pre-divider selector (2 bits).
        clk_div: u8,
        /// Reset input tap.
        rst_tap: u8,
    },
    /// A dedicated inverter.
    Inverter {
        /// Input tap.
        tap: u8,
    },
    /// An I/O buffer.
    Iob {
        /// Pad direction.
        direction: IobDirection,
        /// Pull resistor direction.
        pull: PullDirection,
        /// Pull resistor strength.
        pull_strength: PullStrength,
        /// Output driver strength.
        drive: DriveStrength,
        /// Input schmitt trigger enable.
        schmitt: bool,
        /// Fabric-to-pad input tap (output pads only).
        tap: u8,
    },
    /// An analog comparator.
    AnalogCmp {
        /// Bias trim (4 bits).
        bias: u8,
        /// Input tap.
        tap: u8,
    },
}

impl ResourceConfig {
    /// The reset configuration of an instance: taps at [`TAP_NONE`],
    /// everything else zero.
    pub fn reset(instance: &ResourceInstance) -> Self {
        match instance.kind {
            ResourceKind::Lut2 | ResourceKind::Lut3 | ResourceKind::Lut4 => ResourceConfig::Lut {
                init: 0,
                taps: [TAP_NONE; 4],
            },
            ResourceKind::Dff => ResourceConfig::Dff {
                init: false,
                d_tap: TAP_NONE,
                clk_tap: TAP_NONE,
            },
            ResourceKind::Counter => ResourceConfig::Counter {
                count_to: 0,
                clk_div: 0,
                rst_tap: TAP_NONE,
            },
            ResourceKind::Inverter => ResourceConfig::Inverter { tap: TAP_NONE },
            ResourceKind::Iob => ResourceConfig::Iob {
                direction: IobDirection::Input,
                pull: PullDirection::None,
                pull_strength: PullStrength::S1m,
                drive: DriveStrength::X1,
                schmitt: false,
                tap: TAP_NONE,
            },
            ResourceKind::AnalogCmp => ResourceConfig::AnalogCmp {
                bias: 0,
                tap: TAP_NONE,
            },
        }
    }
}

struct FieldWriter<'a> {
    image: &'a mut BitstreamImage,
    offset: usize,
    end: usize,
    location: String,
}

impl FieldWriter<'_> {
    fn put(&mut self, field: &str, width: usize, value: u64) -> Result<(), EncodingError> {
        if width < 64 && value >> width != 0 {
            return Err(EncodingError::FieldOverflow {
                location: self.location.clone(),
                field: field.to_string(),
                value,
                width,
            });
        }
        debug_assert!(self.offset + width <= self.end, "window overrun");
        self.image.set_field(self.offset, width, value);
        self.offset += width;
        Ok(())
    }
}

struct FieldReader<'a> {
    image: &'a BitstreamImage,
    offset: usize,
}

impl FieldReader<'_> {
    fn take(&mut self, width: usize) -> u64 {
        let value = self.image.get_field(self.offset, width);
        self.offset += width;
        value
    }
}

/// Writes one instance's configuration into its bit window.
pub fn write_config(
    image: &mut BitstreamImage,
    window: FieldWindow,
    instance: &ResourceInstance,
    config: &ResourceConfig,
) -> Result<(), EncodingError> {
    let mut w = FieldWriter {
        image,
        offset: window.offset,
        end: window.offset + window.width,
        location: instance.location_name(),
    };

    match config {
        ResourceConfig::Lut { init, taps } => {
            let arity = instance.arity as usize;
            w.put("init", 1 << arity, *init as u64)?;
            for (i, &tap) in taps.iter().take(arity).enumerate() {
                w.put(&format!("tap{i}"), TAP_BITS, tap as u64)?;
            }
        }
        ResourceConfig::Dff {
            init,
            d_tap,
            clk_tap,
        } => {
            w.put("init", 1, *init as u64)?;
            w.put("d_tap", TAP_BITS, *d_tap as u64)?;
            w.put("clk_tap", TAP_BITS, *clk_tap as u64)?;
        }
        ResourceConfig::Counter {
            count_to,
            clk_div,
            rst_tap,
        } => {
            w.put("count_to", 14, *count_to as u64)?;
            w.put("clk_div", 2, *clk_div as u64)?;
            w.put("rst_tap", TAP_BITS, *rst_tap as u64)?;
        }
        ResourceConfig::Inverter { tap } => {
            w.put("tap", TAP_BITS, *tap as u64)?;
        }
        ResourceConfig::Iob {
            direction,
            pull,
            pull_strength,
            drive,
            schmitt,
            tap,
        } => {
            w.put("direction", 2, direction.bits())?;
            w.put("pull", 2, pull.bits())?;
            w.put("pull_strength", 2, pull_strength.bits())?;
            w.put("drive", 2, drive.bits())?;
            w.put("schmitt", 1, *schmitt as u64)?;
            w.put("tap", TAP_BITS, *tap as u64)?;
        }
        ResourceConfig::AnalogCmp { bias, tap } => {
            w.put("bias", 4, *bias as u64)?;
            w.put("tap", TAP_BITS, *tap as u64)?;
        }
    }
    Ok(())
}

/// Reads one instance's configuration back from its bit window.
pub fn read_config(
    image: &BitstreamImage,
    window: FieldWindow,
    instance: &ResourceInstance,
) -> Result<ResourceConfig, EncodingError> {
    let mut r = FieldReader {
        image,
        offset: window.offset,
    };
    let invalid = |field: &str| EncodingError::InvalidFieldEncoding {
        location: instance.location_name(),
        field: field.to_string(),
    };

    let config = match instance.kind {
        ResourceKind::Lut2 | ResourceKind::Lut3 | ResourceKind::Lut4 => {
            let arity = instance.arity as usize;
            let init = r.take(1 << arity) as u16;
            let mut taps = [TAP_NONE; 4];
            for tap in taps.iter_mut().take(arity) {
                *tap = r.take(TAP_BITS) as u8;
            }
            ResourceConfig::Lut { init, taps }
        }
        ResourceKind::Dff => ResourceConfig::Dff {
            init: r.take(1) != 0,
            d_tap: r.take(TAP_BITS) as u8,
            clk_tap: r.take(TAP_BITS) as u8,
        },
        ResourceKind::Counter => ResourceConfig::Counter {
            count_to: r.take(14) as u16,
            clk_div: r.take(2) as u8,
            rst_tap: r.take(TAP_BITS) as u8,
        },
        ResourceKind::Inverter => ResourceConfig::Inverter {
            tap: r.take(TAP_BITS) as u8,
        },
        ResourceKind::Iob => ResourceConfig::Iob {
            direction: IobDirection::from_bits(r.take(2)).ok_or_else(|| invalid("direction"))?,
            pull: PullDirection::from_bits(r.take(2)).ok_or_else(|| invalid("pull"))?,
            pull_strength: PullStrength::from_bits(r.take(2))
                .ok_or_else(|| invalid("pull_strength"))?,
            drive: DriveStrength::from_bits(r.take(2)).ok_or_else(|| invalid("drive"))?,
            schmitt: r.take(1) != 0,
            tap: r.take(TAP_BITS) as u8,
        },
        ResourceKind::AnalogCmp => ResourceConfig::AnalogCmp {
            bias: r.take(4) as u8,
            tap: r.take(TAP_BITS) as u8,
        },
    };
    Ok(config)
}
