//! Resource kinds and electrical option enums.
//!
//! These enums carry both the human-readable names used in netlists and
//! constraint files, and the 2-bit field encodings used by the bitstream
//! encoder. The encodings match the device's documented bit order and must
//! not change.

use serde::{Deserialize, Serialize};

/// The kind of a physical resource instance on the part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// 2-input look-up table.
    Lut2,
    /// 3-input look-up table.
    Lut3,
    /// 4-input look-up table.
    Lut4,
    /// D flip-flop.
    Dff,
    /// Down-counter with programmable period.
    Counter,
    /// Dedicated inverter.
    Inverter,
    /// I/O buffer bonded to a package pin.
    Iob,
    /// Analog comparator hard block.
    AnalogCmp,
}

impl ResourceKind {
    /// All kinds, in the fixed enumeration order used by the device graph.
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Lut2,
        ResourceKind::Lut3,
        ResourceKind::Lut4,
        ResourceKind::Dff,
        ResourceKind::Counter,
        ResourceKind::Inverter,
        ResourceKind::Iob,
        ResourceKind::AnalogCmp,
    ];

    /// The LUT input arity, or 0 for non-LUT kinds.
    pub fn lut_arity(self) -> u8 {
        match self {
            ResourceKind::Lut2 => 2,
            ResourceKind::Lut3 => 3,
            ResourceKind::Lut4 => 4,
            _ => 0,
        }
    }

    /// The constraint-file prefix for instances of this kind
    /// (e.g. `LUT4_1`, `DFF3`).
    pub fn location_prefix(self) -> &'static str {
        match self {
            ResourceKind::Lut2 => "LUT2_",
            ResourceKind::Lut3 => "LUT3_",
            ResourceKind::Lut4 => "LUT4_",
            ResourceKind::Dff => "DFF",
            ResourceKind::Counter => "COUNT",
            ResourceKind::Inverter => "INV",
            ResourceKind::Iob => "IOB",
            ResourceKind::AnalogCmp => "ACMP",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResourceKind::Lut2 => "LUT2",
            ResourceKind::Lut3 => "LUT3",
            ResourceKind::Lut4 => "LUT4",
            ResourceKind::Dff => "DFF",
            ResourceKind::Counter => "COUNT",
            ResourceKind::Inverter => "INV",
            ResourceKind::Iob => "IOB",
            ResourceKind::AnalogCmp => "ACMP",
        };
        write!(f, "{name}")
    }
}

/// The cost class of a fabric connection between two resource instances.
///
/// `Direct` connections go through one crossbar hop inside a single matrix;
/// `Buffered` connections cross between matrices through an intermediate
/// buffer and are slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CostClass {
    /// Single crossbar hop within one matrix.
    Direct,
    /// Cross-matrix connection through an intermediate buffer.
    Buffered,
}

/// Pull resistor direction for an I/O pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PullDirection {
    /// No pull resistor; the pin floats when undriven.
    #[default]
    None,
    /// Pull up toward the I/O supply.
    Up,
    /// Pull down toward ground.
    Down,
}

impl PullDirection {
    /// Parses an attribute or option value (`UP`, `DOWN`, `NONE`, `FLOAT`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "UP" => Some(PullDirection::Up),
            "DOWN" => Some(PullDirection::Down),
            "NONE" | "FLOAT" => Some(PullDirection::None),
            _ => None,
        }
    }

    /// The 2-bit bitstream field encoding.
    pub fn bits(self) -> u64 {
        match self {
            PullDirection::None => 0,
            PullDirection::Up => 1,
            PullDirection::Down => 2,
        }
    }

    /// Decodes the 2-bit bitstream field.
    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(PullDirection::None),
            1 => Some(PullDirection::Up),
            2 => Some(PullDirection::Down),
            _ => None,
        }
    }
}

/// Pull resistor strength for an I/O pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PullStrength {
    /// 10 kΩ.
    S10k,
    /// 100 kΩ.
    S100k,
    /// 1 MΩ.
    S1m,
}

impl Default for PullStrength {
    fn default() -> Self {
        PullStrength::S1m
    }
}

impl PullStrength {
    /// Parses an attribute or option value (`10K`, `100K`, `1M`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "10K" => Some(PullStrength::S10k),
            "100K" => Some(PullStrength::S100k),
            "1M" => Some(PullStrength::S1m),
            _ => None,
        }
    }

    /// The 2-bit bitstream field encoding.
    pub fn bits(self) -> u64 {
        match self {
            PullStrength::S10k => 0,
            PullStrength::S100k => 1,
            PullStrength::S1m => 2,
        }
    }

    /// Decodes the 2-bit bitstream field.
    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(PullStrength::S10k),
            1 => Some(PullStrength::S100k),
            2 => Some(PullStrength::S1m),
            _ => None,
        }
    }
}

/// Output driver strength for an I/O pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveStrength {
    /// Standard drive.
    #[default]
    X1,
    /// Double drive.
    X2,
    /// Quadruple drive.
    X4,
}

impl DriveStrength {
    /// Parses an attribute value (`1X`, `2X`, `4X`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "1X" => Some(DriveStrength::X1),
            "2X" => Some(DriveStrength::X2),
            "4X" => Some(DriveStrength::X4),
            _ => None,
        }
    }

    /// The 2-bit bitstream field encoding.
    pub fn bits(self) -> u64 {
        match self {
            DriveStrength::X1 => 0,
            DriveStrength::X2 => 1,
            DriveStrength::X4 => 2,
        }
    }

    /// Decodes the 2-bit bitstream field.
    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(DriveStrength::X1),
            1 => Some(DriveStrength::X2),
            2 => Some(DriveStrength::X4),
            _ => None,
        }
    }
}

/// Configured direction of an I/O buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IobDirection {
    /// Input buffer enabled, output driver off. Also the state of an unused
    /// pin (with the unused-pin pull policy applied).
    #[default]
    Input,
    /// Output driver enabled.
    Output,
}

impl IobDirection {
    /// The 2-bit bitstream field encoding.
    pub fn bits(self) -> u64 {
        match self {
            IobDirection::Input => 0,
            IobDirection::Output => 1,
        }
    }

    /// Decodes the 2-bit bitstream field.
    pub fn from_bits(bits: u64) -> Option<Self> {
        match bits {
            0 => Some(IobDirection::Input),
            1 => Some(IobDirection::Output),
            _ => None,
        }
    }
}
