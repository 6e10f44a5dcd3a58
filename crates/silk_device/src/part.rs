//! Part tables for the MX family.
//!
//! Each supported part is described by a static [`PartSpec`]: per-matrix
//! resource counts, the package pin map, and the configuration image length.
//! The family shares one fabric architecture; only counts and pin bonding
//! differ between parts.

use crate::kinds::ResourceKind;
use serde::{Deserialize, Serialize};

/// A supported target part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartId {
    /// Dual-matrix flagship, 20-pin package, 18 user I/Os.
    Mx3620,
    /// Dual-matrix variant of the MX3620 with one fewer bonded I/O.
    Mx3621,
    /// Single-matrix part, 16-pin package, 14 user I/Os.
    Mx3140,
}

impl PartId {
    /// Parses a part name such as `MX3620`.
    ///
    /// Returns an error naming the supported parts on any other input.
    pub fn parse(name: &str) -> Result<Self, UnknownPartError> {
        match name.to_ascii_uppercase().as_str() {
            "MX3620" => Ok(PartId::Mx3620),
            "MX3621" => Ok(PartId::Mx3621),
            "MX3140" => Ok(PartId::Mx3140),
            _ => Err(UnknownPartError {
                name: name.to_string(),
            }),
        }
    }

    /// Returns the static description of this part.
    pub fn spec(self) -> &'static PartSpec {
        match self {
            PartId::Mx3620 => &MX3620,
            PartId::Mx3621 => &MX3621,
            PartId::Mx3140 => &MX3140,
        }
    }
}

impl std::fmt::Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spec().name)
    }
}

/// The requested part name is not in the family.
#[derive(Debug, thiserror::Error)]
#[error("unknown part {name:?} (supported: MX3620, MX3621, MX3140)")]
pub struct UnknownPartError {
    /// The name that failed to parse.
    pub name: String,
}

/// Static description of one part: resource counts, pin map, image length.
#[derive(Debug)]
pub struct PartSpec {
    /// Canonical part name.
    pub name: &'static str,
    /// Number of crossbar matrices (1 or 2).
    pub matrices: u8,
    /// Per-matrix fabric resource counts, in kind enumeration order:
    /// LUT2, LUT3, LUT4, DFF, COUNT, INV.
    pub fabric_per_matrix: [u8; 6],
    /// Bonded I/O pins as `(package pin, matrix)` pairs, in pin order.
    pub iob_pins: &'static [(u8, u8)],
    /// Analog comparator count per matrix, indexed by matrix number.
    pub acmp_per_matrix: [u8; 2],
    /// Configuration image length in bits.
    pub image_bits: usize,
}

impl PartSpec {
    /// Total count of instances of `kind` across all matrices.
    pub fn count_of(&self, kind: ResourceKind) -> usize {
        let per_matrix = |n: u8| n as usize * self.matrices as usize;
        match kind {
            ResourceKind::Lut2 => per_matrix(self.fabric_per_matrix[0]),
            ResourceKind::Lut3 => per_matrix(self.fabric_per_matrix[1]),
            ResourceKind::Lut4 => per_matrix(self.fabric_per_matrix[2]),
            ResourceKind::Dff => per_matrix(self.fabric_per_matrix[3]),
            ResourceKind::Counter => per_matrix(self.fabric_per_matrix[4]),
            ResourceKind::Inverter => per_matrix(self.fabric_per_matrix[5]),
            ResourceKind::Iob => self.iob_pins.len(),
            ResourceKind::AnalogCmp => {
                self.acmp_per_matrix[0] as usize + self.acmp_per_matrix[1] as usize
            }
        }
    }

    /// Total resource instance count on the part.
    pub fn total_resources(&self) -> usize {
        ResourceKind::ALL.iter().map(|&k| self.count_of(k)).sum()
    }
}

/// MX3620: two matrices, 18 I/Os, 2048-bit image.
pub static MX3620: PartSpec = PartSpec {
    name: "MX3620",
    matrices: 2,
    fabric_per_matrix: [4, 4, 2, 6, 3, 1],
    iob_pins: &[
        (2, 0),
        (3, 0),
        (4, 0),
        (5, 0),
        (6, 0),
        (7, 0),
        (8, 0),
        (9, 0),
        (10, 0),
        (12, 1),
        (13, 1),
        (14, 1),
        (15, 1),
        (16, 1),
        (17, 1),
        (18, 1),
        (19, 1),
        (20, 1),
    ],
    acmp_per_matrix: [0, 2],
    image_bits: 2048,
};

/// MX3621: the MX3620 die in a package bonding out one fewer I/O.
pub static MX3621: PartSpec = PartSpec {
    name: "MX3621",
    matrices: 2,
    fabric_per_matrix: [4, 4, 2, 6, 3, 1],
    iob_pins: &[
        (2, 0),
        (3, 0),
        (4, 0),
        (5, 0),
        (6, 0),
        (7, 0),
        (8, 0),
        (9, 0),
        (10, 0),
        (12, 1),
        (13, 1),
        (14, 1),
        (15, 1),
        (16, 1),
        (17, 1),
        (18, 1),
        (19, 1),
    ],
    acmp_per_matrix: [0, 2],
    image_bits: 2048,
};

/// MX3140: single matrix, 14 I/Os, 1024-bit image.
pub static MX3140: PartSpec = PartSpec {
    name: "MX3140",
    matrices: 1,
    fabric_per_matrix: [6, 4, 2, 6, 2, 1],
    iob_pins: &[
        (2, 0),
        (3, 0),
        (4, 0),
        (5, 0),
        (6, 0),
        (7, 0),
        (8, 0),
        (9, 0),
        (10, 0),
        (11, 0),
        (12, 0),
        (13, 0),
        (14, 0),
        (15, 0),
    ],
    acmp_per_matrix: [1, 0],
    image_bits: 1024,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_parts() {
        assert_eq!(PartId::parse("MX3620").unwrap(), PartId::Mx3620);
        assert_eq!(PartId::parse("mx3621").unwrap(), PartId::Mx3621);
        assert_eq!(PartId::parse("MX3140").unwrap(), PartId::Mx3140);
    }

    #[test]
    fn parse_unknown_part() {
        let err = PartId::parse("MX9999").unwrap_err();
        assert!(format!("{err}").contains("MX9999"));
        assert!(format!("{err}").contains("MX3620"));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", PartId::Mx3140), "MX3140");
    }

    #[test]
    fn mx3620_counts() {
        let spec = PartId::Mx3620.spec();
        assert_eq!(spec.count_of(ResourceKind::Lut2), 8);
        assert_eq!(spec.count_of(ResourceKind::Lut4), 4);
        assert_eq!(spec.count_of(ResourceKind::Dff), 12);
        assert_eq!(spec.count_of(ResourceKind::Iob), 18);
        assert_eq!(spec.count_of(ResourceKind::AnalogCmp), 2);
        assert_eq!(spec.image_bits, 2048);
    }

    #[test]
    fn mx3621_is_mx3620_minus_one_pin() {
        let a = PartId::Mx3620.spec();
        let b = PartId::Mx3621.spec();
        assert_eq!(a.fabric_per_matrix, b.fabric_per_matrix);
        assert_eq!(a.iob_pins.len(), b.iob_pins.len() + 1);
    }

    #[test]
    fn mx3140_counts() {
        let spec = PartId::Mx3140.spec();
        assert_eq!(spec.matrices, 1);
        assert_eq!(spec.count_of(ResourceKind::Lut2), 6);
        assert_eq!(spec.count_of(ResourceKind::Counter), 2);
        assert_eq!(spec.count_of(ResourceKind::Iob), 14);
        assert_eq!(spec.image_bits, 1024);
    }

    #[test]
    fn pins_are_sorted_and_unique() {
        for part in [PartId::Mx3620, PartId::Mx3621, PartId::Mx3140] {
            let pins: Vec<u8> = part.spec().iob_pins.iter().map(|&(p, _)| p).collect();
            let mut sorted = pins.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(pins, sorted, "{part}");
        }
    }

    /// Every tap selector in the bitstream is 6 bits wide with one sentinel,
    /// so a part may expose at most 63 resource instances.
    #[test]
    fn resource_counts_fit_tap_encoding() {
        for part in [PartId::Mx3620, PartId::Mx3621, PartId::Mx3140] {
            assert!(part.spec().total_resources() <= 63, "{part}");
        }
    }
}
