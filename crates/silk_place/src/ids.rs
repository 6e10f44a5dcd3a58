//! Opaque ID newtypes for placement entities.

use silk_common::define_id;

define_id!(
    /// Opaque, copyable ID for a cell in the placement netlist.
    PlaceCellId
);

define_id!(
    /// Opaque, copyable ID for a net in the placement netlist.
    PlaceNetId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        assert_eq!(PlaceCellId::from_raw(5).as_raw(), 5);
        assert_eq!(PlaceNetId::from_raw(7).index(), 7);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", PlaceCellId::from_raw(3)), "3");
    }
}
