//! The placement netlist: the flat, physical view of the design.
//!
//! Every cell here maps to exactly one device resource instance, including
//! the I/O buffer cells materialized from the top module's ports. Nets are
//! stars rooted at their driver pin. The structure is immutable during the
//! search; only the [`Assignment`](crate::Assignment) moves.

use crate::ids::{PlaceCellId, PlaceNetId};
use serde::{Deserialize, Serialize};
use silk_device::{DriveStrength, IobDirection, PullDirection, PullStrength, ResourceKind};
use std::collections::HashMap;

/// The physical kind and configuration of one placement cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceCellKind {
    /// A look-up table.
    Lut {
        /// Number of used inputs (2–4).
        arity: u8,
        /// Truth table over the used inputs, low `2^arity` bits significant.
        init: u16,
    },
    /// A D flip-flop.
    Dff {
        /// Power-on output value.
        init: bool,
    },
    /// A down-counter.
    Counter {
        /// Terminal count (14 bits).
        count_to: u16,
        /// Encoded clock pre-divider (0..=3).
        clk_div: u8,
    },
    /// A dedicated inverter.
    Inverter,
    /// An I/O buffer, either from an explicit netlist cell or materialized
    /// from a top-level port.
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
    },
    /// An analog comparator.
    AnalogCmp {
        /// Bias trim (4 bits).
        bias: u8,
    },
}

impl PlaceCellKind {
    /// Number of fabric input slots this cell consumes.
    pub fn input_slot_count(&self) -> usize {
        match self {
            PlaceCellKind::Lut { arity, .. } => *arity as usize,
            PlaceCellKind::Dff { .. } => 2,
            PlaceCellKind::Counter { .. } => 1,
            PlaceCellKind::Inverter => 1,
            PlaceCellKind::Iob { direction, .. } => match direction {
                IobDirection::Output => 1,
                IobDirection::Input => 0,
            },
            PlaceCellKind::AnalogCmp { .. } => 1,
        }
    }

    /// Whether a cell of this kind may occupy a resource instance of the
    /// given kind.
    ///
    /// A LUT may occupy any instance of its arity or wider (the truth table
    /// is expanded over the unused inputs); an inverter may also occupy any
    /// LUT instance. Everything else requires its exact kind.
    pub fn placeable_on(&self, resource: ResourceKind) -> bool {
        match self {
            PlaceCellKind::Lut { arity, .. } => resource.lut_arity() >= *arity,
            PlaceCellKind::Inverter => {
                resource == ResourceKind::Inverter || resource.lut_arity() > 0
            }
            PlaceCellKind::Dff { .. } => resource == ResourceKind::Dff,
            PlaceCellKind::Counter { .. } => resource == ResourceKind::Counter,
            PlaceCellKind::Iob { .. } => resource == ResourceKind::Iob,
            PlaceCellKind::AnalogCmp { .. } => resource == ResourceKind::AnalogCmp,
        }
    }

    /// The preferred resource kinds for this cell, tightest fit first.
    pub fn candidate_kinds(&self) -> Vec<ResourceKind> {
        match self {
            PlaceCellKind::Lut { arity: 2, .. } => {
                vec![ResourceKind::Lut2, ResourceKind::Lut3, ResourceKind::Lut4]
            }
            PlaceCellKind::Lut { arity: 3, .. } => vec![ResourceKind::Lut3, ResourceKind::Lut4],
            PlaceCellKind::Lut { .. } => vec![ResourceKind::Lut4],
            PlaceCellKind::Inverter => vec![
                ResourceKind::Inverter,
                ResourceKind::Lut2,
                ResourceKind::Lut3,
                ResourceKind::Lut4,
            ],
            PlaceCellKind::Dff { .. } => vec![ResourceKind::Dff],
            PlaceCellKind::Counter { .. } => vec![ResourceKind::Counter],
            PlaceCellKind::Iob { .. } => vec![ResourceKind::Iob],
            PlaceCellKind::AnalogCmp { .. } => vec![ResourceKind::AnalogCmp],
        }
    }
}

/// One cell in the placement netlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceCell {
    /// The unique ID of this cell.
    pub id: PlaceCellId,
    /// Cell instance name (or port bit name for materialized IOBs).
    pub name: String,
    /// Physical kind and configuration.
    pub kind: PlaceCellKind,
}

/// A reference to one pin of one cell.
///
/// For net sinks, `slot` is the cell's input slot index; for the driver it
/// is unused and always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRef {
    /// The cell.
    pub cell: PlaceCellId,
    /// Input slot index on the cell (sinks only).
    pub slot: u8,
}

/// One net: a star rooted at the driver pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceNet {
    /// The unique ID of this net.
    pub id: PlaceNetId,
    /// Net name from the interchange format.
    pub name: String,
    /// The driving pin.
    pub driver: PinRef,
    /// The sink pins.
    pub sinks: Vec<PinRef>,
}

/// The flat placement netlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceNetlist {
    /// All cells, indexed by [`PlaceCellId`].
    pub cells: Vec<PlaceCell>,
    /// All nets, indexed by [`PlaceNetId`].
    pub nets: Vec<PlaceNet>,
    /// Cell name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub cell_by_name: HashMap<String, PlaceCellId>,
    /// Nets incident to each cell, for delta cost evaluation
    /// (rebuilt on deserialization).
    #[serde(skip)]
    pub nets_of_cell: Vec<Vec<PlaceNetId>>,
}

impl PlaceNetlist {
    /// Creates an empty netlist.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            nets: Vec::new(),
            cell_by_name: HashMap::new(),
            nets_of_cell: Vec::new(),
        }
    }

    /// Adds a cell and returns its ID.
    pub fn add_cell(&mut self, name: impl Into<String>, kind: PlaceCellKind) -> PlaceCellId {
        let id = PlaceCellId::from_raw(self.cells.len() as u32);
        let name = name.into();
        self.cell_by_name.insert(name.clone(), id);
        self.cells.push(PlaceCell { id, name, kind });
        id
    }

    /// Adds a net and returns its ID.
    pub fn add_net(
        &mut self,
        name: impl Into<String>,
        driver: PinRef,
        sinks: Vec<PinRef>,
    ) -> PlaceNetId {
        let id = PlaceNetId::from_raw(self.nets.len() as u32);
        self.nets.push(PlaceNet {
            id,
            name: name.into(),
            driver,
            sinks,
        });
        id
    }

    /// Returns the cell with the given ID.
    pub fn cell(&self, id: PlaceCellId) -> &PlaceCell {
        &self.cells[id.index()]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: PlaceNetId) -> &PlaceNet {
        &self.nets[id.index()]
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Rebuilds the name index and the cell/net incidence lists.
    ///
    /// Must be called after adding all nets (and after deserialization).
    pub fn rebuild_indices(&mut self) {
        self.cell_by_name.clear();
        for (i, cell) in self.cells.iter().enumerate() {
            self.cell_by_name
                .insert(cell.name.clone(), PlaceCellId::from_raw(i as u32));
        }
        self.nets_of_cell = vec![Vec::new(); self.cells.len()];
        for net in &self.nets {
            let mut touched: Vec<PlaceCellId> = Vec::with_capacity(net.sinks.len() + 1);
            touched.push(net.driver.cell);
            for sink in &net.sinks {
                touched.push(sink.cell);
            }
            touched.sort_unstable();
            touched.dedup();
            for cell in touched {
                self.nets_of_cell[cell.index()].push(net.id);
            }
        }
    }

    /// The nets incident to a cell.
    pub fn nets_of(&self, cell: PlaceCellId) -> &[PlaceNetId] {
        &self.nets_of_cell[cell.index()]
    }
}

impl Default for PlaceNetlist {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lut2(init: u16) -> PlaceCellKind {
        PlaceCellKind::Lut { arity: 2, init }
    }

    #[test]
    fn lut_placeable_on_wider_instances() {
        let kind = lut2(0b1000);
        assert!(kind.placeable_on(ResourceKind::Lut2));
        assert!(kind.placeable_on(ResourceKind::Lut3));
        assert!(kind.placeable_on(ResourceKind::Lut4));
        assert!(!kind.placeable_on(ResourceKind::Dff));

        let lut4 = PlaceCellKind::Lut {
            arity: 4,
            init: 0xFFFF,
        };
        assert!(!lut4.placeable_on(ResourceKind::Lut3));
        assert!(lut4.placeable_on(ResourceKind::Lut4));
    }

    #[test]
    fn inverter_placeable_on_luts() {
        let inv = PlaceCellKind::Inverter;
        assert!(inv.placeable_on(ResourceKind::Inverter));
        assert!(inv.placeable_on(ResourceKind::Lut2));
        assert!(!inv.placeable_on(ResourceKind::Iob));
    }

    #[test]
    fn candidate_kinds_tightest_first() {
        let kinds = lut2(0).candidate_kinds();
        assert_eq!(kinds[0], ResourceKind::Lut2);
        assert_eq!(kinds.len(), 3);
        assert_eq!(
            PlaceCellKind::Dff { init: false }.candidate_kinds(),
            vec![ResourceKind::Dff]
        );
    }

    #[test]
    fn input_slot_counts() {
        assert_eq!(lut2(0).input_slot_count(), 2);
        assert_eq!(PlaceCellKind::Dff { init: false }.input_slot_count(), 2);
        assert_eq!(
            PlaceCellKind::Counter {
                count_to: 9,
                clk_div: 0
            }
            .input_slot_count(),
            1
        );
        let in_pad = PlaceCellKind::Iob {
            direction: IobDirection::Input,
            pull: PullDirection::None,
            pull_strength: PullStrength::S1m,
            drive: DriveStrength::X1,
            schmitt: false,
        };
        assert_eq!(in_pad.input_slot_count(), 0);
    }

    #[test]
    fn incidence_lists() {
        let mut nl = PlaceNetlist::new();
        let a = nl.add_cell("a", lut2(0));
        let b = nl.add_cell("b", lut2(0));
        let c = nl.add_cell("c", lut2(0));
        let n0 = nl.add_net(
            "n0",
            PinRef { cell: a, slot: 0 },
            vec![PinRef { cell: b, slot: 0 }],
        );
        let n1 = nl.add_net(
            "n1",
            PinRef { cell: b, slot: 0 },
            vec![PinRef { cell: c, slot: 1 }],
        );
        nl.rebuild_indices();

        assert_eq!(nl.nets_of(a), &[n0]);
        assert_eq!(nl.nets_of(b), &[n0, n1]);
        assert_eq!(nl.nets_of(c), &[n1]);
        assert_eq!(nl.cell_by_name["b"], b);
    }

    #[test]
    fn serde_roundtrip_rebuilds_indices() {
        let mut nl = PlaceNetlist::new();
        let a = nl.add_cell("x", PlaceCellKind::Inverter);
        let b = nl.add_cell("y", PlaceCellKind::Dff { init: true });
        nl.add_net(
            "n",
            PinRef { cell: a, slot: 0 },
            vec![PinRef { cell: b, slot: 0 }],
        );
        nl.rebuild_indices();

        let json = serde_json::to_string(&nl).unwrap();
        let mut back: PlaceNetlist = serde_json::from_str(&json).unwrap();
        back.rebuild_indices();
        assert_eq!(back.cell_count(), 2);
        assert_eq!(back.nets_of(a).len(), 1);
    }
}
