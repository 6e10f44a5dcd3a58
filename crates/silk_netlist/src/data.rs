//! Typed netlist graph structures.
//!
//! Built once from the interchange JSON and immutable thereafter. Cells and
//! nets are enumerated in a deterministic order (sorted by name within the
//! module), and net identity is the module-scoped net index from the
//! interchange format.

use std::collections::BTreeMap;

/// Direction of a module port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Driven from outside the chip into the fabric.
    Input,
    /// Driven by the fabric off-chip.
    Output,
}

/// A device primitive kind a netlist cell can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// Look-up table with 2–4 inputs.
    Lut {
        /// Number of LUT inputs.
        arity: u8,
    },
    /// D flip-flop.
    Dff,
    /// Down-counter with a programmable period.
    Counter,
    /// Dedicated inverter.
    Inverter,
    /// Explicit I/O buffer.
    Iob,
    /// Analog comparator.
    AnalogCmp,
}

impl PrimitiveKind {
    /// Resolves a netlist type tag to a primitive kind.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "LUT2" => Some(PrimitiveKind::Lut { arity: 2 }),
            "LUT3" => Some(PrimitiveKind::Lut { arity: 3 }),
            "LUT4" => Some(PrimitiveKind::Lut { arity: 4 }),
            "DFF" => Some(PrimitiveKind::Dff),
            "COUNT" => Some(PrimitiveKind::Counter),
            "INV" => Some(PrimitiveKind::Inverter),
            "IOB" => Some(PrimitiveKind::Iob),
            "ACMP" => Some(PrimitiveKind::AnalogCmp),
            _ => None,
        }
    }

    /// Input pin names this primitive must have connected, in slot order.
    pub fn required_inputs(&self) -> &'static [&'static str] {
        match self {
            PrimitiveKind::Lut { arity: 2 } => &["IN0", "IN1"],
            PrimitiveKind::Lut { arity: 3 } => &["IN0", "IN1", "IN2"],
            PrimitiveKind::Lut { .. } => &["IN0", "IN1", "IN2", "IN3"],
            PrimitiveKind::Dff => &["D", "CLK"],
            PrimitiveKind::Counter => &[],
            PrimitiveKind::Inverter => &["IN"],
            // An IOB's legal pin shapes (exactly one of IN/OUT) are checked
            // separately by validation.
            PrimitiveKind::Iob => &[],
            PrimitiveKind::AnalogCmp => &["IN"],
        }
    }

    /// Input pin names that may be left unconnected, in slot order after the
    /// required ones.
    pub fn optional_inputs(&self) -> &'static [&'static str] {
        match self {
            PrimitiveKind::Counter => &["RST"],
            PrimitiveKind::Iob => &["IN"],
            _ => &[],
        }
    }

    /// All input pin names in slot order (required, then optional).
    pub fn input_slots(&self) -> Vec<&'static str> {
        let mut slots = self.required_inputs().to_vec();
        slots.extend_from_slice(self.optional_inputs());
        slots
    }

    /// The output pin name.
    ///
    /// For an IOB this is the pad-to-fabric pin, present only on input pads.
    pub fn output_pin(&self) -> &'static str {
        match self {
            PrimitiveKind::Dff => "Q",
            _ => "OUT",
        }
    }

    /// The netlist type tag for this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            PrimitiveKind::Lut { arity: 2 } => "LUT2",
            PrimitiveKind::Lut { arity: 3 } => "LUT3",
            PrimitiveKind::Lut { .. } => "LUT4",
            PrimitiveKind::Dff => "DFF",
            PrimitiveKind::Counter => "COUNT",
            PrimitiveKind::Inverter => "INV",
            PrimitiveKind::Iob => "IOB",
            PrimitiveKind::AnalogCmp => "ACMP",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Typed per-cell configuration parsed from cell parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellConfig {
    /// LUT truth table. Bit `i` of `init` is the output when the input word
    /// (IN0 = bit 0) equals `i`.
    Lut {
        /// Truth table, low `2^arity` bits significant.
        init: u16,
    },
    /// Flip-flop power-on value.
    Dff {
        /// Power-on output value.
        init: bool,
    },
    /// Counter period and clock divider.
    Counter {
        /// Terminal count value (14 bits).
        count_to: u16,
        /// Encoded clock pre-divider selector (0..=3 for /1, /4, /16, /64).
        clk_div: u8,
    },
    /// No configuration beyond connectivity.
    Inverter,
    /// Electrical options are carried as attributes and interpreted by the
    /// placement conversion, which knows the device option vocabulary.
    Iob,
    /// Comparator bias trim.
    AnalogCmp {
        /// Bias trim value (4 bits).
        bias: u8,
    },
}

/// One cell instance in a module.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Instance name.
    pub name: String,
    /// The primitive kind this cell maps to.
    pub kind: PrimitiveKind,
    /// Typed configuration parsed from cell parameters.
    pub config: CellConfig,
    /// Pin name to module-scoped net index.
    pub connections: BTreeMap<String, u32>,
    /// Uninterpreted attributes (e.g. electrical options on an IOB).
    pub attributes: BTreeMap<String, String>,
}

/// One port of a module, one entry per declared port name.
#[derive(Debug, Clone)]
pub struct Port {
    /// Port name.
    pub name: String,
    /// Direction as seen from inside the module.
    pub direction: PortDirection,
    /// Module-scoped net indices, one per bit.
    pub bits: Vec<u32>,
}

impl Port {
    /// The canonical name of one bit of this port: the port name itself for
    /// single-bit ports, `name[i]` otherwise.
    pub fn bit_name(&self, bit: usize) -> String {
        if self.bits.len() == 1 {
            self.name.clone()
        } else {
            format!("{}[{bit}]", self.name)
        }
    }
}

/// One net in a module's shared net-index space.
#[derive(Debug, Clone, Default)]
pub struct Net {
    /// Declared net name, if any.
    pub name: Option<String>,
    /// Uninterpreted net attributes (e.g. `FLOATING`).
    pub attributes: BTreeMap<String, String>,
}

impl Net {
    /// Whether this net is explicitly marked as intentionally floating.
    pub fn is_marked_floating(&self) -> bool {
        self.attributes
            .get("FLOATING")
            .is_some_and(|v| v != "0" && !v.is_empty())
    }
}

/// One module of the design.
#[derive(Debug, Clone)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Ports in enumeration order.
    pub ports: Vec<Port>,
    /// Cells in enumeration order.
    pub cells: Vec<Cell>,
    /// Nets keyed by module-scoped net index.
    pub nets: BTreeMap<u32, Net>,
    /// Module attributes (e.g. `UNUSED_PULL`, `top`).
    pub attributes: BTreeMap<String, String>,
}

impl Module {
    /// Returns the display name for a net index (declared name or `$<idx>`).
    pub fn net_name(&self, index: u32) -> String {
        match self.nets.get(&index).and_then(|n| n.name.clone()) {
            Some(name) => name,
            None => format!("${index}"),
        }
    }

    /// Whether this module carries a truthy `top` attribute.
    pub fn is_marked_top(&self) -> bool {
        self.attributes
            .get("top")
            .is_some_and(|v| v != "0" && !v.is_empty())
    }
}

/// The whole parsed design.
#[derive(Debug, Clone)]
pub struct Netlist {
    /// All modules in enumeration order.
    pub modules: Vec<Module>,
    /// Index of the designated top module in `modules`.
    pub top: usize,
}

impl Netlist {
    /// The designated top-level module.
    pub fn top_module(&self) -> &Module {
        &self.modules[self.top]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_name_roundtrip() {
        for name in ["LUT2", "LUT3", "LUT4", "DFF", "COUNT", "INV", "IOB", "ACMP"] {
            let kind = PrimitiveKind::from_type_name(name).unwrap();
            assert_eq!(kind.type_name(), name);
        }
        assert!(PrimitiveKind::from_type_name("LUT5").is_none());
        assert!(PrimitiveKind::from_type_name("dff").is_none());
    }

    #[test]
    fn lut_pin_sets() {
        let lut3 = PrimitiveKind::Lut { arity: 3 };
        assert_eq!(lut3.required_inputs(), &["IN0", "IN1", "IN2"]);
        assert_eq!(lut3.output_pin(), "OUT");
    }

    #[test]
    fn counter_rst_is_optional() {
        let counter = PrimitiveKind::Counter;
        assert!(counter.required_inputs().is_empty());
        assert_eq!(counter.optional_inputs(), &["RST"]);
        assert_eq!(counter.input_slots(), vec!["RST"]);
    }

    #[test]
    fn dff_slots() {
        assert_eq!(PrimitiveKind::Dff.input_slots(), vec!["D", "CLK"]);
        assert_eq!(PrimitiveKind::Dff.output_pin(), "Q");
    }

    #[test]
    fn port_bit_names() {
        let port = Port {
            name: "data".into(),
            direction: PortDirection::Input,
            bits: vec![2, 3],
        };
        assert_eq!(port.bit_name(0), "data[0]");
        assert_eq!(port.bit_name(1), "data[1]");

        let single = Port {
            name: "clk".into(),
            direction: PortDirection::Input,
            bits: vec![4],
        };
        assert_eq!(single.bit_name(0), "clk");
    }

    #[test]
    fn floating_marker() {
        let mut net = Net::default();
        assert!(!net.is_marked_floating());
        net.attributes.insert("FLOATING".into(), "1".into());
        assert!(net.is_marked_floating());
        net.attributes.insert("FLOATING".into(), "0".into());
        assert!(!net.is_marked_floating());
    }

    #[test]
    fn net_display_names() {
        let mut module = Module {
            name: "m".into(),
            ports: vec![],
            cells: vec![],
            nets: BTreeMap::new(),
            attributes: BTreeMap::new(),
        };
        module.nets.insert(
            7,
            Net {
                name: Some("clk".into()),
                attributes: BTreeMap::new(),
            },
        );
        assert_eq!(module.net_name(7), "clk");
        assert_eq!(module.net_name(9), "$9");
    }
}
