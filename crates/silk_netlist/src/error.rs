//! Structural validation errors.

/// A malformed or inconsistent netlist.
///
/// All variants are fatal: the run aborts before any placement starts and no
/// output file is written.
#[derive(Debug, thiserror::Error)]
pub enum StructuralError {
    /// The interchange text is not valid JSON or misses required fields.
    #[error("malformed netlist JSON: {0}")]
    Json(String),

    /// No module qualifies as the top-level module.
    #[error("no top-level module found")]
    NoTopModule,

    /// More than one module qualifies as the top-level module.
    #[error("{count} top-level modules found; flatten the hierarchy or mark one with the `top` attribute")]
    MultipleTopModules {
        /// How many candidates were found.
        count: usize,
    },

    /// A cell's type names another module; hierarchy must be flattened
    /// before fitting.
    #[error("cell {cell:?} instantiates module {module:?}: hierarchy is not flattened")]
    Hierarchy {
        /// The offending cell instance name.
        cell: String,
        /// The referenced module name.
        module: String,
    },

    /// A cell references a primitive type the device family does not have.
    #[error("cell {cell:?} has undeclared primitive type {ty:?}")]
    UnknownPrimitive {
        /// The offending cell instance name.
        cell: String,
        /// The unknown type tag.
        ty: String,
    },

    /// A cell's connections disagree with its primitive's fixed pin set.
    #[error("cell {cell:?}: {detail}")]
    PortArity {
        /// The offending cell instance name.
        cell: String,
        /// What is missing or unexpected.
        detail: String,
    },

    /// A cell pin is connected to a multi-bit signal; all device primitive
    /// pins are single-bit.
    #[error("cell {cell:?} pin {pin:?} is {width} bits wide; primitive pins are single-bit")]
    WidthMismatch {
        /// The offending cell instance name.
        cell: String,
        /// The offending pin name.
        pin: String,
        /// The width found.
        width: usize,
    },

    /// A pin or port bit is tied to a constant; constants must be folded
    /// into LUT truth tables before fitting.
    #[error("{context} is tied to constant {value:?}; fold constants before fitting")]
    UnsupportedConstant {
        /// Which pin or port the constant appears on.
        context: String,
        /// The constant bit value.
        value: String,
    },

    /// Bidirectional ports are not supported by the fitter.
    #[error("port {port:?} is inout; bidirectional ports are not supported")]
    UnsupportedInout {
        /// The offending port name.
        port: String,
    },

    /// A net has sinks but nothing drives it and it is not marked floating.
    #[error("net {net:?} has no driver and is not marked FLOATING")]
    NoDriver {
        /// The offending net name.
        net: String,
    },

    /// More than one driver on a net.
    #[error("net {net:?} has {count} drivers")]
    MultipleDrivers {
        /// The offending net name.
        net: String,
        /// How many drivers were found.
        count: usize,
    },

    /// A net with fewer than two endpoints that is not marked floating.
    #[error("net {net:?} is dangling (fewer than two endpoints) and not marked FLOATING")]
    Dangling {
        /// The offending net name.
        net: String,
    },

    /// A cell parameter could not be parsed or is out of range.
    #[error("cell {cell:?} parameter {param}={value:?}: {detail}")]
    BadParameter {
        /// The offending cell instance name.
        cell: String,
        /// The parameter name.
        param: String,
        /// The textual value found.
        value: String,
        /// Why it was rejected.
        detail: String,
    },
}
