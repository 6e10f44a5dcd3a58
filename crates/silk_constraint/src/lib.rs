//! Placement constraints for the silk fitter.
//!
//! Parses the line-oriented constraint format and resolves each entry to a
//! [`Binding`](silk_place::Binding) applied before the search starts:
//!
//! ```text
//! # pin assignments
//! loc  clk   P2        # lock a port to a package pin
//! loc  ff0   DFF3      # lock a cell to a specific instance
//! hint acc   LUT4_1    # starting position only; the search may move it
//! ```
//!
//! Unknown syntax is a parse error, never a silent skip. A name must
//! resolve to exactly one netlist object, a location to exactly one
//! resource instance compatible with the cell's kind, and no two
//! constraints may claim the same cell or the same instance.

#![warn(missing_docs)]

pub mod error;
pub mod parse;
pub mod resolve;

pub use error::ConstraintError;
pub use parse::{parse_constraints, Constraint, Location};
pub use resolve::resolve;
