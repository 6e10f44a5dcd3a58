//! The unified compilation error.

use silk_bitstream::EncodingError;
use silk_config::ConfigError;
use silk_constraint::ConstraintError;
use silk_netlist::StructuralError;
use silk_place::PlacementFailure;
use silk_timing::TimingError;

/// Any fatal failure of a fitter run.
///
/// Every variant aborts before an output file is written; a partially
/// written file is removed. There is no degraded output.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Malformed or inconsistent netlist.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// Invalid run configuration or configuration attribute.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unsatisfiable or malformed constraint.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// Malformed timing characterization data (a missing file is only a
    /// warning, handled before this error can arise).
    #[error(transparent)]
    Timing(#[from] TimingError),

    /// The placement search did not reach full legality.
    #[error(transparent)]
    Placement(#[from] PlacementFailure),

    /// Bitstream encoding failed, or the image could not be written.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_pass_through() {
        let err: CompileError = StructuralError::NoTopModule.into();
        assert_eq!(format!("{err}"), "no top-level module found");

        let err: CompileError = ConstraintError::UnknownName {
            name: "ghost".into(),
        }
        .into();
        assert!(format!("{err}").contains("ghost"));
    }
}
