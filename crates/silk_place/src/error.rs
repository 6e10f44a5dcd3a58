//! Placement failure reporting.

use crate::assignment::Assignment;

/// The placement search could not produce a fully legal assignment.
///
/// Fatal: no output is written. The run is not retried automatically;
/// re-running with a different random seed is the user-level recovery.
#[derive(Debug, thiserror::Error)]
pub enum PlacementFailure {
    /// The design needs more instances of some kind than the part has.
    #[error("no free {kind} instance for cell {cell:?}: device capacity exhausted")]
    InsufficientResources {
        /// The resource kind that ran out.
        kind: String,
        /// The first cell that could not be seeded.
        cell: String,
    },

    /// The search exhausted its budget with unroutable connections left.
    #[error(
        "placement failed: {unroutable} unroutable net arc(s) after {iterations} temperature step(s); worst nets: {}",
        .worst_nets.join(", ")
    )]
    Unroutable {
        /// Unroutable arc count in the best-found state.
        unroutable: u32,
        /// Temperature steps taken before giving up.
        iterations: u32,
        /// Names of the worst-offending nets, most blocked arcs first.
        worst_nets: Vec<String>,
        /// The best-found (illegal) assignment, to aid the next attempt.
        best: Assignment,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offenders() {
        let err = PlacementFailure::Unroutable {
            unroutable: 3,
            iterations: 40,
            worst_nets: vec!["clk".into(), "data[0]".into()],
            best: Assignment::new(0, 0),
        };
        let text = format!("{err}");
        assert!(text.contains("3 unroutable"));
        assert!(text.contains("clk, data[0]"));

        let err = PlacementFailure::InsufficientResources {
            kind: "COUNT".into(),
            cell: "timer9".into(),
        };
        assert!(format!("{err}").contains("COUNT"));
    }
}
