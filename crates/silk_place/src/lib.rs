//! Constraint-aware placement for the silk fitter.
//!
//! Assigns every netlist primitive to a concrete device resource instance
//! such that every net is realizable through the static crossbar fabric.
//! The search is randomized local search (simulated annealing) over legal
//! assignments, driven by the connectivity-legality oracle and, when
//! loaded, the timing model.
//!
//! # Pipeline
//!
//! 1. **Convert** — flatten the validated top module into a [`PlaceNetlist`]
//! 2. **Bind** — apply constraint-derived [`Binding`]s; locked cells never move
//! 3. **Seed** — first-fit the remaining cells onto free instances
//! 4. **Anneal** — refine under the Metropolis criterion
//! 5. **Final check** — a full legality pass; anything unroutable is a
//!    [`PlacementFailure`], never a silently degraded result
//!
//! Given the same netlist, constraints, part, and seed, the produced
//! [`Assignment`] is bit-identical across runs.

#![warn(missing_docs)]

pub mod anneal;
pub mod assignment;
pub mod convert;
pub mod cost;
pub mod data;
pub mod error;
pub mod ids;
mod initial;
pub mod legality;

pub use anneal::{AnnealOutcome, AnnealSchedule};
pub use assignment::{Assignment, Binding};
pub use convert::convert;
pub use cost::{CostModel, NetScore, UNROUTABLE_WEIGHT};
pub use data::{PinRef, PlaceCell, PlaceCellKind, PlaceNet, PlaceNetlist};
pub use error::PlacementFailure;
pub use ids::{PlaceCellId, PlaceNetId};
pub use legality::{check_net, unroutable_total, worst_net_names, NetLegality};

use rand::rngs::StdRng;
use rand::SeedableRng;
use silk_device::DeviceGraph;
use silk_diagnostics::DiagnosticSink;
use silk_timing::TimingModel;

/// Places the whole netlist and returns the frozen assignment.
///
/// `bindings` come from the constraint set and are applied before the
/// search; locked bindings are immovable. The final legality pass runs
/// unconditionally, so an `Ok` result always has zero unroutable arcs.
pub fn place(
    netlist: &PlaceNetlist,
    graph: &DeviceGraph,
    bindings: &[Binding],
    timing: &TimingModel,
    schedule: &AnnealSchedule,
    seed: u64,
    sink: &DiagnosticSink,
) -> Result<Assignment, PlacementFailure> {
    let mut assignment = Assignment::new(netlist.cell_count(), graph.resource_count());
    for binding in bindings {
        assignment.assign(binding.cell, binding.resource);
        if binding.locked {
            assignment.lock(binding.cell);
        }
    }

    initial::initial_placement(netlist, graph, &mut assignment)?;

    let cost = CostModel::new(graph, timing);
    let mut rng = StdRng::seed_from_u64(seed);
    let outcome = anneal::anneal(netlist, graph, &mut assignment, &cost, schedule, &mut rng);

    // Final legality pass over the frozen assignment.
    let unroutable = legality::unroutable_total(graph, netlist, &assignment);
    if unroutable > 0 {
        return Err(PlacementFailure::Unroutable {
            unroutable,
            iterations: outcome.outer_iterations,
            worst_nets: legality::worst_net_names(graph, netlist, &assignment, 5),
            best: assignment,
        });
    }

    sink.notice(format!(
        "placement converged at cost {} after {} temperature step(s), {} move(s)",
        outcome.scalar, outcome.outer_iterations, outcome.moves_evaluated
    ));
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use silk_device::{PartId, ResourceKind};
    use silk_netlist::parse_netlist;

    const AND_NETLIST: &str = r#"{
        "modules": {
            "top": {
                "ports": {
                    "a": { "direction": "input", "bits": [2] },
                    "b": { "direction": "input", "bits": [3] },
                    "y": { "direction": "output", "bits": [4] }
                },
                "cells": {
                    "and1": {
                        "type": "LUT2",
                        "parameters": { "INIT": "1000" },
                        "connections": { "IN0": [2], "IN1": [3], "OUT": [4] }
                    }
                },
                "netnames": {
                    "a": { "bits": [2] },
                    "b": { "bits": [3] },
                    "y": { "bits": [4] }
                }
            }
        }
    }"#;

    fn and_place_netlist() -> PlaceNetlist {
        let parsed = parse_netlist(AND_NETLIST).unwrap();
        convert(parsed.top_module()).unwrap()
    }

    #[test]
    fn and_gate_places_with_zero_unroutable() {
        let graph = DeviceGraph::new(PartId::Mx3620);
        let nl = and_place_netlist();
        let timing = TimingModel::empty();
        let sink = DiagnosticSink::new();

        let asg = place(
            &nl,
            &graph,
            &[],
            &timing,
            &AnnealSchedule::default(),
            1,
            &sink,
        )
        .unwrap();
        assert!(asg.is_complete());
        assert_eq!(unroutable_total(&graph, &nl, &asg), 0);
    }

    #[test]
    fn byte_identical_assignment_for_fixed_seed() {
        let graph = DeviceGraph::new(PartId::Mx3620);
        let timing = TimingModel::empty();

        let run = |seed: u64| {
            let nl = and_place_netlist();
            let sink = DiagnosticSink::new();
            let asg = place(
                &nl,
                &graph,
                &[],
                &timing,
                &AnnealSchedule::default(),
                seed,
                &sink,
            )
            .unwrap();
            (0..nl.cell_count())
                .map(|i| asg.site_of(PlaceCellId::from_raw(i as u32)))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(3), run(3));
    }

    #[test]
    fn constrained_cells_are_never_relocated() {
        let graph = DeviceGraph::new(PartId::Mx3620);
        let nl = and_place_netlist();
        let timing = TimingModel::empty();
        let sink = DiagnosticSink::new();

        let a = nl.cell_by_name["a"];
        let pin5 = graph.iob_for_pin(5).unwrap();
        let bindings = [Binding {
            cell: a,
            resource: pin5,
            locked: true,
        }];

        let asg = place(
            &nl,
            &graph,
            &bindings,
            &timing,
            &AnnealSchedule::default(),
            9,
            &sink,
        )
        .unwrap();
        assert_eq!(asg.site_of(a), Some(pin5));
    }

    #[test]
    fn cross_matrix_pad_constraints_fail_placement() {
        let graph = DeviceGraph::new(PartId::Mx3620);
        let nl = and_place_netlist();
        let timing = TimingModel::empty();
        let sink = DiagnosticSink::new();

        // Inputs pinned to matrix 0, output pinned to matrix 1: the LUT
        // cannot be reachable from both sides, on any instance.
        let bindings = [
            Binding {
                cell: nl.cell_by_name["a"],
                resource: graph.iob_for_pin(2).unwrap(),
                locked: true,
            },
            Binding {
                cell: nl.cell_by_name["b"],
                resource: graph.iob_for_pin(3).unwrap(),
                locked: true,
            },
            Binding {
                cell: nl.cell_by_name["y"],
                resource: graph.iob_for_pin(12).unwrap(),
                locked: true,
            },
        ];

        let err = place(
            &nl,
            &graph,
            &bindings,
            &timing,
            &AnnealSchedule::default(),
            1,
            &sink,
        )
        .unwrap_err();
        match err {
            PlacementFailure::Unroutable {
                unroutable,
                worst_nets,
                best,
                ..
            } => {
                assert!(unroutable > 0);
                assert!(!worst_nets.is_empty());
                // The best-effort assignment still honors the constraints.
                assert_eq!(
                    best.site_of(nl.cell_by_name["y"]),
                    Some(graph.iob_for_pin(12).unwrap())
                );
            }
            other => panic!("expected Unroutable, got {other}"),
        }
    }

    #[test]
    fn timing_model_steers_but_does_not_break_placement() {
        let graph = DeviceGraph::new(PartId::Mx3620);
        let nl = and_place_netlist();
        let timing = silk_timing::TimingModel::from_records(vec![silk_timing::DelayRecord {
            from: ResourceKind::Iob,
            to: ResourceKind::Lut2,
            class: silk_device::CostClass::Direct,
            drive: None,
            rise_ns: 2.0,
            fall_ns: 2.0,
        }]);
        let sink = DiagnosticSink::new();

        let asg = place(
            &nl,
            &graph,
            &[],
            &timing,
            &AnnealSchedule::default(),
            11,
            &sink,
        )
        .unwrap();
        assert_eq!(unroutable_total(&graph, &nl, &asg), 0);
    }
}
