//! Simulated annealing refinement of the assignment.
//!
//! Starting from the seeded placement, repeatedly proposes cell swaps or
//! relocations and accepts/rejects each move using the Metropolis criterion.
//! The temperature decays geometrically. Only the nets incident to the moved
//! cells are re-scored per move; the full design is never re-evaluated.
//!
//! All randomness comes from the injected, explicitly seeded generator, and
//! moves are committed strictly in draw order, so a fixed seed reproduces
//! the search bit for bit.

use crate::assignment::Assignment;
use crate::cost::{CostModel, NetScore};
use crate::data::PlaceNetlist;
use crate::ids::{PlaceCellId, PlaceNetId};
use rand::rngs::StdRng;
use rand::Rng;
use silk_device::{DeviceGraph, ResourceId};

/// Tunable annealing policy.
///
/// The defaults are the shipped policy; the zero-unroutable-arcs termination
/// contract holds for any setting.
#[derive(Debug, Clone)]
pub struct AnnealSchedule {
    /// Geometric cooling rate applied each outer iteration.
    pub cooling_rate: f64,
    /// Temperature floor that ends the search.
    pub min_temperature: f64,
    /// Moves per temperature step, as a multiplier of movable cell count.
    pub moves_per_cell: usize,
    /// Consecutive no-improvement temperature steps required before a fully
    /// routable placement is accepted as converged.
    pub stall_limit: u32,
    /// Hard budget on temperature steps.
    pub max_outer_iterations: u32,
}

impl Default for AnnealSchedule {
    fn default() -> Self {
        Self {
            cooling_rate: 0.95,
            min_temperature: 0.01,
            moves_per_cell: 10,
            stall_limit: 3,
            max_outer_iterations: 200,
        }
    }
}

/// Statistics from one annealing run.
#[derive(Debug, Clone, Copy)]
pub struct AnnealOutcome {
    /// Scalar cost of the final (best-found) assignment.
    pub scalar: u64,
    /// Unroutable arc count of the final assignment.
    pub unroutable: u32,
    /// Temperature steps taken.
    pub outer_iterations: u32,
    /// Moves evaluated in total.
    pub moves_evaluated: u64,
}

/// One proposed move, with enough information to undo it.
#[derive(Debug, Clone, Copy)]
enum Move {
    Swap(PlaceCellId, PlaceCellId),
    Relocate {
        cell: PlaceCellId,
        from: ResourceId,
        to: ResourceId,
    },
}

/// Refines the assignment in place and leaves it at the best state found.
pub(crate) fn anneal(
    netlist: &PlaceNetlist,
    graph: &DeviceGraph,
    assignment: &mut Assignment,
    cost: &CostModel<'_>,
    schedule: &AnnealSchedule,
    rng: &mut StdRng,
) -> AnnealOutcome {
    let movable: Vec<PlaceCellId> = netlist
        .cells
        .iter()
        .map(|c| c.id)
        .filter(|&id| !assignment.is_locked(id))
        .collect();

    let (mut scores, mut scalar, mut unroutable) = cost.score_all(netlist, assignment);
    let mut best: (Assignment, u64, u32) = (assignment.clone(), scalar, unroutable);
    let mut moves_evaluated = 0u64;
    let mut outer = 0u32;

    if movable.is_empty() {
        return AnnealOutcome {
            scalar,
            unroutable,
            outer_iterations: 0,
            moves_evaluated: 0,
        };
    }

    let mut temperature = (netlist.cell_count() as f64).sqrt() * 2.0;
    let moves_per_temp = (schedule.moves_per_cell * movable.len()).max(10);
    let mut stall = 0u32;

    while temperature > schedule.min_temperature && outer < schedule.max_outer_iterations {
        let best_before = best.1;
        let mut accepted = 0usize;

        for _ in 0..moves_per_temp {
            let Some(mv) = propose_move(rng, netlist, graph, assignment, &movable) else {
                continue;
            };
            moves_evaluated += 1;

            let affected = affected_nets(netlist, &mv);
            let old: u64 = affected.iter().map(|n| scores[n.index()].scalar()).sum();
            apply_move(assignment, &mv);
            let rescored: Vec<(PlaceNetId, NetScore)> = affected
                .iter()
                .map(|&n| (n, cost.score_net(netlist, assignment, n)))
                .collect();
            let new: u64 = rescored.iter().map(|(_, s)| s.scalar()).sum();
            let delta = new as i64 - old as i64;

            // Metropolis criterion.
            if delta < 0 || rng.gen::<f64>() < (-(delta as f64) / temperature).exp() {
                for (net, score) in rescored {
                    unroutable = unroutable - scores[net.index()].unroutable + score.unroutable;
                    scores[net.index()] = score;
                }
                scalar = (scalar as i64 + delta) as u64;
                accepted += 1;
                if scalar < best.1 {
                    best = (assignment.clone(), scalar, unroutable);
                }
            } else {
                undo_move(assignment, &mv);
            }
        }

        temperature *= schedule.cooling_rate;
        outer += 1;

        if best.1 < best_before {
            stall = 0;
        } else {
            stall += 1;
        }
        // Converged: fully routable and no longer improving.
        if best.2 == 0 && stall >= schedule.stall_limit {
            break;
        }
        // Frozen out: nothing is being accepted any more.
        let acceptance = accepted as f64 / moves_per_temp as f64;
        if acceptance < 0.001 {
            break;
        }
    }

    if best.1 < scalar {
        *assignment = best.0;
        scalar = best.1;
        unroutable = best.2;
    }

    AnnealOutcome {
        scalar,
        unroutable,
        outer_iterations: outer,
        moves_evaluated,
    }
}

/// Proposes one random swap or relocation, trying a bounded number of times
/// to find a capacity-compatible candidate.
fn propose_move(
    rng: &mut StdRng,
    netlist: &PlaceNetlist,
    graph: &DeviceGraph,
    assignment: &Assignment,
    movable: &[PlaceCellId],
) -> Option<Move> {
    for _ in 0..50 {
        let a = movable[rng.gen_range(0..movable.len())];
        let Some(site_a) = assignment.site_of(a) else {
            continue;
        };

        if movable.len() >= 2 && rng.gen_bool(0.5) {
            let b = movable[rng.gen_range(0..movable.len())];
            if a == b {
                continue;
            }
            let Some(site_b) = assignment.site_of(b) else {
                continue;
            };
            let kind_a = &netlist.cell(a).kind;
            let kind_b = &netlist.cell(b).kind;
            if kind_a.placeable_on(graph.resource(site_b).kind)
                && kind_b.placeable_on(graph.resource(site_a).kind)
            {
                return Some(Move::Swap(a, b));
            }
        } else {
            let kinds = netlist.cell(a).kind.candidate_kinds();
            let kind = kinds[rng.gen_range(0..kinds.len())];
            let sites = graph.resources_of_kind(kind);
            if sites.is_empty() {
                continue;
            }
            let to = sites[rng.gen_range(0..sites.len())];
            if to == site_a || assignment.cell_at(to).is_some() {
                continue;
            }
            return Some(Move::Relocate {
                cell: a,
                from: site_a,
                to,
            });
        }
    }
    None
}

/// The nets whose score can change under a move.
fn affected_nets(netlist: &PlaceNetlist, mv: &Move) -> Vec<PlaceNetId> {
    let mut nets: Vec<PlaceNetId> = match mv {
        Move::Swap(a, b) => {
            let mut v = netlist.nets_of(*a).to_vec();
            v.extend_from_slice(netlist.nets_of(*b));
            v
        }
        Move::Relocate { cell, .. } => netlist.nets_of(*cell).to_vec(),
    };
    nets.sort_unstable();
    nets.dedup();
    nets
}

fn apply_move(assignment: &mut Assignment, mv: &Move) {
    match mv {
        Move::Swap(a, b) => assignment.swap(*a, *b),
        Move::Relocate { cell, to, .. } => assignment.relocate(*cell, *to),
    }
}

fn undo_move(assignment: &mut Assignment, mv: &Move) {
    match mv {
        Move::Swap(a, b) => assignment.swap(*a, *b),
        Move::Relocate { cell, from, .. } => assignment.relocate(*cell, *from),
    }
}
