//! The placement cost function.
//!
//! Cost is a weighted sum dominated by unroutability: each unroutable arc
//! costs [`UNROUTABLE_WEIGHT`], and the timing term (worst arc delay per
//! net, in tenths of a nanosecond) only breaks ties between equally
//! routable placements. With no timing model loaded the timing term is
//! zero everywhere.
//!
//! Scoring is per-net so the annealer can re-score only the nets incident
//! to a moved cell instead of re-evaluating the whole design.

use crate::assignment::Assignment;
use crate::data::{PlaceCellKind, PlaceNetlist};
use crate::ids::PlaceNetId;
use crate::legality;
use silk_device::DeviceGraph;
use silk_timing::TimingModel;

/// Cost of one unroutable arc. Large enough that no achievable timing term
/// can outweigh a single blocked connection.
pub const UNROUTABLE_WEIGHT: u64 = 10_000;

/// The per-net score: unroutable arc count plus the timing term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetScore {
    /// Number of unroutable driver→sink arcs.
    pub unroutable: u32,
    /// Worst arc delay on this net, in tenths of a nanosecond.
    pub timing_tenths: u64,
}

impl NetScore {
    /// Collapses the score into the scalar the annealer minimizes.
    pub fn scalar(&self) -> u64 {
        self.unroutable as u64 * UNROUTABLE_WEIGHT + self.timing_tenths
    }
}

/// Evaluates net scores against a device graph and optional timing model.
pub struct CostModel<'a> {
    graph: &'a DeviceGraph,
    timing: &'a TimingModel,
}

impl<'a> CostModel<'a> {
    /// Creates a cost model over the given device graph and timing model.
    pub fn new(graph: &'a DeviceGraph, timing: &'a TimingModel) -> Self {
        Self { graph, timing }
    }

    /// Scores one net under the current assignment.
    pub fn score_net(
        &self,
        netlist: &PlaceNetlist,
        assignment: &Assignment,
        net_id: PlaceNetId,
    ) -> NetScore {
        let legality = legality::check_net(self.graph, netlist, assignment, net_id);
        let net = netlist.net(net_id);

        let mut timing_tenths = 0u64;
        if !self.timing.is_empty() {
            if let Some(src) = assignment.site_of(net.driver.cell) {
                let src_kind = self.graph.resource(src).kind;
                for sink in &net.sinks {
                    let Some(dst) = assignment.site_of(sink.cell) else {
                        continue;
                    };
                    let Some(class) = self.graph.reachability(src, dst) else {
                        continue;
                    };
                    let drive = match &netlist.cell(sink.cell).kind {
                        PlaceCellKind::Iob { drive, .. } => Some(*drive),
                        _ => None,
                    };
                    let dst_kind = self.graph.resource(dst).kind;
                    let arc = self.timing.arc_cost_tenths(src_kind, dst_kind, class, drive);
                    timing_tenths = timing_tenths.max(arc);
                }
            }
        }

        NetScore {
            unroutable: legality.unroutable,
            timing_tenths,
        }
    }

    /// Scores every net, returning the per-net scores and their totals.
    pub fn score_all(
        &self,
        netlist: &PlaceNetlist,
        assignment: &Assignment,
    ) -> (Vec<NetScore>, u64, u32) {
        let scores: Vec<NetScore> = netlist
            .nets
            .iter()
            .map(|n| self.score_net(netlist, assignment, n.id))
            .collect();
        let scalar = scores.iter().map(NetScore::scalar).sum();
        let unroutable = scores.iter().map(|s| s.unroutable).sum();
        (scores, scalar, unroutable)
    }
}
