//! The connectivity-legality oracle.
//!
//! For every net, each sink endpoint's instance must be reachable from the
//! driver endpoint's instance in the device graph. Nets are stars rooted at
//! the driver, so legality is per-arc reachability, not pairwise; and since
//! the fabric's switch points are dedicated per source/destination pair,
//! this is a pure query with no contention between nets.

use crate::assignment::Assignment;
use crate::data::PlaceNetlist;
use crate::ids::PlaceNetId;
use silk_device::{DeviceGraph, ResourceId};

/// Legality verdict for one net under the current assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetLegality {
    /// Number of driver→sink arcs with no fabric path. An unplaced endpoint
    /// counts as unroutable.
    pub unroutable: u32,
    /// One blocking endpoint pair, when any arc is unroutable. Used to bias
    /// move selection toward the worst offender.
    pub blocking: Option<(ResourceId, ResourceId)>,
}

impl NetLegality {
    /// Whether every arc of the net is realizable.
    pub fn is_legal(&self) -> bool {
        self.unroutable == 0
    }
}

/// Checks one net against the device graph.
pub fn check_net(
    graph: &DeviceGraph,
    netlist: &PlaceNetlist,
    assignment: &Assignment,
    net: PlaceNetId,
) -> NetLegality {
    let net = netlist.net(net);
    let mut unroutable = 0;
    let mut blocking = None;

    let driver_site = assignment.site_of(net.driver.cell);
    for sink in &net.sinks {
        let sink_site = assignment.site_of(sink.cell);
        match (driver_site, sink_site) {
            (Some(src), Some(dst)) => {
                if !graph.is_reachable(src, dst) {
                    unroutable += 1;
                    if blocking.is_none() {
                        blocking = Some((src, dst));
                    }
                }
            }
            _ => unroutable += 1,
        }
    }

    NetLegality {
        unroutable,
        blocking,
    }
}

/// Total unroutable arc count over all nets.
pub fn unroutable_total(
    graph: &DeviceGraph,
    netlist: &PlaceNetlist,
    assignment: &Assignment,
) -> u32 {
    netlist
        .nets
        .iter()
        .map(|n| check_net(graph, netlist, assignment, n.id).unroutable)
        .sum()
}

/// The names of the worst-offending illegal nets, most arcs blocked first,
/// capped at `limit`.
pub fn worst_net_names(
    graph: &DeviceGraph,
    netlist: &PlaceNetlist,
    assignment: &Assignment,
    limit: usize,
) -> Vec<String> {
    let mut offenders: Vec<(u32, &str)> = netlist
        .nets
        .iter()
        .filter_map(|n| {
            let legality = check_net(graph, netlist, assignment, n.id);
            (!legality.is_legal()).then_some((legality.unroutable, n.name.as_str()))
        })
        .collect();
    offenders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(b.1)));
    offenders
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.to_string())
        .collect()
}
