//! Human-readable post-fit reports.
//!
//! Rendering is plain text; presentation (colors, verbosity) is the
//! caller's concern.

use silk_device::{DeviceGraph, ResourceKind};
use silk_place::{Assignment, PlaceCellKind, PlaceNetlist};
use silk_timing::TimingModel;
use std::fmt::Write as _;

/// Renders a per-kind resource utilization table.
pub fn utilization_report(graph: &DeviceGraph, assignment: &Assignment) -> String {
    let mut out = String::from("Device utilization:\n");
    for kind in ResourceKind::ALL {
        let total = graph.resources_of_kind(kind).len();
        if total == 0 {
            continue;
        }
        let used = graph
            .resources_of_kind(kind)
            .iter()
            .filter(|&&id| assignment.cell_at(id).is_some())
            .count();
        let _ = writeln!(out, "  {kind:<6} {used:>3} / {total:<3}");
    }
    out
}

/// Renders the final cell-to-instance map, one line per cell.
pub fn placement_report(
    graph: &DeviceGraph,
    netlist: &PlaceNetlist,
    assignment: &Assignment,
) -> String {
    let mut out = String::from("Placement:\n");
    for cell in &netlist.cells {
        let location = match assignment.site_of(cell.id) {
            Some(site) => {
                let instance = graph.resource(site);
                match instance.pin {
                    Some(pin) => format!("{} (pin {pin})", instance.location_name()),
                    None => instance.location_name(),
                }
            }
            None => "<unplaced>".to_string(),
        };
        let _ = writeln!(out, "  {:<24} -> {location}", cell.name);
    }
    out
}

/// Renders the slowest fabric arcs under the loaded timing model.
///
/// With no timing data this says so instead of guessing.
pub fn timing_report(
    graph: &DeviceGraph,
    netlist: &PlaceNetlist,
    assignment: &Assignment,
    timing: &TimingModel,
) -> String {
    if timing.is_empty() {
        return "Timing: no characterization data loaded\n".to_string();
    }

    let mut arcs: Vec<(u64, String)> = Vec::new();
    for net in &netlist.nets {
        let Some(src) = assignment.site_of(net.driver.cell) else {
            continue;
        };
        for sink in &net.sinks {
            let Some(dst) = assignment.site_of(sink.cell) else {
                continue;
            };
            let Some(class) = graph.reachability(src, dst) else {
                continue;
            };
            let drive = match &netlist.cell(sink.cell).kind {
                PlaceCellKind::Iob { drive, .. } => Some(*drive),
                _ => None,
            };
            let tenths = timing.arc_cost_tenths(
                graph.resource(src).kind,
                graph.resource(dst).kind,
                class,
                drive,
            );
            if tenths > 0 {
                arcs.push((
                    tenths,
                    format!(
                        "{} -> {} ({})",
                        graph.resource(src).location_name(),
                        graph.resource(dst).location_name(),
                        net.name
                    ),
                ));
            }
        }
    }
    arcs.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut out = String::from("Slowest arcs:\n");
    if arcs.is_empty() {
        out.push_str("  (no characterized arcs in this design)\n");
    }
    for (tenths, desc) in arcs.into_iter().take(5) {
        let _ = writeln!(out, "  {:>6.1} ns  {desc}", tenths as f64 / 10.0);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use silk_device::PartId;

    #[test]
    fn utilization_counts_used_instances() {
        let graph = DeviceGraph::new(PartId::Mx3140);
        let mut netlist = PlaceNetlist::new();
        let c = netlist.add_cell("ff", PlaceCellKind::Dff { init: false });
        netlist.rebuild_indices();
        let mut assignment = Assignment::new(1, graph.resource_count());
        assignment.assign(c, graph.resources_of_kind(ResourceKind::Dff)[0]);

        let report = utilization_report(&graph, &assignment);
        assert!(report.contains("DFF"));
        assert!(report.contains("1 / 6"));
    }

    #[test]
    fn placement_report_names_pins() {
        let graph = DeviceGraph::new(PartId::Mx3140);
        let mut netlist = PlaceNetlist::new();
        let c = netlist.add_cell(
            "clk",
            PlaceCellKind::Iob {
                direction: silk_device::IobDirection::Input,
                pull: Default::default(),
                pull_strength: Default::default(),
                drive: Default::default(),
                schmitt: false,
            },
        );
        netlist.rebuild_indices();
        let mut assignment = Assignment::new(1, graph.resource_count());
        assignment.assign(c, graph.iob_for_pin(2).unwrap());

        let report = placement_report(&graph, &netlist, &assignment);
        assert!(report.contains("clk"));
        assert!(report.contains("pin 2"));
    }

    #[test]
    fn timing_report_without_data() {
        let graph = DeviceGraph::new(PartId::Mx3140);
        let netlist = PlaceNetlist::new();
        let assignment = Assignment::new(0, graph.resource_count());
        let report = timing_report(&graph, &netlist, &assignment, &TimingModel::empty());
        assert!(report.contains("no characterization data"));
    }
}
