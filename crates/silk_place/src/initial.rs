//! Greedy first-fit seeding of the assignment.
//!
//! Constrained cells are already placed when this runs. Every remaining cell
//! is dropped into the first free capacity-compatible instance, tightest
//! kind first, in declaration order. The result may be illegal; the
//! annealing refinement improves it.

use crate::assignment::Assignment;
use crate::data::PlaceNetlist;
use crate::error::PlacementFailure;
use silk_device::DeviceGraph;

/// Seeds every unplaced cell into a free compatible instance.
pub(crate) fn initial_placement(
    netlist: &PlaceNetlist,
    graph: &DeviceGraph,
    assignment: &mut Assignment,
) -> Result<(), PlacementFailure> {
    for cell in &netlist.cells {
        if assignment.site_of(cell.id).is_some() {
            continue;
        }
        let site = cell
            .kind
            .candidate_kinds()
            .into_iter()
            .flat_map(|kind| graph.resources_of_kind(kind))
            .copied()
            .find(|&site| assignment.cell_at(site).is_none());
        match site {
            Some(site) => assignment.assign(cell.id, site),
            None => {
                return Err(PlacementFailure::InsufficientResources {
                    kind: cell.kind.candidate_kinds()[0].to_string(),
                    cell: cell.name.clone(),
                })
            }
        }
    }
    Ok(())
}
