//! The exclusive cell-to-resource mapping under search.
//!
//! Both directions of the mapping are kept so the injectivity invariant (no
//! two cells on one instance) is enforced structurally: every mutation goes
//! through [`assign`](Assignment::assign), [`unassign`](Assignment::unassign),
//! or [`swap`](Assignment::swap).

use crate::ids::PlaceCellId;
use serde::{Deserialize, Serialize};
use silk_device::ResourceId;

/// A constraint-derived placement of one cell, applied before the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// The bound cell.
    pub cell: PlaceCellId,
    /// The resource instance it is bound to.
    pub resource: ResourceId,
    /// Locked bindings are never moved by the search; unlocked ones are
    /// starting hints.
    pub locked: bool,
}

/// The exclusive mapping from placement cells to device resource instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    cell_sites: Vec<Option<ResourceId>>,
    site_cells: Vec<Option<PlaceCellId>>,
    locked: Vec<bool>,
}

impl Assignment {
    /// Creates an empty assignment for `cell_count` cells over
    /// `resource_count` instances.
    pub fn new(cell_count: usize, resource_count: usize) -> Self {
        Self {
            cell_sites: vec![None; cell_count],
            site_cells: vec![None; resource_count],
            locked: vec![false; cell_count],
        }
    }

    /// Places an unplaced cell onto a free instance.
    ///
    /// # Panics
    ///
    /// Panics if the cell is already placed or the instance is occupied;
    /// both indicate a bug in the caller.
    pub fn assign(&mut self, cell: PlaceCellId, site: ResourceId) {
        assert!(
            self.cell_sites[cell.index()].is_none(),
            "cell {cell} is already placed"
        );
        assert!(
            self.site_cells[site.index()].is_none(),
            "instance {site} is already occupied"
        );
        self.cell_sites[cell.index()] = Some(site);
        self.site_cells[site.index()] = Some(cell);
    }

    /// Removes a cell from its instance.
    pub fn unassign(&mut self, cell: PlaceCellId) {
        if let Some(site) = self.cell_sites[cell.index()].take() {
            self.site_cells[site.index()] = None;
        }
    }

    /// Moves a placed cell to a free instance.
    pub fn relocate(&mut self, cell: PlaceCellId, site: ResourceId) {
        self.unassign(cell);
        self.assign(cell, site);
    }

    /// Exchanges the instances of two placed cells.
    pub fn swap(&mut self, a: PlaceCellId, b: PlaceCellId) {
        let site_a = self.cell_sites[a.index()];
        let site_b = self.cell_sites[b.index()];
        self.unassign(a);
        self.unassign(b);
        if let Some(site) = site_b {
            self.assign(a, site);
        }
        if let Some(site) = site_a {
            self.assign(b, site);
        }
    }

    /// Marks a cell's placement as immovable.
    pub fn lock(&mut self, cell: PlaceCellId) {
        self.locked[cell.index()] = true;
    }

    /// Whether a cell's placement is immovable.
    pub fn is_locked(&self, cell: PlaceCellId) -> bool {
        self.locked[cell.index()]
    }

    /// The instance a cell is placed on, if any.
    pub fn site_of(&self, cell: PlaceCellId) -> Option<ResourceId> {
        self.cell_sites[cell.index()]
    }

    /// The cell occupying an instance, if any.
    pub fn cell_at(&self, site: ResourceId) -> Option<PlaceCellId> {
        self.site_cells[site.index()]
    }

    /// Whether every cell is placed.
    pub fn is_complete(&self) -> bool {
        self.cell_sites.iter().all(Option::is_some)
    }

    /// Number of placed cells.
    pub fn placed_count(&self) -> usize {
        self.cell_sites.iter().filter(|s| s.is_some()).count()
    }

    /// Number of cells tracked by this assignment.
    pub fn cell_count(&self) -> usize {
        self.cell_sites.len()
    }

    /// Iterates over `(cell, instance)` pairs for all placed cells.
    pub fn iter_placed(&self) -> impl Iterator<Item = (PlaceCellId, ResourceId)> + '_ {
        self.cell_sites
            .iter()
            .enumerate()
            .filter_map(|(i, site)| site.map(|s| (PlaceCellId::from_raw(i as u32), s)))
    }
}
