//! The device resource graph and its precomputed reachability relation.
//!
//! Built once per run from a [`PartId`]'s static tables. Resource instances
//! live in an arena addressed by [`ResourceId`]; the crossbar reachability
//! relation is precomputed into two bitset planes (one per [`CostClass`])
//! since it never changes within a run. Reachability queries during the
//! placement search are two bit tests.

use crate::ids::ResourceId;
use crate::kinds::{CostClass, ResourceKind};
use crate::part::PartId;
use silk_common::Arena;
use std::collections::BTreeMap;

/// One physical resource instance on the target part.
#[derive(Debug, Clone)]
pub struct ResourceInstance {
    /// Stable ID of this instance within the device graph.
    pub id: ResourceId,
    /// What this instance is.
    pub kind: ResourceKind,
    /// Per-kind physical index (e.g. the `3` in `DFF3`), counted across
    /// matrices in enumeration order.
    pub index: u8,
    /// The crossbar matrix this instance belongs to.
    pub matrix: u8,
    /// LUT input arity; 0 for non-LUT kinds.
    pub arity: u8,
    /// Package pin number for IOBs; `None` otherwise.
    pub pin: Option<u8>,
}

impl ResourceInstance {
    /// The canonical location name, as written in constraint files
    /// (e.g. `LUT4_1`, `DFF3`, `IOB7`).
    pub fn location_name(&self) -> String {
        format!("{}{}", self.kind.location_prefix(), self.index)
    }
}

/// A square bit matrix with one bit per ordered resource pair.
#[derive(Debug, Clone)]
struct BitMatrix {
    n: usize,
    stride: usize,
    words: Vec<u64>,
}

impl BitMatrix {
    fn new(n: usize) -> Self {
        let stride = n.div_ceil(64);
        Self {
            n,
            stride,
            words: vec![0; n * stride],
        }
    }

    fn set(&mut self, row: usize, col: usize) {
        debug_assert!(row < self.n && col < self.n);
        self.words[row * self.stride + col / 64] |= 1 << (col % 64);
    }

    fn get(&self, row: usize, col: usize) -> bool {
        self.words[row * self.stride + col / 64] & (1 << (col % 64)) != 0
    }
}

/// Static model of one target part: resource instances plus the crossbar
/// reachability relation between them.
#[derive(Debug, Clone)]
pub struct DeviceGraph {
    part: PartId,
    resources: Arena<ResourceId, ResourceInstance>,
    by_kind: BTreeMap<ResourceKind, Vec<ResourceId>>,
    pin_to_iob: BTreeMap<u8, ResourceId>,
    direct: BitMatrix,
    buffered: BitMatrix,
}

impl DeviceGraph {
    /// Builds the resource graph for the given part.
    ///
    /// Instances are enumerated per matrix in kind order (LUT2, LUT3, LUT4,
    /// DFF, COUNT, INV), followed by all IOBs in package pin order and all
    /// analog comparators. The order is fixed, so [`ResourceId`]s are
    /// reproducible across runs.
    pub fn new(part: PartId) -> Self {
        let spec = part.spec();
        let mut resources: Arena<ResourceId, ResourceInstance> = Arena::new();
        let mut by_kind: BTreeMap<ResourceKind, Vec<ResourceId>> = BTreeMap::new();
        let mut pin_to_iob = BTreeMap::new();

        let fabric_kinds = [
            ResourceKind::Lut2,
            ResourceKind::Lut3,
            ResourceKind::Lut4,
            ResourceKind::Dff,
            ResourceKind::Counter,
            ResourceKind::Inverter,
        ];
        let mut next_index: BTreeMap<ResourceKind, u8> = BTreeMap::new();

        let alloc = |resources: &mut Arena<ResourceId, ResourceInstance>,
                         by_kind: &mut BTreeMap<ResourceKind, Vec<ResourceId>>,
                         next_index: &mut BTreeMap<ResourceKind, u8>,
                         kind: ResourceKind,
                         matrix: u8,
                         pin: Option<u8>| {
            let index = *next_index.entry(kind).or_insert(0);
            next_index.insert(kind, index + 1);
            let id = ResourceId::from_raw(resources.len() as u32);
            resources.alloc(ResourceInstance {
                id,
                kind,
                index,
                matrix,
                arity: kind.lut_arity(),
                pin,
            });
            by_kind.entry(kind).or_default().push(id);
            id
        };

        for matrix in 0..spec.matrices {
            for (slot, &kind) in fabric_kinds.iter().enumerate() {
                for _ in 0..spec.fabric_per_matrix[slot] {
                    alloc(
                        &mut resources,
                        &mut by_kind,
                        &mut next_index,
                        kind,
                        matrix,
                        None,
                    );
                }
            }
        }

        for &(pin, matrix) in spec.iob_pins {
            let id = alloc(
                &mut resources,
                &mut by_kind,
                &mut next_index,
                ResourceKind::Iob,
                matrix,
                Some(pin),
            );
            pin_to_iob.insert(pin, id);
        }

        for matrix in 0..spec.matrices {
            for _ in 0..spec.acmp_per_matrix[matrix as usize] {
                alloc(
                    &mut resources,
                    &mut by_kind,
                    &mut next_index,
                    ResourceKind::AnalogCmp,
                    matrix,
                    None,
                );
            }
        }

        let n = resources.len();
        let mut direct = BitMatrix::new(n);
        let mut buffered = BitMatrix::new(n);
        for (src_id, src) in resources.iter() {
            for (dst_id, dst) in resources.iter() {
                match Self::class_for(src, dst) {
                    Some(CostClass::Direct) => direct.set(src_id.index(), dst_id.index()),
                    Some(CostClass::Buffered) => buffered.set(src_id.index(), dst_id.index()),
                    None => {}
                }
            }
        }

        Self {
            part,
            resources,
            by_kind,
            pin_to_iob,
            direct,
            buffered,
        }
    }

    /// Computes the fabric connection class for one ordered instance pair.
    ///
    /// The rules are fixed per family:
    /// - an analog comparator's input taps only same-matrix IOBs, and its
    ///   output drives only same-matrix LUTs and DFFs;
    /// - IOB pad drivers and output buffers tap only their own matrix's
    ///   crossbar, so any connection touching an IOB is matrix-local;
    /// - all other digital pairs connect directly within a matrix and
    ///   through a cross-matrix buffer otherwise.
    fn class_for(src: &ResourceInstance, dst: &ResourceInstance) -> Option<CostClass> {
        use ResourceKind::*;
        if src.id == dst.id {
            return None;
        }
        if dst.kind == AnalogCmp {
            return (src.kind == Iob && src.matrix == dst.matrix).then_some(CostClass::Direct);
        }
        if src.kind == AnalogCmp {
            let digital_sink = matches!(dst.kind, Lut2 | Lut3 | Lut4 | Dff);
            return (digital_sink && src.matrix == dst.matrix).then_some(CostClass::Direct);
        }
        if src.kind == Iob || dst.kind == Iob {
            return (src.matrix == dst.matrix).then_some(CostClass::Direct);
        }
        if src.matrix == dst.matrix {
            Some(CostClass::Direct)
        } else {
            Some(CostClass::Buffered)
        }
    }

    /// The part this graph models.
    pub fn part(&self) -> PartId {
        self.part
    }

    /// Number of resource instances on the part.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns the instance with the given ID.
    pub fn resource(&self, id: ResourceId) -> &ResourceInstance {
        self.resources.get(id)
    }

    /// Iterates over all instances in enumeration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceInstance> {
        self.resources.values()
    }

    /// All instance IDs of the given kind, in enumeration order.
    pub fn resources_of_kind(&self, kind: ResourceKind) -> &[ResourceId] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Looks up an instance by kind and per-kind physical index.
    pub fn find_instance(&self, kind: ResourceKind, index: u8) -> Option<ResourceId> {
        self.resources_of_kind(kind).get(index as usize).copied()
    }

    /// Looks up the IOB bonded to the given package pin.
    pub fn iob_for_pin(&self, pin: u8) -> Option<ResourceId> {
        self.pin_to_iob.get(&pin).copied()
    }

    /// Decides whether a wire can connect `src`'s output to `dst`'s input,
    /// and reports the cost class of the connection if so.
    pub fn reachability(&self, src: ResourceId, dst: ResourceId) -> Option<CostClass> {
        if self.direct.get(src.index(), dst.index()) {
            Some(CostClass::Direct)
        } else if self.buffered.get(src.index(), dst.index()) {
            Some(CostClass::Buffered)
        } else {
            None
        }
    }

    /// Returns whether `dst` is reachable from `src` at any cost.
    pub fn is_reachable(&self, src: ResourceId, dst: ResourceId) -> bool {
        self.reachability(src, dst).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> DeviceGraph {
        DeviceGraph::new(PartId::Mx3620)
    }

    #[test]
    fn resource_counts_match_spec() {
        let g = graph();
        let spec = PartId::Mx3620.spec();
        assert_eq!(g.resource_count(), spec.total_resources());
        for kind in ResourceKind::ALL {
            assert_eq!(g.resources_of_kind(kind).len(), spec.count_of(kind), "{kind}");
        }
    }

    #[test]
    fn enumeration_is_reproducible() {
        let a = DeviceGraph::new(PartId::Mx3140);
        let b = DeviceGraph::new(PartId::Mx3140);
        for (ra, rb) in a.resources().zip(b.resources()) {
            assert_eq!(ra.id, rb.id);
            assert_eq!(ra.kind, rb.kind);
            assert_eq!(ra.index, rb.index);
            assert_eq!(ra.matrix, rb.matrix);
        }
    }

    #[test]
    fn per_kind_indices_are_dense() {
        let g = graph();
        for kind in ResourceKind::ALL {
            for (i, &id) in g.resources_of_kind(kind).iter().enumerate() {
                assert_eq!(g.resource(id).index as usize, i);
            }
        }
    }

    #[test]
    fn find_instance_and_location_name() {
        let g = graph();
        let id = g.find_instance(ResourceKind::Lut4, 1).unwrap();
        assert_eq!(g.resource(id).location_name(), "LUT4_1");
        assert!(g.find_instance(ResourceKind::Lut4, 99).is_none());
    }

    #[test]
    fn iob_pin_lookup() {
        let g = graph();
        let id = g.iob_for_pin(12).unwrap();
        let inst = g.resource(id);
        assert_eq!(inst.kind, ResourceKind::Iob);
        assert_eq!(inst.pin, Some(12));
        assert_eq!(inst.matrix, 1);
        assert!(g.iob_for_pin(1).is_none());
        assert!(g.iob_for_pin(11).is_none());
    }

    #[test]
    fn same_matrix_fabric_is_direct() {
        let g = graph();
        let lut = g.find_instance(ResourceKind::Lut2, 0).unwrap();
        let dff = g.find_instance(ResourceKind::Dff, 0).unwrap();
        assert_eq!(g.reachability(lut, dff), Some(CostClass::Direct));
        assert_eq!(g.reachability(dff, lut), Some(CostClass::Direct));
    }

    #[test]
    fn cross_matrix_fabric_is_buffered() {
        let g = graph();
        // LUT2 index 0 is on matrix 0, index 4 is on matrix 1.
        let a = g.find_instance(ResourceKind::Lut2, 0).unwrap();
        let b = g.find_instance(ResourceKind::Lut2, 4).unwrap();
        assert_eq!(g.resource(a).matrix, 0);
        assert_eq!(g.resource(b).matrix, 1);
        assert_eq!(g.reachability(a, b), Some(CostClass::Buffered));
    }

    #[test]
    fn iob_connections_are_matrix_local() {
        let g = graph();
        let iob_m0 = g.iob_for_pin(2).unwrap();
        let lut_m0 = g.find_instance(ResourceKind::Lut2, 0).unwrap();
        let lut_m1 = g.find_instance(ResourceKind::Lut2, 4).unwrap();
        assert_eq!(g.reachability(iob_m0, lut_m0), Some(CostClass::Direct));
        assert_eq!(g.reachability(iob_m0, lut_m1), None);
        assert_eq!(g.reachability(lut_m1, iob_m0), None);
    }

    #[test]
    fn no_self_reachability() {
        let g = graph();
        let lut = g.find_instance(ResourceKind::Lut2, 0).unwrap();
        assert_eq!(g.reachability(lut, lut), None);
    }

    #[test]
    fn analog_comparator_routing_is_dedicated() {
        let g = graph();
        // Both comparators on the MX3620 sit on matrix 1.
        let cmp = g.find_instance(ResourceKind::AnalogCmp, 0).unwrap();
        assert_eq!(g.resource(cmp).matrix, 1);

        let iob_m1 = g.iob_for_pin(12).unwrap();
        let iob_m0 = g.iob_for_pin(2).unwrap();
        let lut_m1 = g.find_instance(ResourceKind::Lut2, 4).unwrap();
        let counter_m1 = g.find_instance(ResourceKind::Counter, 3).unwrap();

        // Input only from same-matrix IOBs.
        assert_eq!(g.reachability(iob_m1, cmp), Some(CostClass::Direct));
        assert_eq!(g.reachability(iob_m0, cmp), None);
        assert_eq!(g.reachability(lut_m1, cmp), None);

        // Output only to same-matrix LUTs and DFFs.
        assert_eq!(g.reachability(cmp, lut_m1), Some(CostClass::Direct));
        assert_eq!(g.reachability(cmp, counter_m1), None);
        assert_eq!(g.reachability(cmp, iob_m1), None);
    }

    #[test]
    fn single_matrix_part_has_no_buffered_pairs() {
        let g = DeviceGraph::new(PartId::Mx3140);
        for a in g.resources() {
            for b in g.resources() {
                assert_ne!(g.reachability(a.id, b.id), Some(CostClass::Buffered));
            }
        }
    }
}
