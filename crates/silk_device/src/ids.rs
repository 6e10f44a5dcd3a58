//! Opaque ID newtypes for device entities.

use silk_common::define_id;

define_id!(
    /// Opaque, copyable ID for one physical resource instance on the target
    /// part. IDs are assigned in a fixed enumeration order when the
    /// [`DeviceGraph`](crate::DeviceGraph) is built and are stable for the
    /// whole run.
    ResourceId
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn roundtrip() {
        let id = ResourceId::from_raw(17);
        assert_eq!(id.as_raw(), 17);
        assert_eq!(id.index(), 17);
    }

    #[test]
    fn hash_in_set() {
        let mut set = HashSet::new();
        set.insert(ResourceId::from_raw(1));
        set.insert(ResourceId::from_raw(2));
        set.insert(ResourceId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", ResourceId::from_raw(9)), "9");
    }
}
