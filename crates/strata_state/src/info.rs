//! Per-type pass results.

use bitvec::vec::BitVec;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strata_common::{ContentHash, InternalError, StrataResult};
use strata_ir::{ConcurrentKind, NetId, ProcessTypeId};

/// Boolean / integer / channel triplet of concurrent-view counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrentCounts {
    /// Plain booleans.
    pub bools: u32,
    /// Integers.
    pub ints: u32,
    /// Channels.
    pub chans: u32,
}

impl ConcurrentCounts {
    /// Returns the count for one kind.
    pub fn get(&self, kind: ConcurrentKind) -> u32 {
        match kind {
            ConcurrentKind::Bool => self.bools,
            ConcurrentKind::Int => self.ints,
            ConcurrentKind::Chan => self.chans,
        }
    }

    /// Increments the count for one kind.
    pub fn bump(&mut self, kind: ConcurrentKind) {
        match kind {
            ConcurrentKind::Bool => self.bools += 1,
            ConcurrentKind::Int => self.ints += 1,
            ConcurrentKind::Chan => self.chans += 1,
        }
    }

    /// Sum over all kinds.
    pub fn total(&self) -> u32 {
        self.bools + self.ints + self.chans
    }

    /// Every count multiplied by `factor`; `None` on overflow.
    pub fn checked_scaled(&self, factor: u32) -> Option<Self> {
        Some(Self {
            bools: self.bools.checked_mul(factor)?,
            ints: self.ints.checked_mul(factor)?,
            chans: self.chans.checked_mul(factor)?,
        })
    }

    /// Per-kind sum; `None` on overflow.
    pub fn checked_add(&self, rhs: Self) -> Option<Self> {
        Some(Self {
            bools: self.bools.checked_add(rhs.bools)?,
            ints: self.ints.checked_add(rhs.ints)?,
            chans: self.chans.checked_add(rhs.chans)?,
        })
    }
}

/// Final index of a concurrent-only local variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrentIndex {
    /// The index space.
    pub kind: ConcurrentKind,
    /// Position in that space. Booleans start at the type's `all_bools`.
    pub index: u32,
}

/// Parent-relative offset of a concurrent-only port variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrentOffset {
    /// The index space.
    pub kind: ConcurrentKind,
    /// Negative offset from the instance base in that space.
    pub offset: i32,
}

/// Category reported by lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateCategory {
    /// Boolean-view state.
    Bool,
    /// Concurrent-only boolean.
    ConcurrentBool,
    /// Concurrent-only integer.
    ConcurrentInt,
    /// Concurrent-only channel.
    ConcurrentChan,
}

impl From<ConcurrentKind> for StateCategory {
    fn from(kind: ConcurrentKind) -> Self {
        match kind {
            ConcurrentKind::Bool => StateCategory::ConcurrentBool,
            ConcurrentKind::Int => StateCategory::ConcurrentInt,
            ConcurrentKind::Chan => StateCategory::ConcurrentChan,
        }
    }
}

/// Result of a successful [`StateInfo::lookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSlot {
    /// The index within the category's space.
    pub index: u32,
    /// Which space the index belongs to.
    pub category: StateCategory,
}

/// Set on a type when one of its output ports turned out to be
/// multiply driven at some instantiating parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubinstanceFlags {
    /// Conflict seen through a boolean-view port.
    pub bools: bool,
    /// Conflict seen through a concurrent-view port.
    pub concurrent: bool,
}

/// The state summary of one process type.
///
/// Created once by the type's own computation and owned by the pass cache.
/// Afterwards only [`SubinstanceFlags`] may change, and only from `false` to
/// `true`, when a parent finds a conflict on one of this type's outputs.
///
/// Driver slots index the multi-driver bitsets. In the boolean view, ports
/// take slots `0..port_bools` in port order and local `i` takes
/// `port_bools + i`. In the concurrent view, concurrent-only ports come first
/// in port order, then local booleans, integers and channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInfo {
    /// The type this summary belongs to.
    pub process: ProcessTypeId,
    /// Boolean-view locals, dense `0..local_bools`.
    pub bool_map: IndexMap<NetId, u32>,
    /// Boolean-view ports, offsets in `[-port_bools, -1]`.
    pub bool_ports: IndexMap<NetId, i32>,
    /// Concurrent-only locals in their final layout.
    pub concurrent_map: IndexMap<NetId, ConcurrentIndex>,
    /// Concurrent-only ports with per-kind offsets.
    pub concurrent_ports: IndexMap<NetId, ConcurrentOffset>,
    /// Boolean-view locals owned by this type.
    pub local_bools: u32,
    /// Boolean-view ports.
    pub port_bools: u32,
    /// Local booleans plus those of every sub-instance.
    pub all_bools: u32,
    /// Concurrent-only locals owned by this type.
    pub local_concurrent: ConcurrentCounts,
    /// Concurrent-only ports.
    pub port_concurrent: ConcurrentCounts,
    /// Concurrent-only locals plus those of every sub-instance.
    pub all_concurrent: ConcurrentCounts,
    /// Multiply-driven boolean-view slots.
    pub multi_driver_bools: BitVec,
    /// Multiply-driven concurrent-view slots.
    pub multi_driver_concurrent: BitVec,
    /// Net occupying each boolean-view slot.
    pub bool_slot_nets: Vec<NetId>,
    /// Net occupying each concurrent-view slot.
    pub concurrent_slot_nets: Vec<NetId>,
    pub(crate) subinstance: SubinstanceFlags,
}

impl StateInfo {
    /// Whether an output port of this type was found multiply driven from a
    /// parent's perspective.
    pub fn multiply_driven_as_subinstance(&self) -> SubinstanceFlags {
        self.subinstance
    }

    /// ORs parent findings into the sub-instance flags. Flags are never
    /// cleared.
    pub(crate) fn mark_multiply_driven_as_subinstance(&mut self, flags: SubinstanceFlags) {
        self.subinstance.bools |= flags.bools;
        self.subinstance.concurrent |= flags.concurrent;
    }

    /// `true` if any slot in either view is multiply driven.
    pub fn has_multi_driver(&self) -> bool {
        self.multi_driver_bools.any() || self.multi_driver_concurrent.any()
    }

    /// Nets whose slot is flagged in either view, boolean view first.
    pub fn multiply_driven_nets(&self) -> impl Iterator<Item = NetId> + '_ {
        let bools = self
            .multi_driver_bools
            .iter_ones()
            .map(|slot| self.bool_slot_nets[slot]);
        let concurrent = self
            .multi_driver_concurrent
            .iter_ones()
            .map(|slot| self.concurrent_slot_nets[slot]);
        bools.chain(concurrent)
    }

    /// A hash of the complete summary, for comparing runs.
    pub fn fingerprint(&self) -> StrataResult<ContentHash> {
        let bytes = bincode::serde::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| InternalError::new(format!("cannot encode state summary: {e}")))?;
        Ok(ContentHash::from_bytes(&bytes))
    }
}

#[cfg(test)]
impl StateInfo {
    pub(crate) fn empty(process: ProcessTypeId) -> Self {
        StateInfo {
            process,
            bool_map: IndexMap::new(),
            bool_ports: IndexMap::new(),
            concurrent_map: IndexMap::new(),
            concurrent_ports: IndexMap::new(),
            local_bools: 0,
            port_bools: 0,
            all_bools: 0,
            local_concurrent: ConcurrentCounts::default(),
            port_concurrent: ConcurrentCounts::default(),
            all_concurrent: ConcurrentCounts::default(),
            multi_driver_bools: BitVec::new(),
            multi_driver_concurrent: BitVec::new(),
            bool_slot_nets: Vec::new(),
            concurrent_slot_nets: Vec::new(),
            subinstance: SubinstanceFlags::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::bitvec;
    use bitvec::order::Lsb0;

    fn empty_info() -> StateInfo {
        StateInfo::empty(ProcessTypeId::from_raw(0))
    }

    #[test]
    fn counts_arithmetic() {
        let mut c = ConcurrentCounts::default();
        c.bump(ConcurrentKind::Int);
        c.bump(ConcurrentKind::Int);
        c.bump(ConcurrentKind::Chan);
        assert_eq!(c.get(ConcurrentKind::Int), 2);
        assert_eq!(c.total(), 3);
        let sum = c.checked_scaled(3).and_then(|s| s.checked_add(c)).unwrap();
        assert_eq!(sum.ints, 8);
        assert_eq!(sum.chans, 4);
    }

    #[test]
    fn counts_overflow_is_none() {
        let c = ConcurrentCounts {
            bools: 0,
            ints: 2,
            chans: 0,
        };
        assert_eq!(c.checked_scaled(u32::MAX), None);
        let big = ConcurrentCounts {
            chans: u32::MAX,
            ..c
        };
        assert_eq!(big.checked_add(big), None);
        assert_eq!(c.checked_scaled(0), Some(ConcurrentCounts::default()));
    }

    #[test]
    fn flags_only_accumulate() {
        let mut info = empty_info();
        info.mark_multiply_driven_as_subinstance(SubinstanceFlags {
            bools: true,
            concurrent: false,
        });
        info.mark_multiply_driven_as_subinstance(SubinstanceFlags::default());
        assert!(info.multiply_driven_as_subinstance().bools);
        assert!(!info.multiply_driven_as_subinstance().concurrent);
    }

    #[test]
    fn multiply_driven_nets_maps_slots() {
        let mut info = empty_info();
        info.bool_slot_nets = vec![NetId::from_raw(4), NetId::from_raw(5)];
        info.multi_driver_bools = bitvec![usize, Lsb0; 0, 1];
        assert!(info.has_multi_driver());
        let nets: Vec<_> = info.multiply_driven_nets().collect();
        assert_eq!(nets, vec![NetId::from_raw(5)]);
    }

    #[test]
    fn fingerprint_is_stable() {
        let a = empty_info().fingerprint().unwrap();
        let b = empty_info().fingerprint().unwrap();
        assert_eq!(a, b);
        let mut other = empty_info();
        other.local_bools = 1;
        assert_ne!(a, other.fingerprint().unwrap());
    }
}
