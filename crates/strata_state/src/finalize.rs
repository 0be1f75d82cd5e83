//! Concurrent-view layout.
//!
//! Concurrent-only locals are split into three zero-based spaces by kind.
//! Booleans are shifted by the type's `all_bools` once aggregation has
//! produced it, so every boolean-like piece of state fits one flat array.

use crate::errors::StateError;
use crate::info::{ConcurrentCounts, ConcurrentIndex, ConcurrentOffset};
use crate::universe::VarUniverse;
use indexmap::IndexMap;
use strata_ir::{ConcurrentKind, NetId};

#[derive(Debug)]
pub(crate) struct ConcurrentLayout {
    /// Zero-based index per kind, before the boolean shift.
    local: IndexMap<NetId, ConcurrentIndex>,
    pub ports: IndexMap<NetId, ConcurrentOffset>,
    port_total: u32,
    local_counts: ConcurrentCounts,
    /// Net of every driver slot: ports, then booleans, integers, channels.
    pub slot_nets: Vec<NetId>,
}

impl ConcurrentLayout {
    pub fn new(u: &VarUniverse<'_>) -> Result<Self, StateError> {
        let mut local = IndexMap::new();
        let mut ports = IndexMap::new();
        let mut next = ConcurrentCounts::default();
        let port_total = u.port_concurrent.total();
        let mut slots: Vec<Option<NetId>> = vec![None; u.concurrent_slots()];

        for (net, var) in u.vars() {
            if !var.is_concurrent_only() || var.is_global {
                continue;
            }
            let kind = var.kind();
            if var.is_concurrent_port {
                let pos = u.concurrent_port(net).ok_or_else(|| {
                    StateError::inconsistent(
                        &u.name,
                        format!(
                            "concurrent port `{}` is missing from the concurrent port list",
                            u.net_name(net)
                        ),
                    )
                })?;
                let mut offset = pos.rank as i32 - u.port_concurrent.get(kind) as i32;
                if kind == ConcurrentKind::Bool {
                    offset -= u.port_bools as i32;
                }
                ports.insert(net, ConcurrentOffset { kind, offset });
                slots[pos.slot as usize] = Some(net);
            } else {
                let index = next.get(kind);
                next.bump(kind);
                local.insert(net, ConcurrentIndex { kind, index });
                let slot = port_total + kind_base(&u.local_concurrent, kind) + index;
                slots[slot as usize] = Some(net);
            }
        }

        if next != u.local_concurrent {
            return Err(StateError::inconsistent(
                &u.name,
                format!(
                    "numbered {} concurrent locals, expected {}",
                    next.total(),
                    u.local_concurrent.total()
                ),
            ));
        }
        let slot_nets = slots.into_iter().collect::<Option<Vec<_>>>().ok_or_else(|| {
            StateError::inconsistent(&u.name, "concurrent port positions are not a permutation")
        })?;

        Ok(Self {
            local,
            ports,
            port_total,
            local_counts: next,
            slot_nets,
        })
    }

    /// Driver slot of a concurrent-only local.
    pub fn local_slot(&self, net: NetId) -> Option<usize> {
        self.local.get(&net).map(|ci| {
            (self.port_total + kind_base(&self.local_counts, ci.kind) + ci.index) as usize
        })
    }

    /// First driver slot that belongs to a local.
    pub fn first_local_slot(&self) -> usize {
        self.port_total as usize
    }

    /// The final concurrent map, with booleans placed after `all_bools`.
    pub fn finish(self, all_bools: u32) -> IndexMap<NetId, ConcurrentIndex> {
        self.local
            .into_iter()
            .map(|(net, ci)| {
                let index = match ci.kind {
                    ConcurrentKind::Bool => all_bools + ci.index,
                    _ => ci.index,
                };
                (net, ConcurrentIndex { index, ..ci })
            })
            .collect()
    }
}

fn kind_base(counts: &ConcurrentCounts, kind: ConcurrentKind) -> u32 {
    match kind {
        ConcurrentKind::Bool => 0,
        ConcurrentKind::Int => counts.bools,
        ConcurrentKind::Chan => counts.bools + counts.ints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::Interner;
    use strata_ir::{ClassifiedVar, DesignBuilder, PortDirection};

    #[test]
    fn layout_per_kind() {
        let interner = Interner::new();
        let mut b = DesignBuilder::new(&interner);
        let a = b.net("a");
        let cb = b.net("cb");
        let ci0 = b.net("ci0");
        let cc = b.net("cc");
        let ci1 = b.net("ci1");
        let pb = b.net("pb");
        let pi = b.net("pi");
        let p = b.process("p");
        b.var(p, a, ClassifiedVar::boolean().port())
            .var(p, ci0, ClassifiedVar::concurrent(ConcurrentKind::Int))
            .var(p, cb, ClassifiedVar::concurrent(ConcurrentKind::Bool))
            .var(p, cc, ClassifiedVar::concurrent(ConcurrentKind::Chan))
            .var(p, ci1, ClassifiedVar::concurrent(ConcurrentKind::Int))
            .var(p, pb, ClassifiedVar::concurrent(ConcurrentKind::Bool).port())
            .var(p, pi, ClassifiedVar::concurrent(ConcurrentKind::Int).port())
            .port(p, a, PortDirection::Input)
            .concurrent_port(p, pi, PortDirection::Input)
            .concurrent_port(p, pb, PortDirection::Output);
        let design = b.finish(p);
        let u = VarUniverse::new(&design, design.top_type(), &interner).unwrap();
        let layout = ConcurrentLayout::new(&u).unwrap();

        assert_eq!(
            layout.ports[&pi],
            ConcurrentOffset {
                kind: ConcurrentKind::Int,
                offset: -1
            }
        );
        // Boolean ports sit below the boolean-view ports.
        assert_eq!(layout.ports[&pb].offset, -2);
        assert_eq!(layout.slot_nets, vec![pi, pb, cb, ci0, ci1, cc]);
        assert_eq!(layout.local_slot(ci1), Some(4));
        assert_eq!(layout.first_local_slot(), 2);

        let map = layout.finish(7);
        assert_eq!(map[&cb].index, 7);
        assert_eq!(map[&ci0].index, 0);
        assert_eq!(map[&ci1].index, 1);
        assert_eq!(map[&cc].index, 0);
        assert_eq!(map[&cc].kind, ConcurrentKind::Chan);
    }

    #[test]
    fn globals_and_dual_use_are_skipped() {
        let interner = Interner::new();
        let mut b = DesignBuilder::new(&interner);
        let g = b.global_net("g");
        let both = b.net("both");
        let p = b.process("p");
        b.var(p, g, ClassifiedVar::concurrent(ConcurrentKind::Int))
            .var(p, both, ClassifiedVar::boolean().also_concurrent());
        let design = b.finish(p);
        let u = VarUniverse::new(&design, design.top_type(), &interner).unwrap();
        let layout = ConcurrentLayout::new(&u).unwrap();
        assert!(layout.slot_nets.is_empty());
        assert!(layout.finish(0).is_empty());
    }
}
