//! Multi-driver detection over one driver slot space.

use crate::alloc::LocalNumbering;
use crate::finalize::ConcurrentLayout;
use crate::universe::VarUniverse;
use bitvec::vec::BitVec;
use tracing::trace;

/// Per-view driver bookkeeping. A slot is multiply driven once it has been
/// driven twice; bits are only ever set.
#[derive(Debug, Clone)]
pub(crate) struct DriverTracker {
    driven: BitVec,
    multi: BitVec,
    read: BitVec,
}

impl DriverTracker {
    pub fn new(len: usize) -> Self {
        Self {
            driven: BitVec::repeat(false, len),
            multi: BitVec::repeat(false, len),
            read: BitVec::repeat(false, len),
        }
    }

    /// Records a driver. Returns `true` if the slot was already driven.
    pub fn drive(&mut self, slot: usize) -> bool {
        if self.driven[slot] {
            self.multi.set(slot, true);
            true
        } else {
            self.driven.set(slot, true);
            false
        }
    }

    pub fn read(&mut self, slot: usize) {
        self.read.set(slot, true);
    }

    pub fn is_multi(&self, slot: usize) -> bool {
        self.multi[slot]
    }

    /// Slots at or after `from` that are read but never driven.
    pub fn undriven_reads(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        self.read
            .iter_ones()
            .filter(move |&slot| slot >= from && !self.driven[slot])
    }

    pub fn into_multi(self) -> BitVec {
        self.multi
    }
}

/// Feeds the process's own boolean-view variables to `tracker`.
pub(crate) fn scan_local_bools(
    u: &VarUniverse<'_>,
    numbering: &LocalNumbering,
    tracker: &mut DriverTracker,
) {
    for (net, var) in u.vars() {
        if !var.used || var.is_global {
            continue;
        }
        let Some(slot) = numbering.slot(net) else {
            continue;
        };
        if var.is_output {
            if tracker.drive(slot) {
                trace!("{}: `{}` has multiple drivers", u.name, u.net_name(net));
            }
        } else {
            tracker.read(slot);
        }
    }
}

/// Feeds the process's own concurrent-only variables to `tracker`.
pub(crate) fn scan_local_concurrent(
    u: &VarUniverse<'_>,
    layout: &ConcurrentLayout,
    tracker: &mut DriverTracker,
) {
    for (net, var) in u.vars() {
        if !var.is_concurrent_only() || var.is_global {
            continue;
        }
        let slot = match layout.local_slot(net) {
            Some(slot) => slot,
            None => match u.concurrent_port(net) {
                Some(pos) => pos.slot as usize,
                None => continue,
            },
        };
        if var.is_output {
            if tracker.drive(slot) {
                trace!(
                    "{}: concurrent `{}` has multiple drivers",
                    u.name,
                    u.net_name(net)
                );
            }
        } else {
            tracker.read(slot);
        }
    }
}
