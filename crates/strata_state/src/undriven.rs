//! `W301`: locals that are read but never driven.

use crate::drivers::DriverTracker;
use crate::errors::warning_undriven;
use crate::universe::VarUniverse;
use strata_diagnostics::DiagnosticSink;
use strata_ir::NetId;

/// Emits one warning per local slot that has a reader and no driver. Slots
/// before `first_local` are ports; their drivers live in other processes.
pub(crate) fn report_undriven(
    u: &VarUniverse<'_>,
    tracker: &DriverTracker,
    slot_nets: &[NetId],
    first_local: usize,
    sink: &DiagnosticSink,
) -> usize {
    let mut count = 0;
    for slot in tracker.undriven_reads(first_local) {
        sink.emit(warning_undriven(&u.name, &u.net_name(slot_nets[slot])));
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::allocate;
    use crate::drivers::scan_local_bools;
    use crate::errors::W301;
    use strata_common::Interner;
    use strata_ir::{ClassifiedVar, DesignBuilder, PortDirection};

    #[test]
    fn read_only_local_warns_once() {
        let interner = Interner::new();
        let mut b = DesignBuilder::new(&interner);
        let a = b.net("a");
        let t = b.net("t");
        let y = b.net("y");
        let p = b.process("p");
        b.var(p, a, ClassifiedVar::boolean().port())
            .var(p, t, ClassifiedVar::boolean())
            .var(p, y, ClassifiedVar::boolean().output())
            .port(p, a, PortDirection::Input);
        let design = b.finish(p);
        let u = VarUniverse::new(&design, design.top_type(), &interner).unwrap();
        let numbering = allocate(&u).unwrap();
        let mut bools = DriverTracker::new(u.bool_slots());
        scan_local_bools(&u, &numbering, &mut bools);

        let sink = DiagnosticSink::new();
        let count = report_undriven(
            &u,
            &bools,
            &numbering.slot_nets,
            u.port_bools as usize,
            &sink,
        );
        assert_eq!(count, 1);
        let diags = sink.take_all();
        assert_eq!(diags[0].code, W301);
        assert!(diags[0].message.contains("`t`"));
    }
}
