//! Lookups and human-readable dumps over computed state.

use std::collections::HashSet;
use std::fmt::{self, Write};

use bitvec::slice::BitSlice;
use strata_common::Interner;
use strata_ir::{Design, NetId, ProcessTypeId};

use crate::info::{StateCategory, StateInfo, StateSlot};
use crate::pass::{type_name, StatePass, Summary};

impl StateInfo {
    /// Local index and category of `net`.
    ///
    /// Ports, globals and nets the process does not use have no local entry
    /// and return `None`; see [`StateInfo::port_offset`] for ports.
    pub fn lookup(&self, net: NetId) -> Option<StateSlot> {
        if let Some(&index) = self.bool_map.get(&net) {
            return Some(StateSlot {
                index,
                category: StateCategory::Bool,
            });
        }
        self.concurrent_map.get(&net).map(|ci| StateSlot {
            index: ci.index,
            category: ci.kind.into(),
        })
    }

    /// Parent-relative offset of a port variable.
    pub fn port_offset(&self, net: NetId) -> Option<(i32, StateCategory)> {
        if let Some(&offset) = self.bool_ports.get(&net) {
            return Some((offset, StateCategory::Bool));
        }
        self.concurrent_ports
            .get(&net)
            .map(|co| (co.offset, co.kind.into()))
    }

    /// Whether the slot of `net` in either view has more than one driver.
    pub fn is_multiply_driven(&self, net: NetId) -> bool {
        let flagged = |nets: &[NetId], bits: &BitSlice| {
            nets.iter()
                .position(|&n| n == net)
                .is_some_and(|slot| bits[slot])
        };
        flagged(
            self.bool_slot_nets.as_slice(),
            self.multi_driver_bools.as_bitslice(),
        ) || flagged(
            self.concurrent_slot_nets.as_slice(),
            self.multi_driver_concurrent.as_bitslice(),
        )
    }
}

impl StatePass {
    /// Index or port offset of `net` inside `ty`, whichever applies.
    pub fn get_type_offset(&self, ty: ProcessTypeId, net: NetId) -> Option<(i32, StateCategory)> {
        let info = self.state_info(ty)?;
        match info.lookup(net) {
            Some(slot) => Some((slot.index as i32, slot.category)),
            None => info.port_offset(net),
        }
    }

    /// Writes the dump of one type.
    pub fn write_dump<W: Write>(
        &self,
        w: &mut W,
        design: &Design,
        ty: ProcessTypeId,
        interner: &Interner,
    ) -> fmt::Result {
        let name = type_name(design, ty, interner);
        writeln!(w, "--- Process: {name} ---")?;
        match self.summary_of(ty) {
            Summary::State(si) => {
                writeln!(
                    w,
                    "   nbools = {}, nvars = {}",
                    si.local_bools,
                    si.local_concurrent.total()
                )?;
                writeln!(w, "  localbools: {}", si.local_bools)?;
                writeln!(w, "  portbools: {}", si.port_bools)?;
                let flags = si.multiply_driven_as_subinstance();
                writeln!(w, "  ismulti: {}", u8::from(flags.bools))?;
                writeln!(w, "  all booleans (incl. inst): {}", si.all_bools)?;
                writeln!(
                    w,
                    "  concurrent ports: bools = {}, ints = {}, chans = {}",
                    si.port_concurrent.bools, si.port_concurrent.ints, si.port_concurrent.chans
                )?;
                writeln!(
                    w,
                    "  concurrent all: bools = {}, ints = {}, chans = {}",
                    si.all_concurrent.bools, si.all_concurrent.ints, si.all_concurrent.chans
                )?;
                writeln!(w, "  concurrent ismulti: {}", u8::from(flags.concurrent))?;
            }
            Summary::BlackBox => {
                let ports = design
                    .types
                    .try_get(ty)
                    .and_then(|t| t.view.as_ref())
                    .map_or(0, |v| v.ports.len());
                writeln!(w, "  ** black box **")?;
                writeln!(w, "  portbools: {ports}")?;
            }
            Summary::NotComputed => writeln!(w, "  ** not computed **")?,
        }
        writeln!(w, "--- End Process: {name} ---")
    }

    /// The dump of one type as a string.
    pub fn dump(&self, design: &Design, ty: ProcessTypeId, interner: &Interner) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = self.write_dump(&mut out, design, ty, interner);
        out
    }

    /// Dumps every type reachable from `root` once, sub-types first.
    pub fn dump_hierarchy(&self, design: &Design, root: ProcessTypeId, interner: &Interner) -> String {
        let mut out = String::new();
        for ty in hierarchy_order(design, root) {
            let _ = self.write_dump(&mut out, design, ty, interner);
        }
        out
    }
}

/// Every type reachable from `root`, each once, sub-types before the types
/// that instantiate them.
pub fn hierarchy_order(design: &Design, root: ProcessTypeId) -> Vec<ProcessTypeId> {
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    post_order(design, root, &mut seen, &mut order);
    order
}

fn post_order(
    design: &Design,
    ty: ProcessTypeId,
    seen: &mut HashSet<ProcessTypeId>,
    order: &mut Vec<ProcessTypeId>,
) {
    if !seen.insert(ty) {
        return;
    }
    if let Some(process) = design.types.try_get(ty) {
        for inst in &process.instances {
            post_order(design, inst.ty, seen, order);
        }
    }
    order.push(ty);
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_config::StateConfig;
    use strata_diagnostics::DiagnosticSink;
    use strata_ir::{ClassifiedVar, ConcurrentKind, DesignBuilder, PortDirection};

    struct Fixture {
        interner: Interner,
        design: Design,
        pass: StatePass,
    }

    fn fixture() -> (Fixture, [NetId; 5], [ProcessTypeId; 3]) {
        let interner = Interner::new();
        let mut b = DesignBuilder::new(&interner);
        let a = b.net("a");
        let y = b.net("y");
        let t = b.net("t");
        let q = b.net("q");
        let vdd = b.global_net("Vdd");
        let leaf = b.process("leaf");
        b.var(leaf, a, ClassifiedVar::boolean().port())
            .var(leaf, y, ClassifiedVar::boolean().port().output())
            .var(leaf, t, ClassifiedVar::boolean().output())
            .var(leaf, q, ClassifiedVar::concurrent(ConcurrentKind::Int).output())
            .var(leaf, vdd, ClassifiedVar::boolean())
            .port(leaf, a, PortDirection::Input)
            .port(leaf, y, PortDirection::Output);
        let bb = b.process("bb");
        b.port(bb, a, PortDirection::Input).black_box(bb);
        let top = b.process("top");
        let s0 = b.net("s0");
        let s1 = b.net("s1");
        b.var(top, s0, ClassifiedVar::boolean())
            .var(top, s1, ClassifiedVar::boolean().output());
        b.array_instance(top, "u", leaf, 2, &[s1, s0, s1, s0]);
        b.instance(top, "x", bb, &[s1]);
        let design = b.finish(top);
        let mut pass = StatePass::new(StateConfig::default());
        pass.run(&design, top, &interner, &DiagnosticSink::new())
            .unwrap();
        (
            Fixture {
                interner,
                design,
                pass,
            },
            [a, y, t, q, s0],
            [leaf, bb, top],
        )
    }

    #[test]
    fn lookup_and_offsets() {
        let (f, [a, y, t, q, _], [leaf, _, _]) = fixture();
        let info = f.pass.state_info(leaf).unwrap();
        assert_eq!(
            info.lookup(t),
            Some(StateSlot {
                index: 0,
                category: StateCategory::Bool
            })
        );
        // Concurrent integers are zero-based.
        assert_eq!(
            info.lookup(q),
            Some(StateSlot {
                index: 0,
                category: StateCategory::ConcurrentInt
            })
        );
        assert_eq!(info.lookup(a), None);
        assert_eq!(info.port_offset(a), Some((-2, StateCategory::Bool)));
        assert_eq!(f.pass.get_type_offset(leaf, y), Some((-1, StateCategory::Bool)));
        assert_eq!(f.pass.get_type_offset(leaf, t), Some((0, StateCategory::Bool)));
    }

    #[test]
    fn globals_are_never_mapped() {
        let (f, _, [leaf, _, _]) = fixture();
        let vdd = f.interner.get("Vdd").unwrap();
        let net = f
            .design
            .nets
            .iter()
            .find(|(_, n)| n.name == vdd)
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(f.pass.get_type_offset(leaf, net), None);
    }

    #[test]
    fn multiply_driven_query() {
        let (f, [_, y, _, _, s0], [leaf, _, top]) = fixture();
        let info = f.pass.state_info(top).unwrap();
        assert!(info.is_multiply_driven(s0));
        assert!(!f.pass.state_info(leaf).unwrap().is_multiply_driven(y));
        assert!(f.pass.state_info(leaf).unwrap().multiply_driven_as_subinstance().bools);
    }

    #[test]
    fn dump_format() {
        let (f, _, [leaf, bb, _]) = fixture();
        let text = f.pass.dump(&f.design, leaf, &f.interner);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "--- Process: leaf ---");
        assert_eq!(lines[1], "   nbools = 1, nvars = 1");
        assert_eq!(lines[2], "  localbools: 1");
        assert_eq!(lines[3], "  portbools: 2");
        assert_eq!(lines[4], "  ismulti: 1");
        assert_eq!(lines[5], "  all booleans (incl. inst): 1");
        assert_eq!(*lines.last().unwrap(), "--- End Process: leaf ---");

        let text = f.pass.dump(&f.design, bb, &f.interner);
        assert!(text.contains("  ** black box **\n  portbools: 1\n"));
    }

    #[test]
    fn hierarchy_dump_is_post_order() {
        let (f, _, [_, _, top]) = fixture();
        let text = f.pass.dump_hierarchy(&f.design, top, &f.interner);
        let headers: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("--- Process"))
            .collect();
        assert_eq!(
            headers,
            vec![
                "--- Process: leaf ---",
                "--- Process: bb ---",
                "--- Process: top ---"
            ]
        );
    }
}
