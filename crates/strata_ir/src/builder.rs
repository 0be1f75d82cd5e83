//! Programmatic construction of a [`Design`].
//!
//! The front end and booleanization normally produce these tables; the
//! builder lets the CLI loader and tests assemble them directly.

use crate::arena::Arena;
use crate::design::Design;
use crate::ids::{NetId, ProcessTypeId};
use crate::net::Net;
use crate::process::{Instance, ProcessType};
use crate::view::{BooleanizedView, ClassifiedVar, PortDirection, ViewPort};
use strata_common::Interner;

/// Incrementally assembles nets, process types and their views.
pub struct DesignBuilder<'a> {
    interner: &'a Interner,
    nets: Arena<NetId, Net>,
    types: Arena<ProcessTypeId, ProcessType>,
}

impl<'a> DesignBuilder<'a> {
    /// Creates an empty builder interning names into `interner`.
    pub fn new(interner: &'a Interner) -> Self {
        Self {
            interner,
            nets: Arena::new(),
            types: Arena::new(),
        }
    }

    fn alloc_net(&mut self, name: &str, global: bool) -> NetId {
        let id = self.nets.next_id();
        self.nets.alloc(Net {
            id,
            name: self.interner.get_or_intern(name),
            global,
        })
    }

    /// Adds a design-unique net.
    pub fn net(&mut self, name: &str) -> NetId {
        self.alloc_net(name, false)
    }

    /// Adds a global net.
    pub fn global_net(&mut self, name: &str) -> NetId {
        self.alloc_net(name, true)
    }

    /// Adds a process type with an empty booleanized view.
    pub fn process(&mut self, name: &str) -> ProcessTypeId {
        let id = self.types.next_id();
        self.types.alloc(ProcessType {
            id,
            name: self.interner.get_or_intern(name),
            black_box: false,
            instances: Vec::new(),
            view: Some(BooleanizedView::default()),
        })
    }

    /// Flags a process type as a black box.
    pub fn black_box(&mut self, ty: ProcessTypeId) -> &mut Self {
        self.types[ty].black_box = true;
        self
    }

    /// Drops the booleanized view of a type, as if booleanization never ran.
    pub fn without_view(&mut self, ty: ProcessTypeId) -> &mut Self {
        self.types[ty].view = None;
        self
    }

    fn view_mut(&mut self, ty: ProcessTypeId) -> &mut BooleanizedView {
        self.types[ty]
            .view
            .get_or_insert_with(BooleanizedView::default)
    }

    /// Records the classification of `net` inside `ty`. Global nets are
    /// always classified as global.
    pub fn var(&mut self, ty: ProcessTypeId, net: NetId, var: ClassifiedVar) -> &mut Self {
        let global = self.nets[net].global;
        let var = ClassifiedVar {
            is_global: var.is_global || global,
            ..var
        };
        self.view_mut(ty).vars.insert(net, var);
        self
    }

    /// Appends a boolean-view port.
    pub fn port(&mut self, ty: ProcessTypeId, net: NetId, direction: PortDirection) -> &mut Self {
        self.view_mut(ty).ports.push(ViewPort {
            net,
            direction,
            omit: false,
        });
        self
    }

    /// Appends an omitted boolean-view port.
    pub fn omitted_port(
        &mut self,
        ty: ProcessTypeId,
        net: NetId,
        direction: PortDirection,
    ) -> &mut Self {
        self.view_mut(ty).ports.push(ViewPort {
            net,
            direction,
            omit: true,
        });
        self
    }

    /// Appends a concurrent-view port.
    pub fn concurrent_port(
        &mut self,
        ty: ProcessTypeId,
        net: NetId,
        direction: PortDirection,
    ) -> &mut Self {
        self.view_mut(ty).concurrent_ports.push(ViewPort {
            net,
            direction,
            omit: false,
        });
        self
    }

    /// Appends an omitted concurrent-view port.
    pub fn omitted_concurrent_port(
        &mut self,
        ty: ProcessTypeId,
        net: NetId,
        direction: PortDirection,
    ) -> &mut Self {
        self.view_mut(ty).concurrent_ports.push(ViewPort {
            net,
            direction,
            omit: true,
        });
        self
    }

    /// Adds a scalar instance of `sub` to `parent`; returns its position.
    pub fn instance(
        &mut self,
        parent: ProcessTypeId,
        name: &str,
        sub: ProcessTypeId,
        connections: &[NetId],
    ) -> usize {
        self.push_instance(parent, name, sub, None, connections)
    }

    /// Adds an arrayed instance of `sub` to `parent`; `connections` holds
    /// `size` consecutive groups. Returns its position.
    pub fn array_instance(
        &mut self,
        parent: ProcessTypeId,
        name: &str,
        sub: ProcessTypeId,
        size: u32,
        connections: &[NetId],
    ) -> usize {
        self.push_instance(parent, name, sub, Some(size), connections)
    }

    fn push_instance(
        &mut self,
        parent: ProcessTypeId,
        name: &str,
        sub: ProcessTypeId,
        array_size: Option<u32>,
        connections: &[NetId],
    ) -> usize {
        let instances = &mut self.types[parent].instances;
        instances.push(Instance {
            name: self.interner.get_or_intern(name),
            ty: sub,
            array_size,
            connections: connections.to_vec(),
            concurrent_connections: Vec::new(),
        });
        instances.len() - 1
    }

    /// Sets the concurrent-view connections of an existing instance.
    pub fn concurrent_connections(
        &mut self,
        parent: ProcessTypeId,
        instance: usize,
        connections: &[NetId],
    ) -> &mut Self {
        self.types[parent].instances[instance].concurrent_connections = connections.to_vec();
        self
    }

    /// Finishes the design rooted at `top`.
    pub fn finish(self, top: ProcessTypeId) -> Design {
        Design {
            nets: self.nets,
            types: self.types,
            top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ConcurrentKind;

    #[test]
    fn builds_leaf_with_ports() {
        let interner = Interner::new();
        let mut b = DesignBuilder::new(&interner);
        let a = b.net("a");
        let y = b.net("y");
        let leaf = b.process("inv");
        b.var(leaf, a, ClassifiedVar::boolean().port())
            .var(leaf, y, ClassifiedVar::boolean().port().output())
            .port(leaf, a, PortDirection::Input)
            .port(leaf, y, PortDirection::Output);
        let design = b.finish(leaf);

        let view = design.top_type().view.as_ref().unwrap();
        assert_eq!(view.vars.len(), 2);
        assert_eq!(view.connection_width(), 2);
        assert_eq!(interner.resolve(design.top_type().name), "inv");
    }

    #[test]
    fn global_nets_force_global_classification() {
        let interner = Interner::new();
        let mut b = DesignBuilder::new(&interner);
        let vdd = b.global_net("Vdd");
        let p = b.process("p");
        b.var(p, vdd, ClassifiedVar::boolean());
        let design = b.finish(p);
        let view = design.top_type().view.as_ref().unwrap();
        assert!(view.vars[&vdd].is_global);
    }

    #[test]
    fn instances_record_connections() {
        let interner = Interner::new();
        let mut b = DesignBuilder::new(&interner);
        let x = b.net("x");
        let c = b.net("c");
        let leaf = b.process("leaf");
        let top = b.process("top");
        let idx = b.array_instance(top, "u", leaf, 2, &[x, x]);
        b.concurrent_connections(top, idx, &[c, c]);
        b.var(top, c, ClassifiedVar::concurrent(ConcurrentKind::Chan));
        let design = b.finish(top);
        let inst = &design.top_type().instances[idx];
        assert_eq!(inst.multiplicity(), 2);
        assert_eq!(inst.connections, vec![x, x]);
        assert_eq!(inst.concurrent_connections, vec![c, c]);
    }

    #[test]
    fn without_view_clears() {
        let interner = Interner::new();
        let mut b = DesignBuilder::new(&interner);
        let p = b.process("raw");
        b.without_view(p);
        assert!(b.finish(p).top_type().view.is_none());
    }
}
