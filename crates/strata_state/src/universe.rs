//! Read-only adapter over the booleanized view of one process type.
//!
//! Resolves the view, pre-counts ports and locals for both views and indexes
//! the non-omitted port lists, so the later stages never scan a port list.

use crate::errors::StateError;
use crate::info::ConcurrentCounts;
use indexmap::IndexMap;
use strata_common::{Ident, Interner};
use strata_ir::{BooleanizedView, ClassifiedVar, ConcurrentKind, Design, NetId, ProcessType};

/// Position of a concurrent-only port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConcurrentPortPos {
    /// Position among all concurrent-only live ports; this is the driver slot.
    pub slot: u32,
    /// Position among preceding live ports of the same kind.
    pub rank: u32,
    pub kind: ConcurrentKind,
}

pub(crate) struct VarUniverse<'d> {
    pub name: String,
    pub design: &'d Design,
    pub ty: &'d ProcessType,
    pub view: &'d BooleanizedView,
    interner: &'d Interner,
    bool_port_pos: IndexMap<NetId, u32>,
    concurrent_port_pos: IndexMap<NetId, ConcurrentPortPos>,
    pub port_bools: u32,
    pub local_bools: u32,
    pub port_concurrent: ConcurrentCounts,
    pub local_concurrent: ConcurrentCounts,
}

impl<'d> VarUniverse<'d> {
    pub fn new(
        design: &'d Design,
        ty: &'d ProcessType,
        interner: &'d Interner,
    ) -> Result<Self, StateError> {
        let name = interner.display_name(ty.name);
        let view = ty.view.as_ref().ok_or_else(|| StateError::NoBooleanView {
            process: name.clone(),
        })?;

        let mut port_bools = 0;
        let mut local_bools = 0;
        let mut port_concurrent = ConcurrentCounts::default();
        let mut local_concurrent = ConcurrentCounts::default();
        for var in view.vars.values() {
            if var.is_global {
                continue;
            }
            if var.used {
                if var.is_port {
                    port_bools += 1;
                } else {
                    local_bools += 1;
                }
            } else if var.used_concurrent {
                if var.is_concurrent_port {
                    port_concurrent.bump(var.kind());
                } else {
                    local_concurrent.bump(var.kind());
                }
            }
        }

        let mut universe = Self {
            name,
            design,
            ty,
            view,
            interner,
            bool_port_pos: IndexMap::new(),
            concurrent_port_pos: IndexMap::new(),
            port_bools,
            local_bools,
            port_concurrent,
            local_concurrent,
        };
        universe.index_ports()?;
        Ok(universe)
    }

    fn index_ports(&mut self) -> Result<(), StateError> {
        for (pos, port) in self.view.live_ports().enumerate() {
            if let Some(var) = self.view.vars.get(&port.net) {
                if var.used && !var.is_global && !var.is_port {
                    return Err(StateError::inconsistent(
                        &self.name,
                        format!(
                            "`{}` is in the port list but not classified as a port",
                            self.net_name(port.net)
                        ),
                    ));
                }
            }
            self.bool_port_pos.entry(port.net).or_insert(pos as u32);
        }

        let mut slot = 0;
        let mut ranks = ConcurrentCounts::default();
        for port in self.view.live_concurrent_ports() {
            let Some(var) = self.view.vars.get(&port.net) else {
                return Err(StateError::inconsistent(
                    &self.name,
                    format!(
                        "concurrent port `{}` has no classified variable",
                        self.net_name(port.net)
                    ),
                ));
            };
            // Ports used in the boolean view live in the boolean port space.
            if !var.is_concurrent_only() || var.is_global {
                continue;
            }
            if !var.is_concurrent_port {
                return Err(StateError::inconsistent(
                    &self.name,
                    format!(
                        "`{}` is in the concurrent port list but not classified as a port",
                        self.net_name(port.net)
                    ),
                ));
            }
            if self.concurrent_port_pos.contains_key(&port.net) {
                continue;
            }
            let kind = var.kind();
            self.concurrent_port_pos.insert(
                port.net,
                ConcurrentPortPos {
                    slot,
                    rank: ranks.get(kind),
                    kind,
                },
            );
            slot += 1;
            ranks.bump(kind);
        }
        Ok(())
    }

    /// Classified variables in booleanization order.
    pub fn vars(&self) -> impl Iterator<Item = (NetId, &'d ClassifiedVar)> + 'd {
        self.view.vars.iter().map(|(net, var)| (*net, var))
    }

    pub fn var(&self, net: NetId) -> Option<&'d ClassifiedVar> {
        self.view.vars.get(&net)
    }

    /// Position of `net` among the non-omitted boolean ports.
    pub fn bool_port_position(&self, net: NetId) -> Option<u32> {
        self.bool_port_pos.get(&net).copied()
    }

    pub fn concurrent_port(&self, net: NetId) -> Option<ConcurrentPortPos> {
        self.concurrent_port_pos.get(&net).copied()
    }

    /// Size of the boolean-view driver slot space.
    pub fn bool_slots(&self) -> usize {
        (self.port_bools + self.local_bools) as usize
    }

    /// Size of the concurrent-view driver slot space.
    pub fn concurrent_slots(&self) -> usize {
        (self.port_concurrent.total() + self.local_concurrent.total()) as usize
    }

    pub fn is_global_net(&self, net: NetId) -> bool {
        self.design.nets.try_get(net).is_some_and(|n| n.global)
    }

    pub fn net_name(&self, net: NetId) -> String {
        match self.design.nets.try_get(net) {
            Some(n) => self.interner.display_name(n.name),
            None => format!("#{}", net.as_raw()),
        }
    }

    pub fn resolve(&self, ident: Ident) -> String {
        self.interner.display_name(ident)
    }

    pub fn type_name(&self, ty: strata_ir::ProcessTypeId) -> String {
        match self.design.types.try_get(ty) {
            Some(t) => self.interner.display_name(t.name),
            None => format!("#{}", ty.as_raw()),
        }
    }
}
