//! Boolean-view numbering of one process type.
//!
//! Locals get a dense counter in booleanization order. Ports keep their
//! position in the non-omitted port list, stored as `position - port_bools`
//! so that a parent adds its own base for the instance to recover the
//! absolute index.

use crate::errors::StateError;
use crate::universe::VarUniverse;
use indexmap::IndexMap;
use strata_ir::NetId;

/// Boolean-view numbering and the inverse slot table.
#[derive(Debug, Default)]
pub(crate) struct LocalNumbering {
    pub bool_map: IndexMap<NetId, u32>,
    pub bool_ports: IndexMap<NetId, i32>,
    pub port_bools: u32,
    /// Net of every driver slot: ports first, then locals.
    pub slot_nets: Vec<NetId>,
}

impl LocalNumbering {
    /// Driver slot of a boolean-view net, if the process owns one.
    pub fn slot(&self, net: NetId) -> Option<usize> {
        if let Some(&index) = self.bool_map.get(&net) {
            return Some((self.port_bools + index) as usize);
        }
        self.bool_ports
            .get(&net)
            .map(|&offset| (offset + self.port_bools as i32) as usize)
    }
}

pub(crate) fn allocate(u: &VarUniverse<'_>) -> Result<LocalNumbering, StateError> {
    let mut bool_map = IndexMap::new();
    let mut bool_ports = IndexMap::new();
    let mut slots: Vec<Option<NetId>> = vec![None; u.bool_slots()];
    let mut next = 0u32;

    for (net, var) in u.vars() {
        if !var.used || var.is_global {
            continue;
        }
        if var.is_port {
            let pos = u.bool_port_position(net).ok_or_else(|| {
                StateError::inconsistent(
                    &u.name,
                    format!("port `{}` is missing from the port list", u.net_name(net)),
                )
            })?;
            if pos >= u.port_bools {
                return Err(StateError::inconsistent(
                    &u.name,
                    format!(
                        "port `{}` sits at position {pos} but only {} boolean ports are classified",
                        u.net_name(net),
                        u.port_bools
                    ),
                ));
            }
            bool_ports.insert(net, pos as i32 - u.port_bools as i32);
            slots[pos as usize] = Some(net);
        } else {
            bool_map.insert(net, next);
            slots[(u.port_bools + next) as usize] = Some(net);
            next += 1;
        }
    }

    if next != u.local_bools {
        return Err(StateError::inconsistent(
            &u.name,
            format!("numbered {next} local booleans, expected {}", u.local_bools),
        ));
    }
    let slot_nets = slots.into_iter().collect::<Option<Vec<_>>>().ok_or_else(|| {
        StateError::inconsistent(&u.name, "boolean port positions are not a permutation")
    })?;

    Ok(LocalNumbering {
        bool_map,
        bool_ports,
        port_bools: u.port_bools,
        slot_nets,
    })
}
