//! Folding sub-instances into their parent.
//!
//! Totals come from the cached summaries of the instantiated types. The
//! connection scans then treat every sub-instance port as a reader or driver
//! of the parent net it is wired to.

use crate::alloc::LocalNumbering;
use crate::drivers::DriverTracker;
use crate::errors::StateError;
use crate::finalize::ConcurrentLayout;
use crate::info::{ConcurrentCounts, SubinstanceFlags};
use crate::pass::Summary;
use crate::universe::VarUniverse;
use indexmap::IndexMap;
use strata_ir::{BooleanizedView, Instance, NetId, ProcessTypeId, ViewPort};
use tracing::trace;

/// A sub-instance output wired to a parent driver slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubOutput {
    pub ty: ProcessTypeId,
    pub slot: usize,
}

/// `all_bools` and `all_concurrent` of the parent.
pub(crate) fn hierarchical_totals<'s>(
    u: &VarUniverse<'_>,
    summary_of: impl Fn(ProcessTypeId) -> Summary<'s>,
) -> Result<(u32, ConcurrentCounts), StateError> {
    let mut all_bools = u.local_bools;
    let mut all_concurrent = u.local_concurrent;
    for inst in &u.ty.instances {
        match summary_of(inst.ty) {
            Summary::State(sub) => {
                let size = inst.multiplicity();
                all_bools = size
                    .checked_mul(sub.all_bools)
                    .and_then(|n| all_bools.checked_add(n))
                    .ok_or_else(|| total_overflow(u, inst, "boolean"))?;
                all_concurrent = sub
                    .all_concurrent
                    .checked_scaled(size)
                    .and_then(|n| all_concurrent.checked_add(n))
                    .ok_or_else(|| total_overflow(u, inst, "concurrent"))?;
            }
            Summary::BlackBox => {}
            Summary::NotComputed => {
                return Err(StateError::SubtypeNotComputed {
                    process: u.name.clone(),
                    subtype: u.type_name(inst.ty),
                })
            }
        }
    }
    // Concurrent booleans are numbered after `all_bools` in the same space.
    if all_bools.checked_add(all_concurrent.bools).is_none() {
        return Err(StateError::inconsistent(
            &u.name,
            "boolean state does not fit a 32-bit index",
        ));
    }
    Ok((all_bools, all_concurrent))
}

fn total_overflow(u: &VarUniverse<'_>, inst: &Instance, view_label: &str) -> StateError {
    StateError::inconsistent(
        &u.name,
        format!(
            "{view_label} state of instance `{}` ({} copies) overflows the hierarchical total",
            u.resolve(inst.name),
            inst.multiplicity()
        ),
    )
}

fn sub_view<'d>(u: &VarUniverse<'d>, inst: &Instance) -> Result<&'d BooleanizedView, StateError> {
    let sub = u.design.types.try_get(inst.ty).ok_or_else(|| {
        StateError::inconsistent(
            &u.name,
            format!("instance refers to unknown process type #{}", inst.ty.as_raw()),
        )
    })?;
    sub.view.as_ref().ok_or_else(|| StateError::NoBooleanView {
        process: u.type_name(inst.ty),
    })
}

/// Walks `connections` element by element against the live `formals`.
fn scan_instance(
    u: &VarUniverse<'_>,
    inst: &Instance,
    formals: &[&ViewPort],
    connections: &[NetId],
    view_label: &str,
    mut resolve: impl FnMut(NetId) -> Result<Option<usize>, StateError>,
    tracker: &mut DriverTracker,
) -> Result<Vec<SubOutput>, StateError> {
    let expected = inst.multiplicity() as usize * formals.len();
    if connections.len() != expected {
        return Err(StateError::inconsistent(
            &u.name,
            format!(
                "instance `{}` has {} {view_label} connections, expected {expected}",
                u.resolve(inst.name),
                connections.len()
            ),
        ));
    }
    let mut outputs = Vec::new();
    if formals.is_empty() {
        return Ok(outputs);
    }
    for element in connections.chunks(formals.len()) {
        for (formal, &net) in formals.iter().zip(element) {
            if u.is_global_net(net) {
                continue;
            }
            let Some(slot) = resolve(net)? else {
                continue;
            };
            if formal.is_output() {
                if tracker.drive(slot) {
                    trace!(
                        "{}: `{}` has multiple drivers through `{}`",
                        u.name,
                        u.net_name(net),
                        u.type_name(inst.ty)
                    );
                }
                outputs.push(SubOutput { ty: inst.ty, slot });
            } else {
                tracker.read(slot);
            }
        }
    }
    Ok(outputs)
}

fn unresolved(u: &VarUniverse<'_>, net: NetId) -> StateError {
    StateError::inconsistent(
        &u.name,
        format!(
            "connected net `{}` is neither a local nor a port",
            u.net_name(net)
        ),
    )
}

/// Boolean-view connection scan over all sub-instances.
pub(crate) fn scan_bool_connections(
    u: &VarUniverse<'_>,
    numbering: &LocalNumbering,
    tracker: &mut DriverTracker,
) -> Result<Vec<SubOutput>, StateError> {
    let mut outputs = Vec::new();
    for inst in &u.ty.instances {
        let view = sub_view(u, inst)?;
        let formals: Vec<&ViewPort> = view.live_ports().collect();
        outputs.extend(scan_instance(
            u,
            inst,
            &formals,
            &inst.connections,
            "boolean",
            |net| numbering.slot(net).map(Some).ok_or_else(|| unresolved(u, net)),
            tracker,
        )?);
    }
    Ok(outputs)
}

/// Concurrent-view connection scan. Nets the parent uses in the boolean view
/// were already accounted for by [`scan_bool_connections`].
pub(crate) fn scan_concurrent_connections(
    u: &VarUniverse<'_>,
    layout: &ConcurrentLayout,
    tracker: &mut DriverTracker,
) -> Result<Vec<SubOutput>, StateError> {
    let mut outputs = Vec::new();
    for inst in &u.ty.instances {
        let view = sub_view(u, inst)?;
        let formals: Vec<&ViewPort> = view.live_concurrent_ports().collect();
        outputs.extend(scan_instance(
            u,
            inst,
            &formals,
            &inst.concurrent_connections,
            "concurrent",
            |net| {
                if u.var(net).is_some_and(|var| var.used) {
                    return Ok(None);
                }
                if let Some(slot) = layout.local_slot(net) {
                    return Ok(Some(slot));
                }
                match u.concurrent_port(net) {
                    Some(pos) => Ok(Some(pos.slot as usize)),
                    None => Err(unresolved(u, net)),
                }
            },
            tracker,
        )?);
    }
    Ok(outputs)
}

/// Sub-types that drive a slot which ended up multiply driven, with the view
/// the conflict was seen in.
pub(crate) fn subinstance_flags(
    bool_outputs: &[SubOutput],
    bools: &DriverTracker,
    concurrent_outputs: &[SubOutput],
    concurrent: &DriverTracker,
) -> IndexMap<ProcessTypeId, SubinstanceFlags> {
    let mut flags: IndexMap<ProcessTypeId, SubinstanceFlags> = IndexMap::new();
    for out in bool_outputs.iter().filter(|o| bools.is_multi(o.slot)) {
        flags.entry(out.ty).or_default().bools = true;
    }
    for out in concurrent_outputs
        .iter()
        .filter(|o| concurrent.is_multi(o.slot))
    {
        flags.entry(out.ty).or_default().concurrent = true;
    }
    flags
}
