//! The memoized driver of the state pass.
//!
//! [`StatePass`] owns one [`StateInfo`] per computed process type. A run is a
//! post-order walk of the instance hierarchy: children are computed before
//! their parents and every type is computed at most once, however many times
//! it is instantiated.

use std::collections::HashMap;

use strata_common::Interner;
use strata_config::StateConfig;
use strata_diagnostics::DiagnosticSink;
use strata_ir::{Design, ProcessTypeId};
use tracing::debug;

use crate::aggregate;
use crate::alloc::allocate;
use crate::drivers::{scan_local_bools, scan_local_concurrent, DriverTracker};
use crate::errors::StateError;
use crate::finalize::ConcurrentLayout;
use crate::info::StateInfo;
use crate::undriven::report_undriven;
use crate::universe::VarUniverse;

/// What the pass knows about one process type.
#[derive(Debug, Clone, Copy)]
pub enum Summary<'a> {
    /// The type was computed.
    State(&'a StateInfo),
    /// The type is a black box and has no state of its own.
    BlackBox,
    /// The type has not been computed (yet).
    NotComputed,
}

#[derive(Debug, Clone)]
enum Entry {
    Computed(StateInfo),
    BlackBox,
}

/// State allocation and multi-driver detection, memoized per process type.
#[derive(Debug)]
pub struct StatePass {
    config: StateConfig,
    cache: HashMap<ProcessTypeId, Entry>,
    /// Types whose subtree is being walked (for cycle detection).
    stack: Vec<ProcessTypeId>,
}

impl StatePass {
    /// Creates an empty pass.
    pub fn new(config: StateConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// The configuration this pass runs with.
    pub fn config(&self) -> StateConfig {
        self.config
    }

    /// Computes every type reachable from `root`, children first.
    ///
    /// Types already in the cache are not recomputed. Undriven-local warnings
    /// go to `sink`; any `Err` means the design is unusable.
    pub fn run(
        &mut self,
        design: &Design,
        root: ProcessTypeId,
        interner: &Interner,
        sink: &DiagnosticSink,
    ) -> Result<(), StateError> {
        self.stack.clear();
        let result = self.visit(design, root, interner, sink);
        self.stack.clear();
        result
    }

    fn visit(
        &mut self,
        design: &Design,
        ty: ProcessTypeId,
        interner: &Interner,
        sink: &DiagnosticSink,
    ) -> Result<(), StateError> {
        if self.cache.contains_key(&ty) {
            return Ok(());
        }
        if self.stack.contains(&ty) {
            return Err(StateError::CyclicInstantiation {
                process: type_name(design, ty, interner),
            });
        }
        let process = design.types.try_get(ty).ok_or_else(|| unknown_type(ty))?;

        self.stack.push(ty);
        for inst in &process.instances {
            self.visit(design, inst.ty, interner, sink)?;
        }
        self.stack.pop();

        self.run_type(design, ty, interner, sink)
    }

    /// Computes a single type whose sub-types are already in the cache.
    ///
    /// This is the entry point for callers that schedule types themselves.
    /// A sub-type missing from the cache is `SubtypeNotComputed`. Calling it
    /// again for a cached type does nothing.
    pub fn run_type(
        &mut self,
        design: &Design,
        ty: ProcessTypeId,
        interner: &Interner,
        sink: &DiagnosticSink,
    ) -> Result<(), StateError> {
        if self.cache.contains_key(&ty) {
            return Ok(());
        }
        let process = design.types.try_get(ty).ok_or_else(|| unknown_type(ty))?;

        // A black box still needs a view, but its port tables are not read.
        if self.config.black_box_mode && process.black_box {
            let name = type_name(design, ty, interner);
            if process.view.is_none() {
                return Err(StateError::NoBooleanView { process: name });
            }
            debug!("{name}: black box, no local state");
            self.cache.insert(ty, Entry::BlackBox);
            return Ok(());
        }
        let u = VarUniverse::new(design, process, interner)?;

        let numbering = allocate(&u)?;
        let layout = ConcurrentLayout::new(&u)?;

        let mut bools = DriverTracker::new(u.bool_slots());
        let mut concurrent = DriverTracker::new(u.concurrent_slots());
        scan_local_bools(&u, &numbering, &mut bools);
        scan_local_concurrent(&u, &layout, &mut concurrent);

        let cached: &StatePass = self;
        let (all_bools, all_concurrent) =
            aggregate::hierarchical_totals(&u, |sub| cached.summary_of(sub))?;
        let bool_outputs = aggregate::scan_bool_connections(&u, &numbering, &mut bools)?;
        let concurrent_outputs =
            aggregate::scan_concurrent_connections(&u, &layout, &mut concurrent)?;

        if self.config.warn_no_local_driver {
            report_undriven(
                &u,
                &bools,
                &numbering.slot_nets,
                u.port_bools as usize,
                sink,
            );
            report_undriven(
                &u,
                &concurrent,
                &layout.slot_nets,
                layout.first_local_slot(),
                sink,
            );
        }

        let child_flags = aggregate::subinstance_flags(
            &bool_outputs,
            &bools,
            &concurrent_outputs,
            &concurrent,
        );

        let concurrent_ports = layout.ports.clone();
        let concurrent_slot_nets = layout.slot_nets.clone();
        let info = StateInfo {
            process: ty,
            bool_map: numbering.bool_map,
            bool_ports: numbering.bool_ports,
            concurrent_map: layout.finish(all_bools),
            concurrent_ports,
            local_bools: u.local_bools,
            port_bools: u.port_bools,
            all_bools,
            local_concurrent: u.local_concurrent,
            port_concurrent: u.port_concurrent,
            all_concurrent,
            multi_driver_bools: bools.into_multi(),
            multi_driver_concurrent: concurrent.into_multi(),
            bool_slot_nets: numbering.slot_nets,
            concurrent_slot_nets,
            subinstance: Default::default(),
        };
        debug!(
            "{}: {} local / {} port / {} total booleans, concurrent {:?} local / {:?} total, {} multi-driven",
            u.name,
            info.local_bools,
            info.port_bools,
            info.all_bools,
            info.local_concurrent,
            info.all_concurrent,
            info.multi_driver_bools.count_ones() + info.multi_driver_concurrent.count_ones()
        );
        self.cache.insert(ty, Entry::Computed(info));

        for (sub, flags) in child_flags {
            if let Some(Entry::Computed(sub_info)) = self.cache.get_mut(&sub) {
                sub_info.mark_multiply_driven_as_subinstance(flags);
            }
        }
        Ok(())
    }

    /// What is known about `ty`.
    pub fn summary_of(&self, ty: ProcessTypeId) -> Summary<'_> {
        match self.cache.get(&ty) {
            Some(Entry::Computed(info)) => Summary::State(info),
            Some(Entry::BlackBox) => Summary::BlackBox,
            None => Summary::NotComputed,
        }
    }

    /// The computed state of `ty`; `None` for black boxes and unknown types.
    pub fn state_info(&self, ty: ProcessTypeId) -> Option<&StateInfo> {
        match self.summary_of(ty) {
            Summary::State(info) => Some(info),
            _ => None,
        }
    }

    /// Number of cached types, black boxes included.
    pub fn computed_types(&self) -> usize {
        self.cache.len()
    }

    /// Drops every cached result.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.stack.clear();
    }
}

pub(crate) fn type_name(design: &Design, ty: ProcessTypeId, interner: &Interner) -> String {
    match design.types.try_get(ty) {
        Some(t) => interner.display_name(t.name),
        None => format!("#{}", ty.as_raw()),
    }
}

fn unknown_type(ty: ProcessTypeId) -> StateError {
    StateError::inconsistent(&format!("#{}", ty.as_raw()), "unknown process type")
}
