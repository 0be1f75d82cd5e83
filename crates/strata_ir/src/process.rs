//! Process types and their sub-instances.

use crate::ids::{NetId, ProcessTypeId};
use crate::view::BooleanizedView;
use serde::{Deserialize, Serialize};
use strata_common::Ident;

/// A hierarchical process definition, possibly instantiated many times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessType {
    /// The ID of this type in the design.
    pub id: ProcessTypeId,
    /// The type name.
    pub name: Ident,
    /// The type is opaque: its internals are not analyzed in black-box mode.
    pub black_box: bool,
    /// Sub-instances in declaration order.
    pub instances: Vec<Instance>,
    /// Booleanization output. `None` means booleanization never ran on this
    /// type, which the state pass treats as fatal.
    pub view: Option<BooleanizedView>,
}

/// An instantiation of a process type inside another one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// The instance name.
    pub name: Ident,
    /// The instantiated type.
    pub ty: ProcessTypeId,
    /// Number of elements for arrayed instances.
    pub array_size: Option<u32>,
    /// Parent nets bound to the sub-type's non-omitted boolean ports, element
    /// by element, in port order.
    pub connections: Vec<NetId>,
    /// Parent nets bound to the sub-type's non-omitted concurrent ports,
    /// laid out like `connections`.
    pub concurrent_connections: Vec<NetId>,
}

impl Instance {
    /// Number of array elements (1 for a scalar instance).
    pub fn multiplicity(&self) -> u32 {
        self.array_size.unwrap_or(1)
    }
}
