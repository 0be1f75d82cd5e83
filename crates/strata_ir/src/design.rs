//! Top-level design container.

use crate::arena::Arena;
use crate::ids::{NetId, ProcessTypeId};
use crate::net::Net;
use crate::process::ProcessType;
use serde::{Deserialize, Serialize};

/// A complete elaborated and booleanized design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// Every net in the design.
    pub nets: Arena<NetId, Net>,
    /// Every process type in the design.
    pub types: Arena<ProcessTypeId, ProcessType>,
    /// The root of the instance hierarchy.
    pub top: ProcessTypeId,
}

impl Design {
    /// Returns the root process type.
    pub fn top_type(&self) -> &ProcessType {
        &self.types[self.top]
    }

    /// Finds a process type by name.
    pub fn find_type(&self, name: strata_common::Ident) -> Option<ProcessTypeId> {
        self.types
            .iter()
            .find(|(_, ty)| ty.name == name)
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::Ident;

    fn make_design() -> Design {
        let mut nets = Arena::new();
        nets.alloc(Net {
            id: NetId::from_raw(0),
            name: Ident::from_raw(0),
            global: true,
        });
        let mut types = Arena::new();
        let top = types.alloc(ProcessType {
            id: ProcessTypeId::from_raw(0),
            name: Ident::from_raw(1),
            black_box: false,
            instances: Vec::new(),
            view: None,
        });
        Design { nets, types, top }
    }

    #[test]
    fn top_and_lookup() {
        let design = make_design();
        assert_eq!(design.top_type().name, Ident::from_raw(1));
        assert_eq!(design.find_type(Ident::from_raw(1)), Some(design.top));
        assert_eq!(design.find_type(Ident::from_raw(9)), None);
        assert!(design.nets[NetId::from_raw(0)].global);
    }

    #[test]
    fn serde_roundtrip() {
        let design = make_design();
        let json = serde_json::to_string(&design).unwrap();
        let restored: Design = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.types.len(), 1);
        assert_eq!(restored.top, design.top);
    }
}
