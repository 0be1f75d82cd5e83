//! The booleanized view of a process type.
//!
//! Booleanization runs before the state pass and classifies every net a
//! process touches. Its output for one process type is a [`BooleanizedView`]:
//! the classified variables plus the boolean-view and concurrent-view port
//! lists. The state pass only reads it.

use crate::ids::NetId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The kind of a concurrent-view variable. Each kind has its own index space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrentKind {
    /// A plain boolean.
    Bool,
    /// An integer.
    Int,
    /// A channel.
    Chan,
}

/// The classification of one net from the point of view of one process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifiedVar {
    /// Appears in the boolean view.
    pub used: bool,
    /// Appears in the concurrent view.
    pub used_concurrent: bool,
    /// Is one of the process's boolean-view ports.
    pub is_port: bool,
    /// Is one of the process's concurrent-view ports.
    pub is_concurrent_port: bool,
    /// Refers to a global net.
    pub is_global: bool,
    /// The process drives this variable.
    pub is_output: bool,
    /// Concurrent integer.
    pub is_int: bool,
    /// Concurrent channel.
    pub is_channel: bool,
}

impl ClassifiedVar {
    /// A variable used in the boolean view.
    pub fn boolean() -> Self {
        Self {
            used: true,
            ..Self::default()
        }
    }

    /// A variable used only in the concurrent view.
    pub fn concurrent(kind: ConcurrentKind) -> Self {
        Self {
            used_concurrent: true,
            is_int: kind == ConcurrentKind::Int,
            is_channel: kind == ConcurrentKind::Chan,
            ..Self::default()
        }
    }

    /// Marks the variable as also appearing in the concurrent view.
    pub fn also_concurrent(mut self) -> Self {
        self.used_concurrent = true;
        self
    }

    /// Marks the variable as driven by this process.
    pub fn output(mut self) -> Self {
        self.is_output = true;
        self
    }

    /// Marks the variable as a port in every view it is used in.
    pub fn port(mut self) -> Self {
        self.is_port = self.used;
        self.is_concurrent_port = self.used_concurrent;
        self
    }

    /// Marks the variable as referring to a global net.
    pub fn global(mut self) -> Self {
        self.is_global = true;
        self
    }

    /// Returns `true` if the variable appears in the concurrent view only.
    pub fn is_concurrent_only(&self) -> bool {
        self.used_concurrent && !self.used
    }

    /// The concurrent index space this variable belongs to.
    pub fn kind(&self) -> ConcurrentKind {
        if self.is_channel {
            ConcurrentKind::Chan
        } else if self.is_int {
            ConcurrentKind::Int
        } else {
            ConcurrentKind::Bool
        }
    }
}

/// Direction of a port as seen from inside the process that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Data flows into the process.
    Input,
    /// The process drives the port.
    Output,
}

/// One entry of a port list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPort {
    /// The net bound to the port inside the process.
    pub net: NetId,
    /// The port direction.
    pub direction: PortDirection,
    /// The port is absent from this specialization; instantiators have no
    /// connection entry for it.
    #[serde(default)]
    pub omit: bool,
}

impl ViewPort {
    /// Returns `true` if the process drives this port.
    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }
}

/// Booleanization output for one process type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BooleanizedView {
    /// Every net the process references, in booleanization order.
    pub vars: IndexMap<NetId, ClassifiedVar>,
    /// Boolean-view ports in declaration order.
    pub ports: Vec<ViewPort>,
    /// Concurrent-view ports in declaration order.
    pub concurrent_ports: Vec<ViewPort>,
}

impl BooleanizedView {
    /// Non-omitted boolean-view ports, in order.
    pub fn live_ports(&self) -> impl Iterator<Item = &ViewPort> {
        self.ports.iter().filter(|p| !p.omit)
    }

    /// Non-omitted concurrent-view ports, in order.
    pub fn live_concurrent_ports(&self) -> impl Iterator<Item = &ViewPort> {
        self.concurrent_ports.iter().filter(|p| !p.omit)
    }

    /// Number of entries an instantiator supplies per array element for the
    /// boolean view.
    pub fn connection_width(&self) -> usize {
        self.live_ports().count()
    }

    /// Number of entries an instantiator supplies per array element for the
    /// concurrent view.
    pub fn concurrent_connection_width(&self) -> usize {
        self.live_concurrent_ports().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrent_only() {
        assert!(ClassifiedVar::concurrent(ConcurrentKind::Int).is_concurrent_only());
        assert!(!ClassifiedVar::boolean().also_concurrent().is_concurrent_only());
        assert!(!ClassifiedVar::boolean().is_concurrent_only());
    }

    #[test]
    fn kind_prefers_channel() {
        let mut v = ClassifiedVar::concurrent(ConcurrentKind::Int);
        assert_eq!(v.kind(), ConcurrentKind::Int);
        v.is_channel = true;
        assert_eq!(v.kind(), ConcurrentKind::Chan);
        assert_eq!(ClassifiedVar::boolean().kind(), ConcurrentKind::Bool);
    }

    #[test]
    fn port_follows_usage() {
        let v = ClassifiedVar::boolean().port();
        assert!(v.is_port && !v.is_concurrent_port);
        let c = ClassifiedVar::concurrent(ConcurrentKind::Chan).port();
        assert!(!c.is_port && c.is_concurrent_port);
    }

    #[test]
    fn live_ports_skip_omitted() {
        let view = BooleanizedView {
            vars: IndexMap::new(),
            ports: vec![
                ViewPort {
                    net: NetId::from_raw(0),
                    direction: PortDirection::Input,
                    omit: true,
                },
                ViewPort {
                    net: NetId::from_raw(1),
                    direction: PortDirection::Output,
                    omit: false,
                },
            ],
            concurrent_ports: Vec::new(),
        };
        assert_eq!(view.connection_width(), 1);
        assert_eq!(view.concurrent_connection_width(), 0);
        assert!(view.live_ports().all(|p| p.is_output()));
    }

    #[test]
    fn classified_var_json_defaults() {
        let v: ClassifiedVar = serde_json::from_str(r#"{"used": true, "is_output": true}"#).unwrap();
        assert_eq!(v, ClassifiedVar::boolean().output());
    }
}
