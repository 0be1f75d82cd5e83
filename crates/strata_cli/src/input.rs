//! JSON design descriptions.
//!
//! The booleanizer's output is exchanged as a JSON file that refers to nets
//! and process types by name:
//!
//! ```json
//! {
//!   "nets": [{ "name": "s" }, { "name": "Vdd", "global": true }],
//!   "processes": [
//!     { "name": "inv",
//!       "vars": [{ "net": "s", "used": true, "is_port": true, "is_output": true }],
//!       "ports": [{ "net": "s", "direction": "output" }] },
//!     { "name": "top",
//!       "vars": [{ "net": "s", "used": true }],
//!       "instances": [{ "name": "u", "type": "inv", "array_size": 2,
//!                       "connections": ["s", "s"] }] }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use strata_common::Interner;
use strata_ir::{ClassifiedVar, Design, DesignBuilder, NetId, PortDirection, ProcessTypeId};

/// Errors reading a design description.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("cannot read design: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not a valid design description.
    #[error("invalid design description: {0}")]
    Json(#[from] serde_json::Error),
    /// A name was declared twice.
    #[error("duplicate {kind} `{name}`")]
    Duplicate {
        /// `net` or `process`.
        kind: &'static str,
        /// The repeated name.
        name: String,
    },
    /// A reference to an undeclared net.
    #[error("process `{process}` refers to unknown net `{net}`")]
    UnknownNet {
        /// The referring process.
        process: String,
        /// The missing net.
        net: String,
    },
    /// A reference to an undeclared process type.
    #[error("unknown process type `{0}`")]
    UnknownProcess(String),
}

#[derive(Debug, Deserialize)]
struct DesignFile {
    #[serde(default)]
    nets: Vec<NetDecl>,
    processes: Vec<ProcessDecl>,
}

#[derive(Debug, Deserialize)]
struct NetDecl {
    name: String,
    #[serde(default)]
    global: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct ProcessDecl {
    name: String,
    #[serde(default)]
    black_box: bool,
    /// `false` when booleanization never ran on this type.
    #[serde(default = "default_true")]
    booleanized: bool,
    #[serde(default)]
    vars: Vec<VarDecl>,
    #[serde(default)]
    ports: Vec<PortDecl>,
    #[serde(default)]
    concurrent_ports: Vec<PortDecl>,
    #[serde(default)]
    instances: Vec<InstanceDecl>,
}

#[derive(Debug, Deserialize)]
struct VarDecl {
    net: String,
    #[serde(flatten)]
    class: ClassifiedVar,
}

#[derive(Debug, Deserialize)]
struct PortDecl {
    net: String,
    direction: PortDirection,
    #[serde(default)]
    omit: bool,
}

#[derive(Debug, Deserialize)]
struct InstanceDecl {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    array_size: Option<u32>,
    #[serde(default)]
    connections: Vec<String>,
    #[serde(default)]
    concurrent_connections: Vec<String>,
}

/// Reads a design description from `path`.
pub fn load_design(path: &Path, top: &str, interner: &Interner) -> Result<Design, InputError> {
    let content = std::fs::read_to_string(path)?;
    parse_design(&content, top, interner)
}

/// Builds a design from its JSON description, rooted at the type named `top`.
pub fn parse_design(json: &str, top: &str, interner: &Interner) -> Result<Design, InputError> {
    let file: DesignFile = serde_json::from_str(json)?;
    let mut b = DesignBuilder::new(interner);

    let mut nets: HashMap<&str, NetId> = HashMap::new();
    for decl in &file.nets {
        let id = if decl.global {
            b.global_net(&decl.name)
        } else {
            b.net(&decl.name)
        };
        if nets.insert(decl.name.as_str(), id).is_some() {
            return Err(InputError::Duplicate {
                kind: "net",
                name: decl.name.clone(),
            });
        }
    }

    let mut types: HashMap<&str, ProcessTypeId> = HashMap::new();
    for decl in &file.processes {
        let id = b.process(&decl.name);
        if types.insert(decl.name.as_str(), id).is_some() {
            return Err(InputError::Duplicate {
                kind: "process",
                name: decl.name.clone(),
            });
        }
    }

    for decl in &file.processes {
        let ty = types[decl.name.as_str()];
        let net = |name: &str| {
            nets.get(name).copied().ok_or_else(|| InputError::UnknownNet {
                process: decl.name.clone(),
                net: name.to_string(),
            })
        };
        let nets_of = |names: &[String]| {
            names
                .iter()
                .map(|n| net(n.as_str()))
                .collect::<Result<Vec<_>, _>>()
        };

        for var in &decl.vars {
            b.var(ty, net(var.net.as_str())?, var.class);
        }
        for port in &decl.ports {
            if port.omit {
                b.omitted_port(ty, net(port.net.as_str())?, port.direction);
            } else {
                b.port(ty, net(port.net.as_str())?, port.direction);
            }
        }
        for port in &decl.concurrent_ports {
            if port.omit {
                b.omitted_concurrent_port(ty, net(port.net.as_str())?, port.direction);
            } else {
                b.concurrent_port(ty, net(port.net.as_str())?, port.direction);
            }
        }
        for inst in &decl.instances {
            let sub = *types
                .get(inst.ty.as_str())
                .ok_or_else(|| InputError::UnknownProcess(inst.ty.clone()))?;
            let connections = nets_of(&inst.connections)?;
            let idx = match inst.array_size {
                Some(size) => b.array_instance(ty, &inst.name, sub, size, &connections),
                None => b.instance(ty, &inst.name, sub, &connections),
            };
            b.concurrent_connections(ty, idx, &nets_of(&inst.concurrent_connections)?);
        }
        if decl.black_box {
            b.black_box(ty);
        }
        if !decl.booleanized {
            b.without_view(ty);
        }
    }

    let top = *types
        .get(top)
        .ok_or_else(|| InputError::UnknownProcess(top.to_string()))?;
    Ok(b.finish(top))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_INVERTERS: &str = r#"{
        "nets": [{ "name": "a" }, { "name": "s" }, { "name": "Vdd", "global": true }],
        "processes": [
            { "name": "inv",
              "vars": [{ "net": "a", "used": true, "is_port": true },
                       { "net": "s", "used": true, "is_port": true, "is_output": true }],
              "ports": [{ "net": "a", "direction": "input" },
                        { "net": "s", "direction": "output" }] },
            { "name": "top",
              "vars": [{ "net": "a", "used": true, "is_output": true },
                       { "net": "s", "used": true }],
              "instances": [{ "name": "u", "type": "inv", "array_size": 2,
                              "connections": ["a", "s", "a", "s"] }] }
        ]
    }"#;

    #[test]
    fn parses_processes_and_instances() {
        let interner = Interner::new();
        let design = parse_design(TWO_INVERTERS, "top", &interner).unwrap();
        assert_eq!(design.types.len(), 2);
        let top = design.top_type();
        assert_eq!(interner.resolve(top.name), "top");
        assert_eq!(top.instances[0].multiplicity(), 2);
        assert_eq!(top.instances[0].connections.len(), 4);
        let inv = &design.types[top.instances[0].ty];
        let view = inv.view.as_ref().unwrap();
        assert_eq!(view.connection_width(), 2);
        assert!(view.vars.values().any(|v| v.is_output && v.is_port));
    }

    #[test]
    fn unknown_top_is_rejected() {
        let interner = Interner::new();
        let err = parse_design(TWO_INVERTERS, "nope", &interner).unwrap_err();
        assert!(matches!(err, InputError::UnknownProcess(ref n) if n == "nope"));
    }

    #[test]
    fn unknown_net_is_rejected() {
        let interner = Interner::new();
        let json = r#"{ "processes": [{ "name": "p", "vars": [{ "net": "x", "used": true }] }] }"#;
        let err = parse_design(json, "p", &interner).unwrap_err();
        assert!(err.to_string().contains("unknown net `x`"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let interner = Interner::new();
        let json = r#"{ "nets": [{ "name": "x" }, { "name": "x" }], "processes": [] }"#;
        let err = parse_design(json, "p", &interner).unwrap_err();
        assert!(matches!(err, InputError::Duplicate { kind: "net", .. }));
    }

    #[test]
    fn unbooleanized_type_has_no_view() {
        let interner = Interner::new();
        let json = r#"{ "processes": [{ "name": "p", "booleanized": false, "black_box": true }] }"#;
        let design = parse_design(json, "p", &interner).unwrap();
        assert!(design.top_type().view.is_none());
        assert!(design.top_type().black_box);
    }
}
