//! The `strata dump` command: print per-type state summaries.

use serde::Serialize;
use strata_diagnostics::DiagnosticSink;
use strata_ir::ProcessTypeId;
use strata_state::{hierarchy_order, StateInfo, StatePass, SubinstanceFlags, Summary};

use crate::project::{load_project, render_diagnostics, run_pass, Project};
use crate::{DumpArgs, GlobalArgs, ReportFormat};

/// JSON record for one process type.
#[derive(Serialize)]
struct DumpRecord<'a> {
    process: &'a str,
    black_box: bool,
    multiply_driven_as_subinstance: Option<SubinstanceFlags>,
    state: Option<&'a StateInfo>,
}

/// Runs the `strata dump` command.
pub fn run(args: &DumpArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let sink = DiagnosticSink::new();
    let Some(pass) = run_pass(&project, &sink) else {
        render_diagnostics(&sink, global);
        return Ok(1);
    };
    if !global.quiet {
        render_diagnostics(&sink, global);
    }

    let types = selected_types(&project, args.process.as_deref())?;
    match args.format {
        ReportFormat::Text => {
            for ty in types {
                print!("{}", pass.dump(&project.design, ty, &project.interner));
            }
        }
        ReportFormat::Json => {
            let records = records(&project, &pass, &types);
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(0)
}

fn selected_types(
    project: &Project,
    process: Option<&str>,
) -> Result<Vec<ProcessTypeId>, Box<dyn std::error::Error>> {
    let design = &project.design;
    match process {
        None => Ok(hierarchy_order(design, design.top)),
        Some(name) => project
            .interner
            .get(name)
            .and_then(|ident| design.find_type(ident))
            .map(|ty| vec![ty])
            .ok_or_else(|| format!("unknown process type `{name}`").into()),
    }
}

fn records<'a>(
    project: &'a Project,
    pass: &'a StatePass,
    types: &[ProcessTypeId],
) -> Vec<DumpRecord<'a>> {
    types
        .iter()
        .map(|&ty| {
            let process = project.interner.resolve(project.design.types[ty].name);
            match pass.summary_of(ty) {
                Summary::State(info) => DumpRecord {
                    process,
                    black_box: false,
                    multiply_driven_as_subinstance: Some(info.multiply_driven_as_subinstance()),
                    state: Some(info),
                },
                Summary::BlackBox | Summary::NotComputed => DumpRecord {
                    process,
                    black_box: true,
                    multiply_driven_as_subinstance: None,
                    state: None,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::Interner;
    use strata_config::load_config_from_str;

    fn project() -> Project {
        let config = load_config_from_str("[project]\nname = \"t\"\ntop = \"top\"\n").unwrap();
        let interner = Interner::new();
        let design = crate::input::parse_design(
            r#"{
                "nets": [{ "name": "a" }, { "name": "t" }],
                "processes": [
                    { "name": "bb", "black_box": true,
                      "vars": [{ "net": "a", "used": true, "is_port": true }],
                      "ports": [{ "net": "a", "direction": "input" }] },
                    { "name": "top",
                      "vars": [{ "net": "t", "used": true, "is_output": true }],
                      "instances": [{ "name": "u", "type": "bb", "connections": ["t"] }] }
                ]
            }"#,
            "top",
            &interner,
        )
        .unwrap();
        Project {
            config,
            design,
            interner,
        }
    }

    #[test]
    fn selects_named_or_all_types() {
        let p = project();
        assert_eq!(selected_types(&p, None).unwrap().len(), 2);
        assert_eq!(selected_types(&p, Some("bb")).unwrap().len(), 1);
        assert!(selected_types(&p, Some("missing")).is_err());
    }

    #[test]
    fn json_records_mark_black_boxes() {
        let p = project();
        let sink = DiagnosticSink::new();
        let pass = run_pass(&p, &sink).unwrap();
        let types = selected_types(&p, None).unwrap();
        let json = serde_json::to_value(records(&p, &pass, &types)).unwrap();
        assert_eq!(json[0]["process"], "bb");
        assert_eq!(json[0]["black_box"], true);
        assert!(json[0]["state"].is_null());
        assert_eq!(json[1]["state"]["local_bools"], 1);
    }
}
