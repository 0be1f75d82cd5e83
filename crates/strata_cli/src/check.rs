//! The `strata check` command: run the pass and report findings.
//!
//! Fatal pass errors and undriven-local warnings are rendered like any other
//! diagnostic; multiply-driven nets are listed per process type.

use strata_diagnostics::{DiagnosticSink, Severity};
use strata_state::{hierarchy_order, StatePass};

use crate::project::{load_project, render_diagnostics, run_pass, Project};
use crate::{CheckArgs, GlobalArgs, ReportFormat};

/// Runs the `strata check` command. Returns exit code 1 on a fatal error.
pub fn run(args: &CheckArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!("   Checking {}", project.config.project.name);
    }

    let sink = DiagnosticSink::new();
    let pass = run_pass(&project, &sink);

    match args.format {
        ReportFormat::Text => {
            render_diagnostics(&sink, global);
            if let Some(ref pass) = pass {
                if !global.quiet {
                    for line in multi_driver_report(&project, pass) {
                        eprintln!("{line}");
                    }
                }
            }
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&sink.diagnostics())?;
            println!("{json}");
        }
    }

    let diagnostics = sink.diagnostics();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Result: {} error(s), {} warning(s)",
            sink.error_count(),
            warnings
        );
    }

    Ok(if sink.has_errors() { 1 } else { 0 })
}

/// One line per multiply-driven net, grouped by process type.
fn multi_driver_report(project: &Project, pass: &StatePass) -> Vec<String> {
    let design = &project.design;
    let interner = &project.interner;
    let mut lines = Vec::new();
    for ty in hierarchy_order(design, design.top) {
        let Some(info) = pass.state_info(ty) else {
            continue;
        };
        let process = interner.resolve(design.types[ty].name);
        for net in info.multiply_driven_nets() {
            let name = interner.resolve(design.nets[net].name);
            lines.push(format!("   multi-driver: `{name}` in process `{process}`"));
        }
    }
    lines
}
