//! Project discovery shared by the CLI commands.
//!
//! Locates `strata.toml`, loads it, reads the JSON design it points to and
//! runs the state pass from the configured top.

use std::path::{Path, PathBuf};

use strata_common::Interner;
use strata_config::{ProjectConfig, CONFIG_FILE_NAME};
use strata_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use strata_ir::Design;
use strata_state::StatePass;
use tracing::info;

use crate::input;
use crate::GlobalArgs;

/// A loaded project: its configuration and the design it describes.
pub struct Project {
    /// The parsed `strata.toml`.
    pub config: ProjectConfig,
    /// The design read from `project.design`.
    pub design: Design,
    /// Names used by the design.
    pub interner: Interner,
}

/// Walks up from `start` looking for the nearest directory containing `strata.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the configuration file from global CLI args.
///
/// `--config` may name the file itself or the directory holding it; without
/// it the search starts at the current directory.
pub fn resolve_config_path(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_dir() {
                Ok(p.join(CONFIG_FILE_NAME))
            } else {
                Ok(p)
            }
        }
        None => Ok(find_project_root(&std::env::current_dir()?)?.join(CONFIG_FILE_NAME)),
    }
}

/// Loads the configuration and the design it points to.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    let config_path = resolve_config_path(global)?;
    let config = strata_config::load_config_file(&config_path)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    let design_path = base.join(&config.project.design);
    info!("loading design from {}", design_path.display());

    let interner = Interner::new();
    let design = input::load_design(&design_path, &config.project.top, &interner)?;
    Ok(Project {
        config,
        design,
        interner,
    })
}

/// Runs the pass from the design's top. A fatal error is reported into
/// `sink` and yields `None`.
pub fn run_pass(project: &Project, sink: &DiagnosticSink) -> Option<StatePass> {
    let mut pass = StatePass::new(project.config.state);
    match pass.run(
        &project.design,
        project.design.top,
        &project.interner,
        sink,
    ) {
        Ok(()) => Some(pass),
        Err(e) => {
            sink.emit(e.to_diagnostic());
            None
        }
    }
}

/// Prints every diagnostic in `sink` to stderr.
pub fn render_diagnostics(sink: &DiagnosticSink, global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in sink.diagnostics() {
        eprint!("{}", renderer.render(&diag));
    }
}
