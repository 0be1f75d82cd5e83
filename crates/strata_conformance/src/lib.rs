//! Conformance test helpers for the Strata state pass.
//!
//! Runs the pass over designs assembled with [`DesignBuilder`] and returns
//! structured results for assertion in integration tests.

#![warn(missing_docs)]

use strata_common::Interner;
use strata_config::{ProjectConfig, StateConfig};
use strata_diagnostics::{Diagnostic, DiagnosticSink, Severity};
use strata_ir::{
    ClassifiedVar, ConcurrentKind, Design, DesignBuilder, NetId, PortDirection, ProcessTypeId,
};
use strata_state::{StateError, StateInfo, StatePass};

/// Result of running the pass from a design's top.
pub struct PassResult {
    /// The pass with its cache, present when the run succeeded.
    pub pass: Option<StatePass>,
    /// The fatal error, if any.
    pub error: Option<StateError>,
    /// All diagnostics emitted during the run, fatal error included.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PassResult {
    /// The computed state of `ty`. Panics if the run failed or `ty` has no
    /// state.
    pub fn info(&self, ty: ProcessTypeId) -> &StateInfo {
        self.pass
            .as_ref()
            .and_then(|pass| pass.state_info(ty))
            .unwrap_or_else(|| panic!("no state for process type #{}", ty.as_raw()))
    }
}

/// Creates a minimal `ProjectConfig` with the given top process type.
pub fn make_config(top: &str) -> ProjectConfig {
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"
top = "{top}"
"#
    );
    toml::from_str(&toml_str).unwrap()
}

/// Creates a `ProjectConfig` with explicit `[state]` settings.
pub fn make_config_with_state(top: &str, black_box_mode: bool, warn: bool) -> ProjectConfig {
    let toml_str = format!(
        r#"
[project]
name = "conformance_test"
top = "{top}"

[state]
black_box_mode = {black_box_mode}
warn_no_local_driver = {warn}
"#
    );
    toml::from_str(&toml_str).unwrap()
}

/// Runs the pass over `design` from its top with default settings.
pub fn run_default(design: &Design, interner: &Interner) -> PassResult {
    run_with(design, interner, StateConfig::default())
}

/// Runs the pass over `design` from its top.
pub fn run_with(design: &Design, interner: &Interner, config: StateConfig) -> PassResult {
    let sink = DiagnosticSink::new();
    let mut pass = StatePass::new(config);
    let (pass, error) = match pass.run(design, design.top, interner, &sink) {
        Ok(()) => (Some(pass), None),
        Err(e) => {
            sink.emit(e.to_diagnostic());
            (None, Some(e))
        }
    };
    let diagnostics = sink.take_all();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    PassResult {
        pass,
        error,
        diagnostics,
        warning_count,
    }
}

/// Names of the nets flagged multiply driven in `info`, sorted.
pub fn multiply_driven_names(design: &Design, interner: &Interner, info: &StateInfo) -> Vec<String> {
    let mut names: Vec<String> = info
        .multiply_driven_nets()
        .map(|net| net_name(design, interner, net))
        .collect();
    names.sort();
    names
}

/// The name of `net`.
pub fn net_name(design: &Design, interner: &Interner, net: NetId) -> String {
    interner.resolve(design.nets[net].name).to_string()
}

/// Adds a one-input, one-output boolean process type named `name`.
///
/// Returns the type and its `(input, output)` nets.
pub fn buffer_type(b: &mut DesignBuilder<'_>, name: &str) -> (ProcessTypeId, NetId, NetId) {
    let ty = b.process(name);
    let a = b.net(&format!("{name}.a"));
    let y = b.net(&format!("{name}.y"));
    b.var(ty, a, ClassifiedVar::boolean().port())
        .var(ty, y, ClassifiedVar::boolean().port().output())
        .port(ty, a, PortDirection::Input)
        .port(ty, y, PortDirection::Output);
    (ty, a, y)
}

/// Adds a concurrent-only process type named `name` with one input and one
/// output port of `kind`.
///
/// Returns the type and its `(input, output)` nets.
pub fn pipe_type(
    b: &mut DesignBuilder<'_>,
    name: &str,
    kind: ConcurrentKind,
) -> (ProcessTypeId, NetId, NetId) {
    let ty = b.process(name);
    let i = b.net(&format!("{name}.i"));
    let o = b.net(&format!("{name}.o"));
    b.var(ty, i, ClassifiedVar::concurrent(kind).port())
        .var(ty, o, ClassifiedVar::concurrent(kind).port().output())
        .concurrent_port(ty, i, PortDirection::Input)
        .concurrent_port(ty, o, PortDirection::Output);
    (ty, i, o)
}
