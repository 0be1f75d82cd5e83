//! Configuration types deserialized from `strata.toml`.

use serde::Deserialize;

/// The top-level configuration parsed from `strata.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Project metadata and the design to analyze.
    pub project: ProjectMeta,
    /// State allocation pass settings.
    #[serde(default)]
    pub state: StateConfig,
}

/// Project metadata.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// Name of the process type the pass starts from.
    pub top: String,
    /// Path to the JSON design description, relative to the config file.
    #[serde(default = "default_design_path")]
    pub design: String,
}

fn default_design_path() -> String {
    "design.json".to_string()
}

/// Knobs of the state allocation pass.
///
/// Passed by value into the pass at construction; the pass keeps no other
/// configuration state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StateConfig {
    /// Skip process types flagged as black boxes; they get no state summary
    /// and contribute nothing to their parents' totals.
    #[serde(default = "default_true")]
    pub black_box_mode: bool,
    /// Warn about local variables that are read but never driven.
    #[serde(default = "default_true")]
    pub warn_no_local_driver: bool,
}

fn default_true() -> bool {
    true
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            black_box_mode: true,
            warn_no_local_driver: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_defaults() {
        let cfg = StateConfig::default();
        assert!(cfg.black_box_mode);
        assert!(cfg.warn_no_local_driver);
    }

    #[test]
    fn partial_state_section_keeps_defaults() {
        let cfg: StateConfig = toml::from_str("warn_no_local_driver = false").unwrap();
        assert!(cfg.black_box_mode);
        assert!(!cfg.warn_no_local_driver);
    }
}
