//! Fatal errors and diagnostic codes of the state pass.
//!
//! `E301`–`E304` mirror the fatal [`StateError`] variants so the CLI can render
//! them like any other diagnostic. `W301` is the undriven-local warning.

use strata_common::InternalError;
use strata_diagnostics::{Category, Diagnostic, DiagnosticCode};

/// Process type has no booleanized view.
pub const E301: DiagnosticCode = DiagnosticCode::new(Category::Error, 301);

/// Port lists, classified variables and connection arrays disagree.
pub const E302: DiagnosticCode = DiagnosticCode::new(Category::Error, 302);

/// The instance graph is not acyclic.
pub const E303: DiagnosticCode = DiagnosticCode::new(Category::Error, 303);

/// A sub-type was not computed before its parent.
pub const E304: DiagnosticCode = DiagnosticCode::new(Category::Error, 304);

/// Local variable is read but never driven.
pub const W301: DiagnosticCode = DiagnosticCode::new(Category::Warning, 301);

/// A failure that aborts the pass for the whole design.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Booleanization never produced a view for this type.
    #[error("process `{process}` does not have a booleanized view")]
    NoBooleanView {
        /// The offending process type.
        process: String,
    },

    /// The hierarchical tables of a type are internally inconsistent.
    #[error("process `{process}`: inconsistent tables: {detail}")]
    InconsistentTables {
        /// The process type whose tables disagree.
        process: String,
        /// What disagreed.
        detail: String,
    },

    /// A type was reached again while it was still being computed.
    #[error("process `{process}` instantiates itself")]
    CyclicInstantiation {
        /// The process type found on the cycle.
        process: String,
    },

    /// A parent was computed before one of its sub-types.
    #[error("process `{process}`: sub-type `{subtype}` has not been computed")]
    SubtypeNotComputed {
        /// The parent being computed.
        process: String,
        /// The missing sub-type.
        subtype: String,
    },
}

impl StateError {
    pub(crate) fn inconsistent(process: &str, detail: impl Into<String>) -> Self {
        StateError::InconsistentTables {
            process: process.to_string(),
            detail: detail.into(),
        }
    }

    /// The process type this error is about.
    pub fn process(&self) -> &str {
        match self {
            StateError::NoBooleanView { process }
            | StateError::InconsistentTables { process, .. }
            | StateError::CyclicInstantiation { process }
            | StateError::SubtypeNotComputed { process, .. } => process,
        }
    }

    /// The diagnostic code reported for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            StateError::NoBooleanView { .. } => E301,
            StateError::InconsistentTables { .. } => E302,
            StateError::CyclicInstantiation { .. } => E303,
            StateError::SubtypeNotComputed { .. } => E304,
        }
    }

    /// Converts the error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string()).in_process(self.process());
        match self {
            StateError::NoBooleanView { .. } => {
                diag.with_help("run booleanization on every process type before state allocation")
            }
            StateError::InconsistentTables { .. } => {
                diag.with_note("the instance connection arrays must follow the sub-type port lists")
            }
            _ => diag,
        }
    }
}

impl From<StateError> for InternalError {
    fn from(err: StateError) -> Self {
        InternalError::new(err.to_string())
    }
}

/// Builds the `W301` warning for a local variable without a driver.
pub fn warning_undriven(process: &str, variable: &str) -> Diagnostic {
    Diagnostic::warning(
        W301,
        format!("local variable `{variable}` has no driver"),
    )
    .in_process(process)
    .with_help("drive the variable or remove its readers")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_diagnostics::Severity;

    #[test]
    fn display_names_process() {
        let err = StateError::NoBooleanView {
            process: "adder".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "process `adder` does not have a booleanized view"
        );
        assert_eq!(err.process(), "adder");
    }

    #[test]
    fn diagnostic_carries_code_and_process() {
        let err = StateError::inconsistent("top", "connection count 3, expected 2");
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, E302);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.process.as_deref(), Some("top"));
        assert!(diag.message.contains("connection count 3"));
    }

    #[test]
    fn converts_to_internal_error() {
        let err = StateError::CyclicInstantiation {
            process: "loop".to_string(),
        };
        let internal: InternalError = err.into();
        assert!(internal.message.contains("loop"));
    }

    #[test]
    fn undriven_warning_text() {
        let diag = warning_undriven("top", "t");
        assert_eq!(diag.code, W301);
        assert_eq!(diag.message, "local variable `t` has no driver");
        assert_eq!(diag.process.as_deref(), Some("top"));
    }
}
