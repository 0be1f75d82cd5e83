//! Diagnostic creation, severity management, and terminal rendering.
//!
//! Passes report advisory findings as structured [`Diagnostic`] values into a
//! thread-safe [`DiagnosticSink`]; the CLI renders them with
//! [`TerminalRenderer`] or serializes them as JSON.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
