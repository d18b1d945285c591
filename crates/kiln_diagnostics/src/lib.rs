//! Compiler diagnostics as reported by the wrapped compiler.
//!
//! This crate provides [`Diagnostic`] messages with a severity and an
//! optional source [`Position`], the thread-safe [`DiagnosticSink`] that
//! accumulates them during a compile (with a cap on stored errors), and a
//! [`TerminalRenderer`] for human-readable output. Positions are carried
//! through unchanged; no remapping is performed.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod position;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use diagnostic::Diagnostic;
pub use position::Position;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
