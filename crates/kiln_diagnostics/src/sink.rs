//! Thread-safe diagnostic accumulator for a compile run.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default cap on stored error diagnostics.
pub const DEFAULT_MAX_ERRORS: usize = 100;

/// A thread-safe accumulator for diagnostics reported during a compile.
///
/// Every reported diagnostic is also logged through `tracing` at a matching
/// level. Errors beyond `max_errors` are counted but neither stored nor
/// logged, so a cascade of follow-up errors does not flood the output.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
    warning_count: AtomicUsize,
    max_errors: usize,
}

impl DiagnosticSink {
    /// Creates a new empty sink with the default error cap.
    pub fn new() -> Self {
        Self::with_max_errors(DEFAULT_MAX_ERRORS)
    }

    /// Creates a new empty sink storing at most `max_errors` errors.
    pub fn with_max_errors(max_errors: usize) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
            warning_count: AtomicUsize::new(0),
            max_errors,
        }
    }

    /// Reports a diagnostic into the sink.
    pub fn emit(&self, diag: Diagnostic) {
        match diag.severity {
            Severity::Error => {
                let seen = self.error_count.fetch_add(1, Ordering::Relaxed);
                if seen >= self.max_errors {
                    return;
                }
                tracing::error!("{}: {}", diag.position, diag.message);
            }
            Severity::Warning => {
                self.warning_count.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("{}: {}", diag.position, diag.message);
            }
            Severity::Info => tracing::info!("{}", diag.message),
        }
        self.diagnostics.lock().push(diag);
    }

    /// Reports every diagnostic in `diags`, in order.
    pub fn emit_all(&self, diags: impl IntoIterator<Item = Diagnostic>) {
        for diag in diags {
            self.emit(diag);
        }
    }

    /// Returns `true` if any error-severity diagnostics have been reported.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Returns the number of errors reported, including those over the cap.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Returns the number of warnings reported.
    pub fn warning_count(&self) -> usize {
        self.warning_count.load(Ordering::Relaxed)
    }

    /// Takes all stored diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    /// Returns a snapshot of all stored diagnostics without draining.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn make_error() -> Diagnostic {
        Diagnostic::error("type mismatch", Position::new("A.scala", 1, 1))
    }

    fn make_warning() -> Diagnostic {
        Diagnostic::warning("unused import", Position::new("B.scala", 2, 1))
    }

    #[test]
    fn empty_sink() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        assert_eq!(sink.error_count(), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn emit_error() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn emit_warning_not_error() {
        let sink = DiagnosticSink::new();
        sink.emit(make_warning());
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn errors_over_cap_are_counted_not_stored() {
        let sink = DiagnosticSink::with_max_errors(2);
        sink.emit_all((0..5).map(|_| make_error()));
        sink.emit(make_warning());
        assert_eq!(sink.error_count(), 5);
        assert_eq!(sink.diagnostics().len(), 3);
    }

    #[test]
    fn take_all_drains() {
        let sink = DiagnosticSink::new();
        sink.emit(make_error());
        sink.emit(make_warning());
        assert_eq!(sink.take_all().len(), 2);
        assert!(sink.take_all().is_empty());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn thread_safety() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::with_max_errors(usize::MAX));
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for _ in 0..100 {
                        sink.emit(make_error());
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sink.error_count(), 1000);
        assert_eq!(sink.diagnostics().len(), 1000);
    }
}
