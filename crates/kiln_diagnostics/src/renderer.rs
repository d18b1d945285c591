//! Human-readable rendering of compiler diagnostics.

use crate::diagnostic::Diagnostic;

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics in a compiler-style terminal format.
///
/// Produces output like:
/// ```text
/// error: type mismatch
///   --> src/main/scala/Foo.scala:10:5
///    |
/// 10 |   val x: Int = "a"
///    |     ^
/// ```
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn severity_label(&self, diag: &Diagnostic) -> String {
        if !self.color {
            return diag.severity.to_string();
        }
        let code = diag.severity.ansi_color();
        format!("\x1b[1;{code}m{}\x1b[0m", diag.severity)
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", self.severity_label(diag), diag.message);

        if diag.position.is_none() {
            return out;
        }
        out.push_str(&format!("  --> {}\n", diag.position));

        if let (Some(line), Some(content)) = (diag.position.line, &diag.position.line_content) {
            let line_num = line.to_string();
            let padding = " ".repeat(line_num.len());
            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {content}\n"));
            if let Some(column) = diag.position.column {
                let col_padding = " ".repeat((column as usize).saturating_sub(1));
                out.push_str(&format!("{padding} | {col_padding}^\n"));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    #[test]
    fn render_error_with_line() {
        let pos = Position::new("Foo.scala", 10, 5).with_line_content("val x: Int = \"a\"");
        let diag = Diagnostic::error("type mismatch", pos);
        let output = TerminalRenderer::new(false).render(&diag);

        assert!(output.starts_with("error: type mismatch\n"));
        assert!(output.contains("--> Foo.scala:10:5"));
        assert!(output.contains("10 | val x: Int = \"a\""));
        assert!(output.contains("   |     ^"));
    }

    #[test]
    fn render_without_position() {
        let diag = Diagnostic::warning("1 deprecation warning", Position::NONE);
        let output = TerminalRenderer::new(false).render(&diag);
        assert_eq!(output, "warning: 1 deprecation warning\n");
    }

    #[test]
    fn render_colored_severity() {
        let diag = Diagnostic::error("boom", Position::NONE);
        let output = TerminalRenderer::new(true).render(&diag);
        assert!(output.contains("\x1b[1;31merror\x1b[0m"));
    }
}
