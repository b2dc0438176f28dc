//! Diagnostics for every compilation phase.
//!
//! Phases never abort on the first problem: they push [`Diagnostic`]s into an ordered list and the driver
//! decides, after the phase completes, whether to continue. Rendering goes through `miette` so the CLI can show
//! the offending source line with a labelled span.

use std::fmt;

use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceSpan};

use crate::ast::Span;

/// A compile-time problem with location information.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub span: Span,
    pub severity: Severity,
    pub phase: Phase,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, span: Span, phase: Phase) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Error,
            phase,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, span, Phase::Lexical)
    }

    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, span, Phase::Syntax)
    }

    pub fn semantic(message: impl Into<String>, span: Span) -> Self {
        Self::new(message, span, Phase::Semantic)
    }

    /// Downgrade to a warning.
    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => self.phase.to_string(),
            Severity::Warning => "warning".to_string(),
        };
        write!(f, "{}:{}: {}: {}", self.span.line, self.span.column, label, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// Compilation phase that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Lexical,
    Syntax,
    Semantic,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lexical => write!(f, "lexical error"),
            Phase::Syntax => write!(f, "syntax error"),
            Phase::Semantic => write!(f, "semantic error"),
        }
    }
}

/// Whether any diagnostic in `diagnostics` is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

// ============================================================================
// miette rendering
// ============================================================================

/// A [`Diagnostic`] bundled with the source it points into, ready for `miette` reporting.
#[derive(Debug, thiserror::Error)]
#[error("{}", .diagnostic.message)]
pub struct SourceDiagnostic {
    diagnostic: Diagnostic,
    named_source: NamedSource<String>,
    source_len: usize,
}

impl SourceDiagnostic {
    pub fn new(file_name: &str, source: &str, diagnostic: Diagnostic) -> Self {
        Self {
            diagnostic,
            named_source: NamedSource::new(file_name, source.to_string()),
            source_len: source.len(),
        }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diagnostic
    }

    fn source_span(&self) -> SourceSpan {
        // Zero-width spans (EOF, missing tokens) still get a one-column caret.
        let start = self.diagnostic.span.start.min(self.source_len);
        let len = self.diagnostic.span.len().max(1).min(self.source_len - start);
        SourceSpan::new(start.into(), len)
    }
}

impl miette::Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.diagnostic.phase {
            Phase::Lexical => "sockidl::lexical",
            Phase::Syntax => "sockidl::syntax",
            Phase::Semantic => "sockidl::semantic",
        };
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diagnostic.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let mut lines: Vec<String> = self.diagnostic.notes.iter().map(|n| format!("note: {n}")).collect();
        lines.extend(self.diagnostic.hints.iter().cloned());
        if lines.is_empty() {
            None
        } else {
            Some(Box::new(lines.join("\n")))
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.named_source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = format!("{}:{}", self.diagnostic.span.line, self.diagnostic.span.column);
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(label),
            self.source_span(),
        ))))
    }
}

/// Render one diagnostic with source context, without ANSI colors.
pub fn render(file_name: &str, source: &str, diagnostic: &Diagnostic) -> String {
    let report = SourceDiagnostic::new(file_name, source, diagnostic.clone());
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    if handler.render_report(&mut out, &report).is_err() {
        // Fall back to the one-line form rather than losing the diagnostic.
        out = format!("{file_name}:{diagnostic}\n");
    }
    out
}

/// Render every diagnostic in order.
pub fn render_all(file_name: &str, source: &str, diagnostics: &[Diagnostic]) -> String {
    diagnostics.iter().map(|d| render(file_name, source, d)).collect::<Vec<_>>().join("\n")
}
