//! Semantic checker for parsed IDL.
//!
//! Validates a [`CompilationUnit`] and lowers it into a [`ResolvedUnit`], then classifies its interfaces.
//!
//! ## Notes
//!
//! - **Error accumulation**: every check runs to completion and pushes [`Diagnostic`]s; the unit is rejected
//!   afterwards if any of them is an error. Warnings travel with the successful result.
//! - **Diagnostic order**: diagnostics are reported in source order.
//!
//! ## What is validated
//!
//! - Names are unique per scope: module members, interface members, struct fields, enum values, parameters;
//!   interface names across the whole unit. Names that only differ in case but map to the same Rust identifier
//!   count as duplicates.
//! - Every type reference resolves (see [`resolve`](crate::frontend::resolve)), with no typedef cycles and no
//!   nested sequences.
//! - `void` appears only as a method return type.
//! - No struct contains itself by value.
//! - Enums have at least one value.
//! - Output parameters do not collide with the generated response fields.
//!
//! ## Examples
//!
//! ```rust
//! use sockidl::frontend::{checker, lexer, parser};
//!
//! let tokens = lexer::lex("interface Calc { int add(in int a, in int b); };").unwrap();
//! let unit = parser::parse(&tokens).unwrap();
//! let analysis = checker::check(&unit).unwrap();
//! assert_eq!(analysis.unit.interfaces[0].methods[0].name, "add");
//! ```

mod lower;
mod names;

use crate::frontend::ast::CompilationUnit;
use crate::frontend::classify::{Classification, classify};
use crate::frontend::diagnostics::{Diagnostic, has_errors};
use crate::frontend::model::ResolvedUnit;
use crate::frontend::resolve::Resolver;
use crate::frontend::symbols::SymbolTable;

/// Output of a successful check.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub unit: ResolvedUnit,
    pub classification: Classification,
    /// Non-fatal diagnostics, in source order.
    pub warnings: Vec<Diagnostic>,
}

/// Check a parsed unit.
///
/// ## Errors
/// Returns every diagnostic (errors and warnings, in source order) if any semantic error was found.
#[tracing::instrument(skip_all, fields(interfaces = unit.interfaces().count()))]
pub fn check(unit: &CompilationUnit) -> Result<Analysis, Vec<Diagnostic>> {
    let symbols = SymbolTable::build(unit);
    let mut checker = Checker::new(unit, &symbols);

    checker.check_names();
    let resolved = checker.lower();
    checker.check_struct_recursion(&resolved);

    let diagnostics = checker.finish();
    if has_errors(&diagnostics) {
        tracing::debug!(count = diagnostics.len(), "semantic check failed");
        return Err(diagnostics);
    }

    let classification = classify(&resolved);
    tracing::debug!(
        interfaces = resolved.interfaces.len(),
        absorbed = classification.absorbed().count(),
        warnings = diagnostics.len(),
        "semantic check passed"
    );
    Ok(Analysis {
        unit: resolved,
        classification,
        warnings: diagnostics,
    })
}

pub(crate) struct Checker<'s, 'a> {
    unit: &'a CompilationUnit,
    resolver: Resolver<'s, 'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'s, 'a> Checker<'s, 'a> {
    fn new(unit: &'a CompilationUnit, symbols: &'s SymbolTable<'a>) -> Self {
        Self {
            unit,
            resolver: Resolver::new(symbols),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn finish(mut self) -> Vec<Diagnostic> {
        // Stable sort keeps insertion order for diagnostics at the same position.
        self.diagnostics.sort_by_key(|d| d.span.start);
        self.diagnostics
    }
}
