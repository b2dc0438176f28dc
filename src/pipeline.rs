//! End-to-end compilation: source text → generated files.
//!
//! Each phase runs to completion and the pipeline stops at the first phase that reports an error. Warnings from
//! the semantic phase travel with the successful output.

use crate::backend::config::CodegenConfig;
use crate::backend::emit::{self, EmitError, GeneratedFile};
use crate::backend::protocol::{self, ProtocolPlan};
use crate::frontend::checker::{self, Analysis};
use crate::frontend::diagnostics::{Diagnostic, Phase};
use crate::frontend::{lexer, parser};

/// Why a compilation produced no output.
#[derive(Debug, thiserror::Error)]
pub enum CompileFailure {
    #[error("{} {phase}(s)", diagnostics.iter().filter(|d| d.is_error()).count())]
    Diagnostics { phase: Phase, diagnostics: Vec<Diagnostic> },
    #[error("failed to generate code for interface '{interface}'")]
    Emit {
        interface: String,
        #[source]
        source: EmitError,
    },
}

impl CompileFailure {
    /// Diagnostics carried by the failure (empty for emit failures).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileFailure::Diagnostics { diagnostics, .. } => diagnostics,
            CompileFailure::Emit { .. } => &[],
        }
    }
}

/// Everything a successful compilation produces.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    pub files: Vec<GeneratedFile>,
    pub plans: Vec<ProtocolPlan>,
    pub warnings: Vec<Diagnostic>,
}

/// Run the frontend: lex, parse, and check.
pub fn analyze(source: &str) -> Result<Analysis, CompileFailure> {
    let tokens = lexer::lex(source).map_err(|diagnostics| CompileFailure::Diagnostics {
        phase: Phase::Lexical,
        diagnostics,
    })?;
    let unit = parser::parse(&tokens).map_err(|diagnostics| CompileFailure::Diagnostics {
        phase: Phase::Syntax,
        diagnostics,
    })?;
    checker::check(&unit).map_err(|diagnostics| CompileFailure::Diagnostics {
        phase: Phase::Semantic,
        diagnostics,
    })
}

/// Analyze and plan without emitting code.
pub fn plan(source: &str, config: &CodegenConfig) -> Result<(Analysis, Vec<ProtocolPlan>), CompileFailure> {
    let analysis = analyze(source)?;
    let plans = protocol::plan_unit(&analysis, config).map_err(|diagnostics| CompileFailure::Diagnostics {
        phase: Phase::Semantic,
        diagnostics,
    })?;
    Ok((analysis, plans))
}

/// Compile `source` into one Rust file per emitted interface.
#[tracing::instrument(skip_all, fields(bytes = source.len()))]
pub fn compile(source: &str, config: &CodegenConfig) -> Result<CompileOutput, CompileFailure> {
    let (analysis, plans) = plan(source, config)?;

    let mut files = Vec::with_capacity(plans.len());
    for plan in &plans {
        let file = emit::generate_interface(plan, &analysis.unit, config).map_err(|source| CompileFailure::Emit {
            interface: plan.interface.clone(),
            source,
        })?;
        files.push(file);
    }

    tracing::debug!(
        files = files.len(),
        warnings = analysis.warnings.len(),
        "compilation finished"
    );
    Ok(CompileOutput {
        files,
        plans,
        warnings: analysis.warnings,
    })
}
