//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::backend::config::CodegenConfig;
use crate::backend::protocol::{ProtocolDescriptor, ProtocolPlan};
use crate::frontend::diagnostics::{self, Diagnostic};
use crate::frontend::{lexer, parser};
use crate::pipeline::{self, CompileFailure};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (16 MB)
///
/// Files larger than this are rejected before lexing.
const MAX_SOURCE_SIZE: u64 = 16 * 1024 * 1024;

/// File name of the JSON protocol descriptor written by `generate --descriptor`.
pub const DESCRIPTOR_FILE: &str = "protocol.json";

/// Validate the output directory to prevent path traversal.
///
/// This function ensures:
/// - The path doesn't contain `..` components
/// - Absolute paths are allowed but logged
fn validate_output_dir(out_dir: &Path) -> CliResult<()> {
    if out_dir
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(CliError::usage(format!(
            "Output directory '{}' contains path traversal (..)",
            out_dir.display()
        )));
    }

    if out_dir.is_absolute() {
        tracing::warn!(path = %out_dir.display(), "using absolute output path");
    }

    Ok(())
}

/// Read source file contents.
///
/// ## Errors
///
/// Returns a usage error (exit code 2) if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE`
pub fn read_source(file_path: &Path) -> CliResult<String> {
    let metadata = fs::metadata(file_path)
        .map_err(|e| CliError::usage(format!("Cannot access file '{}': {}", file_path.display(), e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::usage(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path.display(),
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::usage(format!("Error reading file '{}': {}", file_path.display(), e)))
}

fn file_label(file_path: &Path) -> String {
    file_path.display().to_string()
}

/// Render diagnostics into a failing `CliError`.
fn diagnostics_error(file_path: &Path, source: &str, diagnostics: &[Diagnostic]) -> CliError {
    let rendered = diagnostics::render_all(&file_label(file_path), source, diagnostics);
    CliError::failure(rendered.trim_end())
}

fn compile_error(file_path: &Path, source: &str, failure: CompileFailure) -> CliError {
    match failure {
        CompileFailure::Diagnostics { diagnostics, .. } => diagnostics_error(file_path, source, &diagnostics),
        CompileFailure::Emit { interface, source } => {
            CliError::failure(format!("Code generation error in interface '{interface}': {source}"))
        }
    }
}

/// Print non-fatal diagnostics to stderr.
fn print_warnings(file_path: &Path, source: &str, warnings: &[Diagnostic]) {
    if !warnings.is_empty() {
        eprintln!("{}", diagnostics::render_all(&file_label(file_path), source, warnings).trim_end());
    }
}

/// Tokenize and display tokens.
pub fn lex_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|errs| diagnostics_error(file_path, &source, &errs))?;

    for tok in &tokens {
        println!("{}:{}\t{:?}\t{:?}", tok.span.line, tok.span.column, tok.kind, tok.lexeme);
    }
    Ok(ExitCode::SUCCESS)
}

/// Parse and display the syntax tree.
pub fn parse_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let tokens = lexer::lex(&source).map_err(|errs| diagnostics_error(file_path, &source, &errs))?;
    let unit = parser::parse(&tokens).map_err(|errs| diagnostics_error(file_path, &source, &errs))?;

    println!("{:#?}", unit);
    Ok(ExitCode::SUCCESS)
}

/// Run every frontend check.
pub fn check_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let analysis = pipeline::analyze(&source).map_err(|e| compile_error(file_path, &source, e))?;

    print_warnings(file_path, &source, &analysis.warnings);
    println!(
        "✓ {}: {} interface(s), {} warning(s)",
        file_label(file_path),
        analysis.unit.interfaces.len(),
        analysis.warnings.len()
    );
    Ok(ExitCode::SUCCESS)
}

/// Show message ids and schemas, as text or as the JSON descriptor.
pub fn plan_file(file_path: &Path, config: &CodegenConfig, json: bool) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let (analysis, plans) = pipeline::plan(&source, config).map_err(|e| compile_error(file_path, &source, e))?;

    print_warnings(file_path, &source, &analysis.warnings);
    if json {
        let descriptor = ProtocolDescriptor::new(&plans, config)
            .to_json()
            .map_err(|e| CliError::failure(format!("Error serializing protocol: {e}")))?;
        print!("{descriptor}");
    } else {
        print!("{}", render_plans(&plans));
    }
    Ok(ExitCode::SUCCESS)
}

/// Generate one Rust file per interface into `out_dir`.
pub fn generate_files(
    file_path: &Path,
    out_dir: &Path,
    config: &CodegenConfig,
    descriptor: bool,
) -> CliResult<ExitCode> {
    validate_output_dir(out_dir)?;
    let source = read_source(file_path)?;
    let output = pipeline::compile(&source, config).map_err(|e| compile_error(file_path, &source, e))?;
    print_warnings(file_path, &source, &output.warnings);

    fs::create_dir_all(out_dir)
        .map_err(|e| CliError::usage(format!("Cannot create '{}': {}", out_dir.display(), e)))?;

    let mut written: Vec<PathBuf> = Vec::new();
    for file in &output.files {
        let path = out_dir.join(&file.file_name);
        write_file(&path, &file.source)?;
        written.push(path);
    }
    if descriptor {
        let json = ProtocolDescriptor::new(&output.plans, config)
            .to_json()
            .map_err(|e| CliError::failure(format!("Error serializing protocol: {e}")))?;
        let path = out_dir.join(DESCRIPTOR_FILE);
        write_file(&path, &json)?;
        written.push(path);
    }

    for path in &written {
        println!("wrote {}", path.display());
    }
    tracing::info!(files = written.len(), out_dir = %out_dir.display(), "generation finished");
    Ok(ExitCode::SUCCESS)
}

fn write_file(path: &Path, contents: &str) -> CliResult<()> {
    fs::write(path, contents).map_err(|e| CliError::usage(format!("Error writing '{}': {}", path.display(), e)))
}

/// Human-readable listing of every interface's messages.
pub fn render_plans(plans: &[ProtocolPlan]) -> String {
    let mut out = String::new();
    for plan in plans {
        let _ = writeln!(out, "{} ({})", plan.interface, plan.role);
        if !plan.observers.is_empty() {
            let _ = writeln!(out, "  observers: {}", plan.observers.join(", "));
        }
        for message in plan.messages() {
            let fields = message
                .fields
                .iter()
                .map(|f| format!("{}: {}", f.name, f.ty))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "  {:>5} {} {}({})", message.id, message.const_name, message.name, fields);
        }
    }
    out
}
