//! Assemble and format one generated file per interface.
//!
//! ## Notes
//! - Tokens are parsed with `syn` and printed with `prettyplease`; a token stream that fails to parse is an
//!   emitter bug and surfaces as [`EmitError::SynParse`].
//! - Output is deterministic: the same plans and config always produce byte-identical files.

use proc_macro2::TokenStream;
use quote::quote;

use super::{EmitError, Emitter};
use crate::backend::config::CodegenConfig;
use crate::backend::protocol::ProtocolPlan;
use crate::frontend::model::ResolvedUnit;
use sockidl_core::naming::to_snake_case;

/// Formatted Rust source for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub interface: String,
    /// `<interface_snake>.rs`
    pub file_name: String,
    pub source: String,
}

impl<'a> Emitter<'a> {
    /// Emit the whole file as tokens (without formatting).
    pub fn emit_file_tokens(&self) -> Result<TokenStream, EmitError> {
        let rt = &self.runtime;
        let types = self.collect_types()?;
        let type_items = types.iter().map(|decl| self.emit_type_decl(decl));
        let consts = self.emit_id_consts();
        let messages = self.emit_messages();
        let client = self.emit_client_side();
        let server = self.emit_server_side();

        Ok(quote! {
            #![allow(unused_imports, unused_mut, dead_code, unused_variables)]

            use std::sync::Arc;
            use #rt::prelude::*;

            #consts
            #(#type_items)*
            #messages
            #client
            #server
        })
    }

    pub fn emit_file(&self) -> Result<String, EmitError> {
        let tokens = self.emit_file_tokens()?;
        let syntax_tree = syn::parse2(tokens).map_err(|e| EmitError::SynParse(e.to_string()))?;
        let formatted = prettyplease::unparse(&syntax_tree);

        if !self.config.emit_header {
            return Ok(formatted);
        }
        let header = format!(
            "// Generated by sockidl v{} from interface `{}`. Do not edit.\n\n",
            crate::version::SOCKIDL_VERSION,
            self.plan.interface
        );
        Ok(format!("{header}{formatted}"))
    }
}

/// Generate the file for one planned interface.
pub fn generate_interface(
    plan: &ProtocolPlan,
    unit: &ResolvedUnit,
    config: &CodegenConfig,
) -> Result<GeneratedFile, EmitError> {
    let source = Emitter::new(plan, unit, config)?.emit_file()?;
    Ok(GeneratedFile {
        interface: plan.interface.clone(),
        file_name: format!("{}.rs", to_snake_case(&plan.interface)),
        source,
    })
}

/// Generate every planned interface, in plan order.
#[tracing::instrument(skip_all, fields(interfaces = plans.len()))]
pub fn generate(
    plans: &[ProtocolPlan],
    unit: &ResolvedUnit,
    config: &CodegenConfig,
) -> Result<Vec<GeneratedFile>, EmitError> {
    plans
        .iter()
        .map(|plan| {
            let file = generate_interface(plan, unit, config)?;
            tracing::debug!(file = %file.file_name, bytes = file.source.len(), "generated");
            Ok(file)
        })
        .collect()
}
