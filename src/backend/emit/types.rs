//! Type mapping and the set of data types each generated file carries.

use std::collections::{HashMap, HashSet, VecDeque};

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use super::{EmitError, Emitter};
use crate::frontend::model::{SemanticType, TypeDecl, TypeOwner};
use sockidl_core::lang::primitives::{self, PrimitiveId};

impl<'a> Emitter<'a> {
    /// Emit a resolved type as Rust tokens.
    pub(super) fn rust_type(&self, ty: &SemanticType) -> TokenStream {
        match ty {
            SemanticType::Primitive(PrimitiveId::Void) => quote! { () },
            SemanticType::Primitive(id) => {
                let name = format_ident!("{}", primitives::rust_type(*id));
                quote! { #name }
            }
            SemanticType::Sequence(inner) => {
                let inner = self.rust_type(inner);
                quote! { Vec<#inner> }
            }
            SemanticType::Array(inner, len) => {
                let inner = self.rust_type(inner);
                let len = Literal::usize_unsuffixed(*len);
                quote! { [#inner; #len] }
            }
            SemanticType::Handle(_) => quote! { InterfaceHandle },
            SemanticType::Named(named) => {
                let name = Self::ident(&named.name);
                quote! { #name }
            }
        }
    }

    /// Initial value for an output slot the service fills in.
    pub(super) fn default_value(&self, ty: &SemanticType) -> TokenStream {
        match ty {
            SemanticType::Array(..) => quote! { std::array::from_fn(|_| Default::default()) },
            _ => quote! { Default::default() },
        }
    }

    /// Data types to generate into this file, in emission order.
    ///
    /// The enclosing module's types come first, then the interface's own types, then anything else the
    /// messages reach (types of absorbed observers, followed transitively through struct fields).
    ///
    /// ## Errors
    /// [`EmitError::TypeNameClash`] if two types from different scopes share a name.
    pub(super) fn collect_types(&self) -> Result<Vec<&'a TypeDecl>, EmitError> {
        let unit = self.unit;
        let mut out: Vec<&'a TypeDecl> = Vec::new();
        let mut seen: HashSet<(&'a TypeOwner, &'a str)> = HashSet::new();
        let mut by_name: HashMap<&'a str, &'a TypeOwner> = HashMap::new();
        let mut pending: VecDeque<&'a TypeDecl> = VecDeque::new();

        let module_types = self
            .plan
            .module
            .as_deref()
            .and_then(|m| unit.module(m))
            .map(|m| m.types.iter())
            .into_iter()
            .flatten();
        let own_types = unit
            .interface(&self.plan.interface)
            .map(|i| i.types.iter())
            .into_iter()
            .flatten();
        pending.extend(module_types.chain(own_types));

        let schema_types: Vec<&'a TypeDecl> = self
            .plan
            .messages()
            .flat_map(|m| m.fields.iter())
            .flat_map(|f| f.ty.named_types())
            .filter_map(|named| unit.type_decl(named))
            .collect();
        pending.extend(schema_types);

        while let Some(decl) = pending.pop_front() {
            if !seen.insert((decl.owner(), decl.name())) {
                continue;
            }
            if let Some(first) = by_name.insert(decl.name(), decl.owner()) {
                return Err(EmitError::TypeNameClash {
                    interface: self.plan.interface.clone(),
                    name: decl.name().to_string(),
                    first: first.to_string(),
                    second: decl.owner().to_string(),
                });
            }
            if let TypeDecl::Struct(s) = decl {
                for field in &s.fields {
                    pending.extend(field.ty.named_types().into_iter().filter_map(|n| unit.type_decl(n)));
                }
            }
            out.push(decl);
        }
        Ok(out)
    }
}
