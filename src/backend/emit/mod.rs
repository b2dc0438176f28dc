//! Emit Rust source code from protocol plans.
//!
//! This module defines [`Emitter`] and wires together the focused submodules that implement plan → Rust
//! emission. `mod.rs` only holds the shared state and identifier helpers.
//!
//! ## Notes
//! - Emission produces a Rust syntax tree (`syn`) and formats it via `prettyplease`.
//! - One file per planned interface. The file is self-contained apart from the runtime crate: message-id
//!   constants, data types, message schemas, the client, and (unless the interface is a pure observer) the
//!   service trait and server.
//! - Generated locals are `__`-prefixed so they cannot collide with IDL parameter names.
//!
//! ## See also
//! - [`program`]: file assembly and formatting
//! - [`types`]: type mapping and the per-file type set
//! - [`data`]: enums and structs with their `Wire` impls
//! - [`messages`]: id constants and message structs
//! - [`client`]: events trait and client
//! - [`server`]: service trait, handler table and server

mod client;
mod data;
mod errors;
mod messages;
mod program;
mod server;
mod types;

pub use errors::EmitError;
pub use program::{GeneratedFile, generate, generate_interface};

use proc_macro2::{Ident, Span, TokenStream};
use quote::format_ident;

use crate::backend::config::CodegenConfig;
use crate::backend::protocol::ProtocolPlan;
use crate::frontend::model::ResolvedUnit;
use sockidl_core::naming::{RustIdent, is_reserved_method_name, rust_ident, to_screaming_snake_case, to_snake_case};

/// Emits the Rust file for one [`ProtocolPlan`].
pub struct Emitter<'a> {
    plan: &'a ProtocolPlan,
    unit: &'a ResolvedUnit,
    config: &'a CodegenConfig,
    /// Parsed `config.runtime_crate`.
    runtime: TokenStream,
}

impl<'a> Emitter<'a> {
    pub fn new(plan: &'a ProtocolPlan, unit: &'a ResolvedUnit, config: &'a CodegenConfig) -> Result<Self, EmitError> {
        let path: syn::Path = syn::parse_str(&config.runtime_crate)
            .map_err(|_| EmitError::InvalidRuntimePath(config.runtime_crate.clone()))?;
        Ok(Self {
            plan,
            unit,
            config,
            runtime: quote::quote! { #path },
        })
    }

    /// Identifier for an IDL name used verbatim (types, enum values).
    fn ident(name: &str) -> Ident {
        match rust_ident(name) {
            RustIdent::Plain(s) => format_ident!("{}", s),
            RustIdent::Raw(s) => Ident::new_raw(&s, Span::call_site()),
        }
    }

    /// Identifier for a field, parameter, or method (`snake_case`).
    fn snake_ident(name: &str) -> Ident {
        Self::ident(&to_snake_case(name))
    }

    /// Identifier for an RPC method on the client and the service trait.
    ///
    /// Names taken by the generated API get trailing underscores until they are free (`start` → `start_`).
    fn method_ident(&self, name: &str) -> Ident {
        let mut snake = to_snake_case(name);
        if is_reserved_method_name(&snake) {
            let taken: Vec<String> = self.plan.methods.iter().map(|m| to_snake_case(&m.name)).collect();
            snake.push('_');
            while taken.contains(&snake) || is_reserved_method_name(&snake) {
                snake.push('_');
            }
        }
        Self::ident(&snake)
    }

    /// `<Interface><suffix>`, e.g. `CalcClient`.
    fn iface_ident(&self, suffix: &str) -> Ident {
        format_ident!("{}{}", self.plan.interface, suffix)
    }

    /// `<prefix><interface_snake><suffix>`, e.g. `dispatch_calc_event`.
    fn iface_fn_ident(&self, prefix: &str, suffix: &str) -> Ident {
        format_ident!("{}{}{}", prefix, to_snake_case(&self.plan.interface), suffix)
    }

    /// `<INTERFACE><suffix>`, e.g. `CALC_PUSH_IDS`.
    fn iface_const_ident(&self, suffix: &str) -> Ident {
        format_ident!("{}{}", to_screaming_snake_case(&self.plan.interface), suffix)
    }
}
