//! Emit message-id constants and message structs.

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};

use super::Emitter;
use crate::backend::protocol::MessageSchema;

impl<'a> Emitter<'a> {
    /// `pub const MSG_*: u32 = ...;` for every message, in id order.
    pub(super) fn emit_id_consts(&self) -> TokenStream {
        let consts = self.plan.messages().map(|m| {
            let name = format_ident!("{}", m.const_name);
            let id = Literal::u32_unsuffixed(m.id);
            let doc = format!(" `{}` ({}).", m.name, m.kind);
            quote! {
                #[doc = #doc]
                pub const #name: u32 = #id;
            }
        });
        quote! { #(#consts)* }
    }

    pub(super) fn emit_messages(&self) -> TokenStream {
        let messages = self.plan.messages().map(|m| self.emit_message(m));
        quote! { #(#messages)* }
    }

    fn emit_message(&self, schema: &MessageSchema) -> TokenStream {
        let name = format_ident!("{}", schema.name);
        let id_const = format_ident!("{}", schema.const_name);

        let field_defs = schema.fields.iter().map(|f| {
            let field = Self::snake_ident(&f.name);
            let ty = self.rust_type(&f.ty);
            quote! { pub #field: #ty }
        });
        let encodes = schema.fields.iter().map(|f| {
            let field = Self::snake_ident(&f.name);
            quote! { self.#field.encode(w)?; }
        });
        let decodes = schema.fields.iter().map(|f| {
            let field = Self::snake_ident(&f.name);
            quote! { #field: Wire::decode(r)?, }
        });

        quote! {
            #[derive(Debug, Clone, PartialEq)]
            pub struct #name {
                #(#field_defs),*
            }

            impl Message for #name {
                const ID: u32 = #id_const;

                fn encode_fields(&self, w: &mut ByteWriter) -> Result<(), WireError> {
                    #(#encodes)*
                    Ok(())
                }

                fn decode_fields(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
                    Ok(Self {
                        #(#decodes)*
                    })
                }
            }
        }
    }
}
