//! Emit IDL enums and structs with their `Wire` impls.
//!
//! Enums travel as their `i32` ordinal; structs as their fields in declaration order with no framing of their
//! own.

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::Emitter;
use crate::frontend::model::{ResolvedEnum, ResolvedStruct, TypeDecl};

impl<'a> Emitter<'a> {
    pub(super) fn emit_type_decl(&self, decl: &TypeDecl) -> TokenStream {
        match decl {
            TypeDecl::Enum(e) => self.emit_enum(e),
            TypeDecl::Struct(s) => self.emit_struct(s),
        }
    }

    fn emit_enum(&self, decl: &ResolvedEnum) -> TokenStream {
        let name = Self::ident(&decl.name);
        let name_lit = Literal::string(&decl.name);
        let doc = format!(" Declared in {}. Encoded as its `i32` ordinal.", decl.owner);

        let variants = decl.values.iter().enumerate().map(|(ordinal, value)| {
            let variant = Self::ident(value);
            let default = (ordinal == 0).then(|| quote! { #[default] });
            let ordinal = Literal::usize_unsuffixed(ordinal);
            quote! { #default #variant = #ordinal }
        });
        let decode_arms = decl.values.iter().enumerate().map(|(ordinal, value)| {
            let variant = Self::ident(value);
            let ordinal = Literal::usize_unsuffixed(ordinal);
            quote! { #ordinal => Ok(#name::#variant), }
        });

        quote! {
            #[doc = #doc]
            #[allow(non_camel_case_types)]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            #[repr(i32)]
            pub enum #name {
                #(#variants),*
            }

            impl Wire for #name {
                fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError> {
                    w.write_i32(*self as i32);
                    Ok(())
                }

                fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
                    match r.read_i32()? {
                        #(#decode_arms)*
                        value => Err(WireError::InvalidEnum { type_name: #name_lit, value }),
                    }
                }
            }
        }
    }

    fn emit_struct(&self, decl: &ResolvedStruct) -> TokenStream {
        let name = Self::ident(&decl.name);
        let doc = format!(" Declared in {}.", decl.owner);

        let field_defs = decl.fields.iter().map(|f| {
            let field = Self::snake_ident(&f.name);
            let ty = self.rust_type(&f.ty);
            quote! { pub #field: #ty }
        });
        let encodes = decl.fields.iter().map(|f| {
            let field = Self::snake_ident(&f.name);
            quote! { self.#field.encode(w)?; }
        });
        let decodes = decl.fields.iter().map(|f| {
            let field = Self::snake_ident(&f.name);
            quote! { #field: Wire::decode(r)?, }
        });

        quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, PartialEq, Default)]
            pub struct #name {
                #(#field_defs),*
            }

            impl Wire for #name {
                fn encode(&self, w: &mut ByteWriter) -> Result<(), WireError> {
                    #(#encodes)*
                    Ok(())
                }

                fn decode(r: &mut ByteReader<'_>) -> Result<Self, WireError> {
                    Ok(Self {
                        #(#decodes)*
                    })
                }
            }
        }
    }
}
