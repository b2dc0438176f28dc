//! Emit the client half: events trait, push dispatcher, and the client type.
//!
//! ## Notes
//! - RPC methods return `Result`. A method with a response yields its return value, or `status == STATUS_OK`
//!   when it returns `void`; a method without one resolves as soon as the request is written.
//! - `out`/`inout` parameters are `&mut` and are overwritten from the response.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::Emitter;
use crate::backend::protocol::{MessageSchema, MethodPlan};
use crate::frontend::ast::Direction;
use crate::frontend::model::ResolvedMethod;
use sockidl_core::naming::to_snake_case;

/// One handler on the events trait.
struct EventHandler<'p> {
    name: String,
    /// `Observer.method` or `method`, for docs and logs.
    label: String,
    message: &'p MessageSchema,
}

impl<'a> Emitter<'a> {
    fn event_handlers(&self) -> Vec<EventHandler<'a>> {
        let plan = self.plan;
        let own = plan.pushed_methods().map(|m| EventHandler {
            name: to_snake_case(&m.name),
            label: m.name.clone(),
            message: &m.request,
        });
        let observed = plan.notifications.iter().map(|n| EventHandler {
            name: format!("{}_{}", to_snake_case(&n.observer), to_snake_case(&n.method)),
            label: format!("{}.{}", n.observer, n.method),
            message: &n.message,
        });
        own.chain(observed).collect()
    }

    pub(super) fn emit_client_side(&self) -> TokenStream {
        let events = if self.plan.has_events() {
            self.emit_events()
        } else {
            TokenStream::new()
        };
        let client = self.emit_client();
        quote! {
            #events
            #client
        }
    }

    fn emit_events(&self) -> TokenStream {
        let rt = &self.runtime;
        let trait_name = self.iface_ident("Events");
        let logging = format_ident!("Logging{}Events", self.plan.interface);
        let dispatch = self.iface_fn_ident("dispatch_", "_event");
        let trait_doc = format!(
            " Handlers for messages the server pushes to `{}` clients. Unimplemented handlers log the event.",
            self.plan.interface
        );

        let handlers = self.event_handlers();
        let methods = handlers.iter().map(|h| {
            let name = format_ident!("{}", h.name);
            let id = format_ident!("{}", h.message.const_name);
            let params = h.message.fields.iter().map(|f| {
                let field = Self::snake_ident(&f.name);
                let ty = self.rust_type(&f.ty);
                quote! { #field: #ty }
            });
            let doc = format!(" `{}` pushed by the server.", h.label);
            let log = format!("unhandled {}", h.label);
            quote! {
                #[doc = #doc]
                fn #name(&self, #(#params),*) {
                    #rt::tracing::info!(id = #id, #log);
                }
            }
        });
        let arms = handlers.iter().map(|h| {
            let name = format_ident!("{}", h.name);
            let id = format_ident!("{}", h.message.const_name);
            let message = format_ident!("{}", h.message.name);
            let args = h.message.fields.iter().map(|f| {
                let field = Self::snake_ident(&f.name);
                quote! { __message.#field }
            });
            quote! {
                #id => {
                    let __message = #message::from_payload(payload)?;
                    events.#name(#(#args),*);
                }
            }
        });

        quote! {
            #[doc = #trait_doc]
            pub trait #trait_name: Send + Sync + 'static {
                #(#methods)*
            }

            #[doc = " Events implementation that only logs."]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct #logging;

            impl #trait_name for #logging {}

            fn #dispatch(events: &dyn #trait_name, id: u32, payload: &[u8]) -> Result<(), WireError> {
                match id {
                    #(#arms)*
                    _ => {}
                }
                Ok(())
            }
        }
    }

    fn emit_client(&self) -> TokenStream {
        let iface = &self.plan.interface;
        let client = self.iface_ident("Client");
        let push_ids = self.iface_const_ident("_PUSH_IDS");
        let id_consts = self
            .event_handlers()
            .into_iter()
            .map(|h| format_ident!("{}", h.message.const_name))
            .collect::<Vec<_>>();
        let doc = format!(" Client for `{iface}`.");

        let constructors = if self.plan.has_events() {
            let events = self.iface_ident("Events");
            let logging = format_ident!("Logging{}Events", iface);
            let dispatch = self.iface_fn_ident("dispatch_", "_event");
            quote! {
                pub fn with_config(config: ClientConfig) -> Self {
                    Self::with_events_and_config(#logging, config)
                }

                pub fn with_events(events: impl #events) -> Self {
                    Self::with_events_and_config(events, ClientConfig::default())
                }

                pub fn with_events_and_config(events: impl #events, config: ClientConfig) -> Self {
                    let __events: Arc<dyn #events> = Arc::new(events);
                    let __dispatch: NotificationDispatch =
                        Arc::new(move |id: u32, payload: &[u8]| #dispatch(&*__events, id, payload));
                    Self {
                        core: ClientCore::new(config, #push_ids.iter().copied(), __dispatch),
                    }
                }
            }
        } else {
            quote! {
                pub fn with_config(config: ClientConfig) -> Self {
                    let __dispatch: NotificationDispatch =
                        Arc::new(|_: u32, _: &[u8]| -> Result<(), WireError> { Ok(()) });
                    Self {
                        core: ClientCore::new(config, #push_ids.iter().copied(), __dispatch),
                    }
                }
            }
        };

        let calls = self
            .plan
            .handled_methods()
            .filter_map(|m| Some(self.emit_call(m, self.resolved_method(&m.name)?)));

        quote! {
            #[doc = " Message ids the server pushes to this client."]
            pub const #push_ids: &[u32] = &[#(#id_consts),*];

            #[doc = #doc]
            pub struct #client {
                core: ClientCore,
            }

            impl #client {
                pub fn new() -> Self {
                    Self::with_config(ClientConfig::default())
                }

                #constructors

                #[doc = " Connect to `host:port`; starts listening unless the config disables it."]
                pub fn connect(&self, host: &str, port: u16) -> Result<(), TransportError> {
                    self.core.connect((host, port))
                }

                pub fn connect_to(&self, addr: impl std::net::ToSocketAddrs) -> Result<(), TransportError> {
                    self.core.connect(addr)
                }

                pub fn disconnect(&self) {
                    self.core.disconnect()
                }

                pub fn state(&self) -> ClientState {
                    self.core.state()
                }

                pub fn is_connected(&self) -> bool {
                    self.core.is_connected()
                }

                pub fn start_listening(&self) -> Result<(), TransportError> {
                    self.core.start_listening()
                }

                pub fn stop_listening(&self) {
                    self.core.stop_listening()
                }

                pub fn core(&self) -> &ClientCore {
                    &self.core
                }

                #(#calls)*
            }

            impl Default for #client {
                fn default() -> Self {
                    Self::new()
                }
            }
        }
    }

    pub(super) fn resolved_method(&self, name: &str) -> Option<&'a ResolvedMethod> {
        self.unit.interface(&self.plan.interface)?.method(name)
    }

    /// Parameter list for a method signature: inputs by value, outputs as `&mut`.
    pub(super) fn signature_params(&self, method: &ResolvedMethod) -> Vec<TokenStream> {
        method
            .params
            .iter()
            .map(|p| {
                let name = Self::snake_ident(&p.name);
                let ty = self.rust_type(&p.ty);
                match p.direction {
                    Direction::In => quote! { #name: #ty },
                    Direction::Out | Direction::Inout => quote! { #name: &mut #ty },
                }
            })
            .collect()
    }

    fn emit_call(&self, plan: &MethodPlan, method: &ResolvedMethod) -> TokenStream {
        let name = self.method_ident(&method.name);
        let params = self.signature_params(method);
        let request = format_ident!("{}", plan.request.name);
        let request_fields = method.input_params().map(|p| {
            let field = Self::snake_ident(&p.name);
            match p.direction {
                Direction::Inout => quote! { #field: (*#field).clone() },
                _ => quote! { #field },
            }
        });
        let build = quote! {
            let __request = #request { #(#request_fields),* };
        };

        let Some(response) = &plan.response else {
            let doc = format!(" Send `{}`; no response is expected.", method.name);
            return quote! {
                #[doc = #doc]
                pub fn #name(&self, #(#params),*) -> Result<(), RpcError> {
                    #build
                    self.core.send(&__request.to_payload()?)?;
                    Ok(())
                }
            };
        };

        let response_ty = format_ident!("{}", response.name);
        let response_id = format_ident!("{}", response.const_name);
        let copy_back = method.output_params().map(|p| {
            let field = Self::snake_ident(&p.name);
            quote! { *#field = __response.#field; }
        });
        let (ret_ty, ret) = if method.returns_void() {
            let status = response
                .status_field()
                .map(|f| Self::snake_ident(&f.name))
                .unwrap_or_else(|| format_ident!("status"));
            (quote! { bool }, quote! { __response.#status == STATUS_OK })
        } else {
            (self.rust_type(&method.return_type), quote! { __response.return_value })
        };
        let doc = format!(" Call `{}` and wait for `{}`.", method.name, response.const_name);

        quote! {
            #[doc = #doc]
            pub fn #name(&self, #(#params),*) -> Result<#ret_ty, RpcError> {
                #build
                let __payload = self.core.call(&__request.to_payload()?, #response_id)?;
                let __response = #response_ty::from_payload(&__payload)?;
                #(#copy_back)*
                Ok(#ret)
            }
        }
    }
}
