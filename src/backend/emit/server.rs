//! Emit the server half: service trait, handler table, and server type.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::Emitter;
use crate::backend::protocol::{MessageSchema, MethodPlan};
use crate::frontend::ast::Direction;
use crate::frontend::model::ResolvedMethod;
use sockidl_core::naming::to_snake_case;

impl<'a> Emitter<'a> {
    pub(super) fn emit_server_side(&self) -> TokenStream {
        if !self.plan.has_server {
            return TokenStream::new();
        }
        let service = self.emit_service_trait();
        let handlers = self.emit_handler_table();
        let server = self.emit_server();
        quote! {
            #service
            #handlers
            #server
        }
    }

    fn handled(&self) -> impl Iterator<Item = (&'a MethodPlan, &'a ResolvedMethod)> + '_ {
        self.plan
            .handled_methods()
            .filter_map(|m| Some((m, self.resolved_method(&m.name)?)))
    }

    fn emit_service_trait(&self) -> TokenStream {
        let trait_name = self.iface_ident("Service");
        let doc = format!(" Server-side implementation of `{}`.", self.plan.interface);
        let methods = self.handled().map(|(_, method)| {
            let name = self.method_ident(&method.name);
            let params = self.signature_params(method);
            let ret = if method.returns_void() {
                TokenStream::new()
            } else {
                let ty = self.rust_type(&method.return_type);
                quote! { -> #ty }
            };
            quote! { fn #name(&self, #(#params),*) #ret; }
        });

        quote! {
            #[doc = #doc]
            pub trait #trait_name: Send + Sync + 'static {
                #(#methods)*

                fn on_client_connected(&self, client: ClientId) {}

                fn on_client_disconnected(&self, client: ClientId) {}
            }
        }
    }

    fn emit_handler_table(&self) -> TokenStream {
        let trait_name = self.iface_ident("Service");
        let fn_name = self.iface_fn_ident("", "_handlers");
        let doc = format!(
            " Handler table routing `{}` requests to `service`.",
            self.plan.interface
        );
        let entries = self.handled().map(|(plan, method)| self.emit_handler(plan, method));

        quote! {
            #[doc = #doc]
            pub fn #fn_name<S: #trait_name>(service: Arc<S>) -> HandlerTable {
                let mut __table = HandlerTable::new();
                #(#entries)*
                __table
            }
        }
    }

    fn emit_handler(&self, plan: &MethodPlan, method: &ResolvedMethod) -> TokenStream {
        let name = self.method_ident(&method.name);
        let request = format_ident!("{}", plan.request.name);
        let request_id = format_ident!("{}", plan.request.const_name);

        let slots = method.output_params().map(|p| {
            let slot = format_ident!("__out_{}", to_snake_case(&p.name));
            let field = Self::snake_ident(&p.name);
            let init = match p.direction {
                Direction::Inout => quote! { __request.#field },
                _ => self.default_value(&p.ty),
            };
            quote! { let mut #slot = #init; }
        });
        let args = method.params.iter().map(|p| {
            let field = Self::snake_ident(&p.name);
            match p.direction {
                Direction::In => quote! { __request.#field },
                Direction::Out | Direction::Inout => {
                    let slot = format_ident!("__out_{}", to_snake_case(&p.name));
                    quote! { &mut #slot }
                }
            }
        });
        let call = if method.returns_void() {
            quote! { __service.#name(#(#args),*); }
        } else {
            quote! { let __result = __service.#name(#(#args),*); }
        };
        let reply = match &plan.response {
            Some(response) => self.emit_reply(response, method),
            None => quote! { Ok(None) },
        };

        quote! {
            let __service = Arc::clone(&service);
            __table.insert(
                #request_id,
                Box::new(move |__payload: &[u8]| -> Result<Option<Vec<u8>>, WireError> {
                    let __request = #request::from_payload(__payload)?;
                    #(#slots)*
                    #call
                    #reply
                }),
            );
        }
    }

    fn emit_reply(&self, response: &MessageSchema, method: &ResolvedMethod) -> TokenStream {
        let response_ty = format_ident!("{}", response.name);
        let status = response.status_field().map(|f| {
            let field = Self::snake_ident(&f.name);
            quote! { #field: STATUS_OK, }
        });
        let result = response.return_field().map(|_| quote! { return_value: __result, });
        let outputs = method.output_params().map(|p| {
            let field = Self::snake_ident(&p.name);
            let slot = format_ident!("__out_{}", to_snake_case(&p.name));
            quote! { #field: #slot, }
        });
        quote! {
            let __response = #response_ty {
                #status
                #result
                #(#outputs)*
            };
            Ok(Some(__response.to_payload()?))
        }
    }

    /// Name for the "skip this client" argument of push methods, clear of any field name.
    fn exclude_param(fields: &[crate::backend::protocol::SchemaField]) -> proc_macro2::Ident {
        let mut name = String::from("exclude");
        while fields.iter().any(|f| to_snake_case(&f.name) == name) {
            name.push('_');
        }
        format_ident!("{}", name)
    }

    fn emit_push(&self, fn_name: &proc_macro2::Ident, label: &str, message: &MessageSchema) -> TokenStream {
        let message_ty = format_ident!("{}", message.name);
        let exclude = Self::exclude_param(&message.fields);
        let params = message.fields.iter().map(|f| {
            let field = Self::snake_ident(&f.name);
            let ty = self.rust_type(&f.ty);
            quote! { #field: #ty }
        });
        let fields = message.fields.iter().map(|f| {
            let field = Self::snake_ident(&f.name);
            quote! { #field }
        });
        let doc = format!(" Push `{label}` to every connected client except `{exclude}`. Returns how many were sent.");

        quote! {
            #[doc = #doc]
            pub fn #fn_name(&self, #(#params,)* #exclude: Option<ClientId>) -> Result<usize, WireError> {
                let __message = #message_ty { #(#fields),* };
                Ok(self.core.broadcast(&__message.to_payload()?, #exclude))
            }
        }
    }

    fn emit_server(&self) -> TokenStream {
        let iface = &self.plan.interface;
        let server = self.iface_ident("Server");
        let service = self.iface_ident("Service");
        let hooks = self.iface_ident("ConnectionHooks");
        let handlers = self.iface_fn_ident("", "_handlers");
        let doc = format!(" Server for `{iface}`; dispatches requests to a [`{service}`].");

        let pushes = self.plan.pushed_methods().map(|m| {
            let fn_name = format_ident!("push_{}", to_snake_case(&m.name));
            self.emit_push(&fn_name, &m.name, &m.request)
        });
        let notifies = self.plan.notifications.iter().map(|n| {
            let fn_name = format_ident!("notify_{}_{}", to_snake_case(&n.observer), to_snake_case(&n.method));
            self.emit_push(&fn_name, &format!("{}.{}", n.observer, n.method), &n.message)
        });

        quote! {
            #[doc = #doc]
            pub struct #server<S: #service> {
                service: Arc<S>,
                core: ServerCore,
            }

            impl<S: #service> #server<S> {
                pub fn new(service: S) -> Self {
                    Self::with_config(service, ServerConfig::default())
                }

                pub fn with_config(service: S, config: ServerConfig) -> Self {
                    Self {
                        service: Arc::new(service),
                        core: ServerCore::new(config),
                    }
                }

                pub fn service(&self) -> &S {
                    &self.service
                }

                #[doc = " Listen on `0.0.0.0:port`. Returns the bound address."]
                pub fn start(&self, port: u16) -> Result<std::net::SocketAddr, TransportError> {
                    self.start_on(("0.0.0.0", port))
                }

                pub fn start_on(&self, addr: impl std::net::ToSocketAddrs) -> Result<std::net::SocketAddr, TransportError> {
                    let __events: Arc<dyn ConnectionEvents> = Arc::new(#hooks(Arc::clone(&self.service)));
                    self.core.start(addr, #handlers(Arc::clone(&self.service)), __events)
                }

                #[doc = " Start and block until [`Self::stop`] is called from another thread."]
                pub fn run(&self, port: u16) -> Result<(), TransportError> {
                    self.start(port)?;
                    self.core.wait();
                    Ok(())
                }

                pub fn stop(&self) {
                    self.core.stop()
                }

                pub fn is_running(&self) -> bool {
                    self.core.is_running()
                }

                pub fn client_count(&self) -> usize {
                    self.core.client_count()
                }

                pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
                    self.core.local_addr()
                }

                #(#pushes)*
                #(#notifies)*
            }

            struct #hooks<S>(Arc<S>);

            impl<S: #service> ConnectionEvents for #hooks<S> {
                fn client_connected(&self, client: ClientId) {
                    self.0.on_client_connected(client)
                }

                fn client_disconnected(&self, client: ClientId) {
                    self.0.on_client_disconnected(client)
                }
            }
        }
    }
}
