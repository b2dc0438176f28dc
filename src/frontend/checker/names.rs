//! Duplicate-name checks.

use std::collections::HashMap;

use crate::frontend::ast::{
    EnumDecl, InterfaceDecl, InterfaceMember, Item, MethodDecl, ModuleDecl, ModuleMember, Span, Spanned,
    StructDecl,
};
use crate::frontend::diagnostics::Diagnostic;
use sockidl_core::naming::{to_snake_case, to_upper_camel_case};
use sockidl_core::protocol::{MessageKind, RESPONSE_STATUS_FIELD, RETURN_VALUE_FIELD, STATUS_FIELD};

use super::Checker;

/// One naming scope. Names are compared by `key`, which may be a normalized spelling.
struct NameScope<'n> {
    what: &'static str,
    seen: HashMap<String, (&'n str, Span)>,
}

impl<'n> NameScope<'n> {
    fn new(what: &'static str) -> Self {
        Self {
            what,
            seen: HashMap::new(),
        }
    }

    /// Record `name`; returns a diagnostic if its key was already taken.
    fn declare(&mut self, name: &'n str, key: String, span: Span) -> Option<Diagnostic> {
        if let Some((first, first_span)) = self.seen.get(&key) {
            let message = if *first == name {
                format!("duplicate {} '{name}'", self.what)
            } else {
                format!("{} '{name}' maps to the same Rust name as '{first}'", self.what)
            };
            return Some(
                Diagnostic::semantic(message, span)
                    .with_note(format!("first declared at {}:{}", first_span.line, first_span.column)),
            );
        }
        self.seen.insert(key, (name, span));
        None
    }

    fn declare_exact(&mut self, name: &'n Spanned<String>) -> Option<Diagnostic> {
        self.declare(&name.node, name.node.clone(), name.span)
    }

    fn declare_snake(&mut self, name: &'n Spanned<String>) -> Option<Diagnostic> {
        self.declare(&name.node, to_snake_case(&name.node), name.span)
    }
}

impl<'s, 'a> Checker<'s, 'a> {
    pub(super) fn check_names(&mut self) {
        let unit = self.unit;

        // Interfaces are unique across the unit; each becomes `<snake>.rs`.
        let mut interfaces = NameScope::new("interface");
        let mut modules = NameScope::new("module");
        for item in &unit.items {
            if let Item::Module(module) = &item.node {
                if let Some(d) = modules.declare_exact(&module.name) {
                    self.report(d);
                }
            }
        }
        for iface in unit.interfaces() {
            if let Some(d) = interfaces.declare_snake(&iface.name) {
                self.report(d);
            }
        }

        for module in unit.modules() {
            self.check_module_names(module);
        }
        for iface in unit.interfaces() {
            self.check_interface_names(iface);
        }
    }

    fn check_module_names(&mut self, module: &'a ModuleDecl) {
        let mut members = NameScope::new("declaration");
        for member in &module.members {
            let name = match &member.node {
                ModuleMember::Interface(i) => &i.name,
                ModuleMember::Struct(s) => &s.name,
                ModuleMember::Enum(e) => &e.name,
                ModuleMember::Typedef(t) => &t.name,
            };
            if let Some(d) = members.declare_exact(name) {
                self.report(d);
            }
            match &member.node {
                ModuleMember::Struct(s) => self.check_struct_names(s),
                ModuleMember::Enum(e) => self.check_enum_names(e),
                ModuleMember::Interface(_) | ModuleMember::Typedef(_) => {}
            }
        }
    }

    fn check_interface_names(&mut self, iface: &'a InterfaceDecl) {
        let mut types = NameScope::new("type");
        let mut methods = NameScope::new("method");
        let module = iface.module.as_deref().and_then(|m| self.unit.module(m));

        for member in &iface.members {
            match &member.node {
                InterfaceMember::Struct(s) => {
                    if let Some(d) = types.declare_exact(&s.name) {
                        self.report(d);
                    }
                    self.check_shadowing(&s.name, module);
                    self.check_struct_names(s);
                }
                InterfaceMember::Enum(e) => {
                    if let Some(d) = types.declare_exact(&e.name) {
                        self.report(d);
                    }
                    self.check_shadowing(&e.name, module);
                    self.check_enum_names(e);
                }
                InterfaceMember::Method(m) => {
                    if let Some(d) = methods.declare_snake(&m.name) {
                        self.report(d);
                    }
                    self.check_param_names(m);
                    self.check_response_fields(m);
                }
            }
        }

        self.check_generated_type_names(iface, module);
    }

    /// Interface-local and module-level types land in the same generated file.
    fn check_shadowing(&mut self, name: &Spanned<String>, module: Option<&'a ModuleDecl>) {
        let Some(module) = module else {
            return;
        };
        let shadowed = module.structs().any(|s| s.name.node == name.node)
            || module.enums().any(|e| e.name.node == name.node);
        if shadowed {
            self.report(
                Diagnostic::semantic(
                    format!(
                        "type '{}' shadows a type of the same name in module '{}'",
                        name.node, module.name.node
                    ),
                    name.span,
                )
                .with_note("both would be generated into the same Rust file"),
            );
        }
    }

    fn check_struct_names(&mut self, decl: &'a StructDecl) {
        if decl.fields.is_empty() {
            self.report(Diagnostic::semantic(
                format!("struct '{}' has no fields", decl.name.node),
                decl.name.span,
            ));
        }
        let mut fields = NameScope::new("field");
        for field in &decl.fields {
            if let Some(d) = fields.declare_snake(&field.node.name) {
                self.report(d);
            }
        }
    }

    fn check_enum_names(&mut self, decl: &'a EnumDecl) {
        if decl.values.is_empty() {
            self.report(Diagnostic::semantic(
                format!("enum '{}' has no values", decl.name.node),
                decl.name.span,
            ));
        }
        let mut values = NameScope::new("enum value");
        for value in &decl.values {
            if let Some(d) = values.declare_exact(value) {
                self.report(d);
            }
        }
    }

    fn check_param_names(&mut self, method: &'a MethodDecl) {
        let mut params = NameScope::new("parameter");
        for param in &method.params {
            if let Some(d) = params.declare_snake(&param.node.name) {
                self.report(d);
            }
        }
    }

    /// Output parameters share the response schema with the generated status and return-value fields.
    fn check_response_fields(&mut self, method: &'a MethodDecl) {
        if method.is_callback {
            return;
        }
        let outputs: Vec<_> = method.params.iter().filter(|p| p.node.direction.is_output()).collect();
        let has_return = !method.return_type.node.is_void();
        if outputs.is_empty() && !has_return {
            return;
        }

        let status_taken = outputs.iter().any(|p| to_snake_case(&p.node.name.node) == STATUS_FIELD);
        let mut reserved = vec![if status_taken { RESPONSE_STATUS_FIELD } else { STATUS_FIELD }];
        if has_return {
            reserved.push(RETURN_VALUE_FIELD);
        }

        for param in outputs {
            let key = to_snake_case(&param.node.name.node);
            if reserved.contains(&key.as_str()) {
                self.report(
                    Diagnostic::semantic(
                        format!(
                            "output parameter '{}' of method '{}' collides with a generated response field",
                            param.node.name.node,
                            method.name()
                        ),
                        param.node.name.span,
                    )
                    .with_hint("rename the parameter"),
                );
            }
        }
    }

    /// Struct/enum names must not collide with the message types generated for the interface's methods.
    fn check_generated_type_names(&mut self, iface: &'a InterfaceDecl, module: Option<&'a ModuleDecl>) {
        let local = iface.structs().map(|s| &s.name).chain(iface.enums().map(|e| &e.name));
        let module_types: Vec<&Spanned<String>> = module
            .map(|m| m.structs().map(|s| &s.name).chain(m.enums().map(|e| &e.name)).collect())
            .unwrap_or_default();

        for name in local.chain(module_types) {
            for method in iface.methods() {
                let base = to_upper_camel_case(method.name());
                let kinds = [MessageKind::Request, MessageKind::Response];
                if kinds.iter().any(|k| name.node == format!("{base}{}", k.schema_suffix())) {
                    self.report(Diagnostic::semantic(
                        format!(
                            "type '{}' collides with the message type generated for method '{}' of interface '{}'",
                            name.node,
                            method.name(),
                            iface.name()
                        ),
                        name.span,
                    ));
                }
            }
        }
    }
}
