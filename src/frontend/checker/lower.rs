//! Type resolution and lowering into the resolved model.

use std::collections::HashSet;

use crate::frontend::ast::{
    EnumDecl, InterfaceDecl, InterfaceMember, MethodDecl, ModuleMember, Span, Spanned, StructDecl, TypeRef,
};
use crate::frontend::diagnostics::Diagnostic;
use crate::frontend::model::{
    NamedKind, NamedType, ResolvedEnum, ResolvedField, ResolvedInterface, ResolvedMethod, ResolvedModule,
    ResolvedParam, ResolvedStruct, ResolvedUnit, SemanticType, TypeDecl, TypeOwner,
};
use crate::frontend::symbols::Scope;
use sockidl_core::lang::primitives::PrimitiveId;

use super::Checker;

/// Placeholder for a reference that failed to resolve; the error is already reported.
const UNRESOLVED: SemanticType = SemanticType::Primitive(PrimitiveId::Void);

impl<'s, 'a> Checker<'s, 'a> {
    /// Resolve every type reference and build the [`ResolvedUnit`].
    ///
    /// Unresolvable references are reported and lowered to a placeholder so the walk can continue; the caller
    /// discards the result when any error was reported.
    pub(super) fn lower(&mut self) -> ResolvedUnit {
        let unit = self.unit;
        let mut resolved = ResolvedUnit::default();

        for module in unit.modules() {
            let scope = Scope::module(&module.name.node);
            let owner = TypeOwner::Module(module.name.node.clone());
            let mut types = Vec::new();
            for member in &module.members {
                match &member.node {
                    ModuleMember::Struct(s) => types.push(TypeDecl::Struct(self.lower_struct(s, &owner, scope))),
                    ModuleMember::Enum(e) => types.push(TypeDecl::Enum(lower_enum(e, &owner))),
                    ModuleMember::Typedef(t) => {
                        // Unused typedefs are still checked for cycles and dangling names.
                        if self.resolve_spanned(&t.base, scope).is_some_and(|ty| ty.is_void()) {
                            self.report(void_misuse("typedef", &t.name));
                        }
                    }
                    ModuleMember::Interface(_) => {}
                }
            }
            resolved.modules.push(ResolvedModule {
                name: module.name.node.clone(),
                types,
            });
        }

        for iface in unit.interfaces() {
            let lowered = self.lower_interface(iface);
            resolved.interfaces.push(lowered);
        }

        resolved
    }

    fn lower_interface(&mut self, iface: &'a InterfaceDecl) -> ResolvedInterface {
        let scope = Scope::interface(iface);
        let owner = TypeOwner::Interface(iface.name().to_string());
        let mut types = Vec::new();
        let mut methods = Vec::new();

        for member in &iface.members {
            match &member.node {
                InterfaceMember::Struct(s) => types.push(TypeDecl::Struct(self.lower_struct(s, &owner, scope))),
                InterfaceMember::Enum(e) => types.push(TypeDecl::Enum(lower_enum(e, &owner))),
                InterfaceMember::Method(m) => methods.push(self.lower_method(m, scope)),
            }
        }

        if methods.is_empty() {
            self.report(
                Diagnostic::semantic(format!("interface '{}' declares no methods", iface.name()), iface.name.span)
                    .warning(),
            );
        }

        ResolvedInterface {
            name: iface.name().to_string(),
            module: iface.module.clone(),
            methods,
            types,
            span: iface.name.span,
        }
    }

    fn lower_struct(&mut self, decl: &'a StructDecl, owner: &TypeOwner, scope: Scope<'a>) -> ResolvedStruct {
        let mut fields = Vec::with_capacity(decl.fields.len());
        for field in &decl.fields {
            let ty = self.resolve_spanned(&field.node.ty, scope);
            if ty.as_ref().is_some_and(SemanticType::is_void) {
                self.report(void_misuse("field", &field.node.name));
            }
            fields.push(ResolvedField {
                name: field.node.name.node.clone(),
                ty: ty.unwrap_or(UNRESOLVED),
            });
        }
        ResolvedStruct {
            name: decl.name.node.clone(),
            owner: owner.clone(),
            fields,
        }
    }

    fn lower_method(&mut self, method: &'a MethodDecl, scope: Scope<'a>) -> ResolvedMethod {
        let return_type = self.resolve_spanned(&method.return_type, scope).unwrap_or(UNRESOLVED);

        let mut params = Vec::with_capacity(method.params.len());
        for param in &method.params {
            let ty = match self.resolver.resolve_param(&param.node, scope) {
                Ok(ty) => {
                    if ty.is_void() {
                        self.report(void_misuse("parameter", &param.node.name));
                    }
                    ty
                }
                Err(e) => {
                    self.report(e.to_diagnostic(param.node.ty.span));
                    UNRESOLVED
                }
            };
            params.push(ResolvedParam {
                name: param.node.name.node.clone(),
                ty,
                direction: param.node.direction,
            });
        }

        if method.is_callback {
            self.check_callback_shape(method);
        }

        ResolvedMethod {
            name: method.name().to_string(),
            return_type,
            params,
            is_callback: method.is_callback,
        }
    }

    /// Callbacks are one-way pushes; anything that would travel back is dropped.
    fn check_callback_shape(&mut self, method: &MethodDecl) {
        if !method.returns_void() {
            self.report(
                Diagnostic::semantic(
                    format!("callback '{}' returns a value that can never be delivered", method.name()),
                    method.return_type.span,
                )
                .warning(),
            );
        }
        for param in method.params.iter().filter(|p| p.node.direction.is_output()) {
            self.report(
                Diagnostic::semantic(
                    format!(
                        "callback '{}' has {} parameter '{}'; callbacks are never answered",
                        method.name(),
                        param.node.direction,
                        param.node.name.node
                    ),
                    param.span,
                )
                .warning(),
            );
        }
    }

    /// `None` once the failure has been reported.
    fn resolve_spanned(&mut self, ty: &Spanned<TypeRef>, scope: Scope<'a>) -> Option<SemanticType> {
        match self.resolver.resolve(&ty.node, scope) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                self.report(e.to_diagnostic(ty.span));
                None
            }
        }
    }

    /// Reject structs that contain themselves by value (directly, through other structs, or through arrays).
    /// Sequences break the cycle.
    pub(super) fn check_struct_recursion(&mut self, unit: &ResolvedUnit) {
        let structs = unit
            .modules
            .iter()
            .flat_map(|m| m.types.iter())
            .chain(unit.interfaces.iter().flat_map(|i| i.types.iter()))
            .filter_map(|t| match t {
                TypeDecl::Struct(s) => Some(s),
                TypeDecl::Enum(_) => None,
            });

        for decl in structs {
            let target = NamedType {
                name: decl.name.clone(),
                kind: NamedKind::Struct,
                owner: decl.owner.clone(),
            };
            let mut visited = HashSet::new();
            if contains_by_value(unit, decl, &target, &mut visited) {
                let span = self.struct_span(decl).unwrap_or_default();
                self.report(
                    Diagnostic::semantic(format!("struct '{}' contains itself", decl.name), span)
                        .with_hint("use a sequence field to hold nested values"),
                );
            }
        }
    }

    fn struct_span(&self, decl: &ResolvedStruct) -> Option<Span> {
        let found = match &decl.owner {
            TypeOwner::Module(module) => self.unit.module(module)?.structs().find(|s| s.name.node == decl.name),
            TypeOwner::Interface(iface) => self.unit.interface(iface)?.structs().find(|s| s.name.node == decl.name),
        };
        found.map(|s| s.name.span)
    }
}

fn contains_by_value(
    unit: &ResolvedUnit,
    decl: &ResolvedStruct,
    target: &NamedType,
    visited: &mut HashSet<NamedType>,
) -> bool {
    for field in &decl.fields {
        let mut ty = &field.ty;
        while let SemanticType::Array(inner, _) = ty {
            ty = inner;
        }
        let SemanticType::Named(named) = ty else {
            continue;
        };
        if named.kind != NamedKind::Struct {
            continue;
        }
        if named == target {
            return true;
        }
        if !visited.insert(named.clone()) {
            continue;
        }
        if let Some(TypeDecl::Struct(inner)) = unit.type_decl(named) {
            if contains_by_value(unit, inner, target, visited) {
                return true;
            }
        }
    }
    false
}

fn lower_enum(decl: &EnumDecl, owner: &TypeOwner) -> ResolvedEnum {
    ResolvedEnum {
        name: decl.name.node.clone(),
        owner: owner.clone(),
        values: decl.values.iter().map(|v| v.node.clone()).collect(),
    }
}

fn void_misuse(what: &str, name: &Spanned<String>) -> Diagnostic {
    Diagnostic::semantic(format!("{what} '{}' cannot have type 'void'", name.node), name.span)
        .with_hint("'void' is only allowed as a method return type")
}
