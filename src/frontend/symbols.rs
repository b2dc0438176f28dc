//! Symbol table for one compilation unit.
//!
//! Indexes every declared interface, and per module its typedefs, structs and enums. Lookups return the first
//! declaration with a given name; duplicates are reported separately by the checker.

use std::collections::HashMap;

use crate::frontend::ast::{CompilationUnit, EnumDecl, InterfaceDecl, StructDecl, TypedefDecl};

/// Declarations visible at module level.
#[derive(Debug, Default)]
pub struct ModuleSymbols<'a> {
    typedefs: HashMap<&'a str, &'a TypedefDecl>,
    structs: HashMap<&'a str, &'a StructDecl>,
    enums: HashMap<&'a str, &'a EnumDecl>,
}

/// Name lookup over a parsed unit.
#[derive(Debug, Default)]
pub struct SymbolTable<'a> {
    interfaces: HashMap<&'a str, &'a InterfaceDecl>,
    modules: HashMap<&'a str, ModuleSymbols<'a>>,
}

/// Where a type name is being looked up from.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scope<'a> {
    pub module: Option<&'a str>,
    pub interface: Option<&'a InterfaceDecl>,
}

impl<'a> Scope<'a> {
    /// Module-level scope (typedef bases, module struct fields).
    pub fn module(module: &'a str) -> Self {
        Self {
            module: Some(module),
            interface: None,
        }
    }

    /// Scope inside an interface body.
    pub fn interface(iface: &'a InterfaceDecl) -> Self {
        Self {
            module: iface.module.as_deref(),
            interface: Some(iface),
        }
    }
}

impl<'a> SymbolTable<'a> {
    pub fn build(unit: &'a CompilationUnit) -> Self {
        let mut table = Self::default();

        for iface in unit.interfaces() {
            table.interfaces.entry(iface.name()).or_insert(iface);
        }

        for module in unit.modules() {
            let symbols = table.modules.entry(module.name.node.as_str()).or_default();
            for typedef in module.typedefs() {
                symbols.typedefs.entry(typedef.name.node.as_str()).or_insert(typedef);
            }
            for decl in module.structs() {
                symbols.structs.entry(decl.name.node.as_str()).or_insert(decl);
            }
            for decl in module.enums() {
                symbols.enums.entry(decl.name.node.as_str()).or_insert(decl);
            }
        }

        table
    }

    pub fn interface(&self, name: &str) -> Option<&'a InterfaceDecl> {
        self.interfaces.get(name).copied()
    }

    pub fn is_interface(&self, name: &str) -> bool {
        self.interfaces.contains_key(name)
    }

    pub fn typedef(&self, module: &str, name: &str) -> Option<&'a TypedefDecl> {
        self.modules.get(module)?.typedefs.get(name).copied()
    }

    pub fn module_struct(&self, module: &str, name: &str) -> Option<&'a StructDecl> {
        self.modules.get(module)?.structs.get(name).copied()
    }

    pub fn module_enum(&self, module: &str, name: &str) -> Option<&'a EnumDecl> {
        self.modules.get(module)?.enums.get(name).copied()
    }
}
